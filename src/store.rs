//! Record store: technician and task operations over a [`Backend`].
//!
//! The store keeps no cached collections. Every call reads the current
//! collection from the backend, and every mutation writes the whole
//! collection back before returning, so a read after a write always sees it.
//! Ids follow the `max + 1` rule over the collection as it is now; a deleted
//! top id is handed out again.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::model::{next_id, required_text, Task, Technician};

/// Source of "now" for `created_at` / `completed_at`.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Whether an upsert added a technician or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertOutcome::Created => write!(f, "created"),
            UpsertOutcome::Updated => write!(f, "updated"),
        }
    }
}

pub struct RecordStore<B: Backend> {
    backend: B,
    clock: Clock,
}

impl<B: Backend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, Arc::new(Utc::now))
    }

    pub fn with_clock(backend: B, clock: Clock) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn list_technicians(&self) -> Result<Vec<Technician>> {
        self.backend.read_technicians()
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.backend.read_tasks()
    }

    pub fn get_task(&self, task_id: u64) -> Result<Task> {
        self.list_tasks()?
            .into_iter()
            .find(|task| task.id == task_id)
            .ok_or_else(|| Error::task_not_found(task_id))
    }

    /// Add a technician, or update phone/email of the one whose name matches
    /// case-insensitively.
    pub fn upsert_technician(
        &self,
        name: &str,
        phone: &str,
        email: &str,
    ) -> Result<(Technician, UpsertOutcome)> {
        let name = required_text(name, "technician name")?;
        let phone = phone.trim().to_string();
        let email = email.trim().to_string();

        let mut technicians = self.backend.read_technicians()?;
        let (technician, outcome) =
            match technicians.iter_mut().find(|tech| tech.matches_name(&name)) {
                Some(existing) => {
                    existing.phone = phone;
                    existing.email = email;
                    (existing.clone(), UpsertOutcome::Updated)
                }
                None => {
                    let technician = Technician {
                        id: next_id(technicians.iter().map(|tech| tech.id))?,
                        name,
                        phone,
                        email,
                    };
                    technicians.push(technician.clone());
                    (technician, UpsertOutcome::Created)
                }
            };

        self.backend.write_technicians(&technicians)?;
        tracing::info!(id = technician.id, outcome = %outcome, "technician saved");
        Ok((technician, outcome))
    }

    /// Create a pending task. The technician id is not checked.
    pub fn create_task(&self, technician_id: u64, description: &str) -> Result<Task> {
        let description = required_text(description, "task description")?;

        let mut tasks = self.backend.read_tasks()?;
        let task = Task {
            id: next_id(tasks.iter().map(|task| task.id))?,
            technician_id,
            description,
            created_at: self.now(),
            done: false,
            completed_at: None,
        };
        tasks.push(task.clone());

        self.backend.write_tasks(&tasks)?;
        tracing::info!(id = task.id, technician_id, "task created");
        Ok(task)
    }

    pub fn update_task_description(&self, task_id: u64, new_description: &str) -> Result<Task> {
        let mut tasks = self.backend.read_tasks()?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| Error::task_not_found(task_id))?;
        task.description = required_text(new_description, "task description")?;
        let updated = task.clone();

        self.backend.write_tasks(&tasks)?;
        tracing::info!(id = task_id, "task description updated");
        Ok(updated)
    }

    /// Mark a task done. Returns the task and whether anything changed; an
    /// already-done task keeps its original `completed_at` and nothing is
    /// written.
    pub fn mark_task_done(&self, task_id: u64) -> Result<(Task, bool)> {
        let mut tasks = self.backend.read_tasks()?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| Error::task_not_found(task_id))?;

        if task.done {
            tracing::debug!(id = task_id, "task already done");
            return Ok((task.clone(), false));
        }

        task.done = true;
        task.completed_at = Some(self.now());
        let updated = task.clone();

        self.backend.write_tasks(&tasks)?;
        tracing::info!(id = task_id, "task marked done");
        Ok((updated, true))
    }

    /// Remove the task with `task_id`. Returns false (and writes nothing) if
    /// there was no such task.
    pub fn delete_task(&self, task_id: u64) -> Result<bool> {
        let mut tasks = self.backend.read_tasks()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != task_id);
        if tasks.len() == before {
            tracing::debug!(id = task_id, "delete: no such task");
            return Ok(false);
        }

        self.backend.write_tasks(&tasks)?;
        tracing::info!(id = task_id, "task deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn ticking_store() -> (RecordStore<MemoryBackend>, Arc<AtomicI64>) {
        let seconds = Arc::new(AtomicI64::new(1_700_000_000));
        let source = Arc::clone(&seconds);
        let clock: Clock = Arc::new(move || {
            let now = source.fetch_add(60, Ordering::SeqCst);
            Utc.timestamp_opt(now, 0).unwrap()
        });
        (RecordStore::with_clock(MemoryBackend::new(), clock), seconds)
    }

    #[test]
    fn upsert_by_name_updates_contact_fields() {
        let (store, _) = ticking_store();
        let (alice, outcome) = store.upsert_technician("Alice", "", "").unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
        assert_eq!(alice.id, 1);

        let (again, outcome) = store.upsert_technician("alice", "555-1111", "a@x.io").unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(again.id, 1);
        assert_eq!(again.name, "Alice");

        let all = store.list_technicians().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].phone, "555-1111");
        assert_eq!(all[0].email, "a@x.io");
    }

    #[test]
    fn upsert_rejects_blank_name() {
        let (store, _) = ticking_store();
        let err = store.upsert_technician("   ", "1", "").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.list_technicians().unwrap().is_empty());
    }

    #[test]
    fn create_task_trims_and_starts_pending() {
        let (store, _) = ticking_store();
        let task = store.create_task(7, "  Fix printer  ").unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.technician_id, 7);
        assert_eq!(task.description, "Fix printer");
        assert!(!task.done);
        assert!(task.completed_at.is_none());
        assert_eq!(store.get_task(1).unwrap(), task);
    }

    #[test]
    fn create_task_rejects_blank_description() {
        let (store, _) = ticking_store();
        assert!(matches!(store.create_task(1, "\t "), Err(Error::Validation(_))));
        assert!(store.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn create_task_fails_when_ids_are_exhausted() {
        let (seed, _) = ticking_store();
        let mut last = seed.create_task(1, "last").unwrap();
        last.id = u64::MAX;
        let store = RecordStore::new(MemoryBackend::with_records(Vec::new(), vec![last]));

        let err = store.create_task(1, "one more").unwrap_err();
        assert!(err.is_backend());
        assert_eq!(store.list_tasks().unwrap().len(), 1);
    }

    #[test]
    fn update_keeps_created_at() {
        let (store, _) = ticking_store();
        let task = store.create_task(1, "Old").unwrap();
        let updated = store.update_task_description(task.id, " New ").unwrap();
        assert_eq!(updated.description, "New");
        assert_eq!(updated.created_at, task.created_at);
    }

    #[test]
    fn update_errors() {
        let (store, _) = ticking_store();
        store.create_task(1, "Old").unwrap();
        assert!(matches!(
            store.update_task_description(9, "x"),
            Err(Error::NotFound { id: 9, .. })
        ));
        assert!(matches!(
            store.update_task_description(1, "  "),
            Err(Error::Validation(_))
        ));
        assert_eq!(store.get_task(1).unwrap().description, "Old");
    }

    #[test]
    fn mark_done_stamps_once() {
        let (store, _) = ticking_store();
        let task = store.create_task(1, "Fix printer").unwrap();

        let (done, changed) = store.mark_task_done(task.id).unwrap();
        assert!(changed);
        assert!(done.done);
        let first_stamp = done.completed_at.expect("stamped");
        assert!(first_stamp > task.created_at);

        let (again, changed) = store.mark_task_done(task.id).unwrap();
        assert!(!changed);
        assert!(again.done);
        assert_eq!(again.completed_at, Some(first_stamp));
    }

    #[test]
    fn mark_done_missing_task() {
        let (store, _) = ticking_store();
        assert!(matches!(store.mark_task_done(3), Err(Error::NotFound { .. })));
    }

    #[test]
    fn delete_is_noop_for_missing_id() {
        let (store, _) = ticking_store();
        store.create_task(1, "a").unwrap();
        store.create_task(1, "b").unwrap();

        assert!(!store.delete_task(42).unwrap());
        assert_eq!(store.list_tasks().unwrap().len(), 2);

        assert!(store.delete_task(1).unwrap());
        let remaining = store.list_tasks().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
    }

    #[test]
    fn deleting_top_id_reuses_it() {
        let (store, _) = ticking_store();
        store.create_task(1, "a").unwrap();
        store.create_task(1, "b").unwrap();
        store.delete_task(2).unwrap();
        assert_eq!(store.create_task(1, "c").unwrap().id, 2);
    }

    #[test]
    fn failed_write_leaves_records_unchanged() {
        let (store, _) = ticking_store();
        store.create_task(1, "a").unwrap();
        store.backend().set_fail_writes(true);

        let err = store.create_task(1, "b").unwrap_err();
        assert!(err.is_backend());
        let err = store.mark_task_done(1).unwrap_err();
        assert!(err.is_backend());

        store.backend().set_fail_writes(false);
        let tasks = store.list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(!tasks[0].done);
    }
}
