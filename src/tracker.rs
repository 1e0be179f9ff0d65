//! Reporting over the record store: technician name joins, pending/all task
//! views, and the completion-window report.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::model::{Task, Technician, UNKNOWN_TECHNICIAN};
use crate::sheet::TaskRow;
use crate::store::RecordStore;

/// Default look-back for the completion report.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Longest accepted look-back (100 years).
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// A task joined with the display name of its technician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub technician: String,
}

/// A completed task, as listed in the completion report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedTask {
    pub id: u64,
    pub description: String,
    pub technician: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
}

/// Id → name lookup built from one technician read.
#[derive(Debug, Clone, Default)]
pub struct TechnicianNames {
    names: HashMap<u64, String>,
}

impl TechnicianNames {
    pub fn new(technicians: &[Technician]) -> Self {
        Self {
            names: technicians
                .iter()
                .map(|tech| (tech.id, tech.name.clone()))
                .collect(),
        }
    }

    pub fn display_name(&self, technician_id: u64) -> String {
        self.names
            .get(&technician_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_TECHNICIAN.to_string())
    }
}

pub struct Tracker<B: Backend> {
    store: RecordStore<B>,
}

impl<B: Backend> Tracker<B> {
    pub fn new(store: RecordStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn names(&self) -> Result<TechnicianNames> {
        Ok(TechnicianNames::new(&self.store.list_technicians()?))
    }

    /// Technician name, or `"Unknown"` for a dangling id.
    pub fn technician_display_name(&self, technician_id: u64) -> Result<String> {
        Ok(self.names()?.display_name(technician_id))
    }

    /// Tasks done at or after `cutoff`, in store order.
    pub fn tasks_completed_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<CompletedTask>> {
        let names = self.names()?;
        let tasks = self.store.list_tasks()?;
        Ok(completed_since(&tasks, &names, cutoff))
    }

    /// Completion report over the last `days` days.
    pub fn completed_in_last_days(&self, days: u32) -> Result<Vec<CompletedTask>> {
        self.tasks_completed_since(self.window_cutoff(days)?)
    }

    /// `now - days`, rejecting windows outside `1..=MAX_WINDOW_DAYS`.
    pub fn window_cutoff(&self, days: u32) -> Result<DateTime<Utc>> {
        if days == 0 || days > MAX_WINDOW_DAYS {
            return Err(Error::InvalidArgument(format!(
                "window must be between 1 and {MAX_WINDOW_DAYS} days, got {days}"
            )));
        }
        Duration::try_days(i64::from(days))
            .and_then(|window| self.store.now().checked_sub_signed(window))
            .ok_or_else(|| {
                Error::InvalidArgument(format!("a {days}-day window reaches past the calendar"))
            })
    }

    pub fn task_views(&self, filter: TaskFilter) -> Result<Vec<TaskView>> {
        let names = self.names()?;
        let tasks = self.store.list_tasks()?;
        Ok(join_tasks(tasks, &names, filter))
    }

    pub fn task_view(&self, task_id: u64) -> Result<TaskView> {
        let task = self.store.get_task(task_id)?;
        let technician = self.technician_display_name(task.technician_id)?;
        Ok(TaskView { task, technician })
    }

    /// Tabular rows for spreadsheet-style consumers.
    pub fn task_rows(&self) -> Result<Vec<TaskRow>> {
        let names = self.names()?;
        Ok(task_rows(&self.store.list_tasks()?, &names))
    }
}

pub fn task_rows(tasks: &[Task], names: &TechnicianNames) -> Vec<TaskRow> {
    tasks
        .iter()
        .map(|task| TaskRow::new(task, &names.display_name(task.technician_id)))
        .collect()
}

pub fn join_tasks(tasks: Vec<Task>, names: &TechnicianNames, filter: TaskFilter) -> Vec<TaskView> {
    tasks
        .into_iter()
        .filter(|task| filter == TaskFilter::All || !task.done)
        .map(|task| {
            let technician = names.display_name(task.technician_id);
            TaskView { task, technician }
        })
        .collect()
}

pub fn completed_since(
    tasks: &[Task],
    names: &TechnicianNames,
    cutoff: DateTime<Utc>,
) -> Vec<CompletedTask> {
    tasks
        .iter()
        .filter(|task| task.completed_since(cutoff))
        .filter_map(|task| {
            task.completed_at.map(|completed_at| CompletedTask {
                id: task.id,
                description: task.description.clone(),
                technician: names.display_name(task.technician_id),
                completed_at,
            })
        })
        .collect()
}
