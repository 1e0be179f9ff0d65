//! Local JSON file backend.
//!
//! Each collection is a pretty-printed JSON array in its own file. Writes go
//! through [`crate::lock::write_atomic_locked`]; a missing file reads as an
//! empty collection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use super::Backend;
use crate::error::Result;
use crate::lock;
use crate::model::{Task, Technician};

pub const TECHNICIANS_FILE: &str = "technicians.json";
pub const TASKS_FILE: &str = "tasks.json";

#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    data_dir: PathBuf,
    lock_timeout_ms: u64,
}

impl JsonFileBackend {
    pub fn new(data_dir: impl Into<PathBuf>, lock_timeout_ms: u64) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock_timeout_ms,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn technicians_file(&self) -> PathBuf {
        self.data_dir.join(TECHNICIANS_FILE)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    fn read_collection<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<T> = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), count = records.len(), "read collection");
        Ok(records)
    }

    fn write_collection<T: Serialize>(&self, path: &Path, records: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        lock::write_atomic_locked(path, json.as_bytes(), self.lock_timeout_ms)?;
        tracing::debug!(path = %path.display(), count = records.len(), "wrote collection");
        Ok(())
    }

    fn ensure_file(&self, path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        lock::write_atomic_locked(path, b"[]", self.lock_timeout_ms)?;
        Ok(true)
    }
}

impl Backend for JsonFileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn location(&self) -> String {
        self.data_dir.display().to_string()
    }

    fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let created_techs = self.ensure_file(&self.technicians_file())?;
        let created_tasks = self.ensure_file(&self.tasks_file())?;
        if created_techs || created_tasks {
            tracing::info!(data_dir = %self.data_dir.display(), "initialized data files");
        }
        Ok(())
    }

    fn read_technicians(&self) -> Result<Vec<Technician>> {
        self.read_collection(&self.technicians_file())
    }

    fn write_technicians(&self, technicians: &[Technician]) -> Result<()> {
        self.write_collection(&self.technicians_file(), technicians)
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        self.read_collection(&self.tasks_file())
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.write_collection(&self.tasks_file(), tasks)
    }
}
