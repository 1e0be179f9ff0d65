//! In-process backend. Nothing survives the process; useful for tests and
//! dry runs. Reads and writes can be made to fail to exercise the error
//! paths of callers.

use std::cell::{Cell, RefCell};

use super::Backend;
use crate::error::{Error, Result};
use crate::model::{Task, Technician};

#[derive(Debug, Default)]
pub struct MemoryBackend {
    technicians: RefCell<Vec<Technician>>,
    tasks: RefCell<Vec<Task>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(technicians: Vec<Technician>, tasks: Vec<Task>) -> Self {
        Self {
            technicians: RefCell::new(technicians),
            tasks: RefCell::new(tasks),
            ..Self::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.get() {
            return Err(Error::Backend("memory backend read failure".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::Backend("memory backend write failure".to_string()));
        }
        Ok(())
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn location(&self) -> String {
        "(in-memory)".to_string()
    }

    fn read_technicians(&self) -> Result<Vec<Technician>> {
        self.check_read()?;
        Ok(self.technicians.borrow().clone())
    }

    fn write_technicians(&self, technicians: &[Technician]) -> Result<()> {
        self.check_write()?;
        *self.technicians.borrow_mut() = technicians.to_vec();
        Ok(())
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        self.check_read()?;
        Ok(self.tasks.borrow().clone())
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.check_write()?;
        *self.tasks.borrow_mut() = tasks.to_vec();
        Ok(())
    }
}
