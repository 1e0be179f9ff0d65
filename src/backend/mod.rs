//! Storage backends
//!
//! A backend reads and writes whole collections. Record-level semantics
//! (id assignment, upserts, the done transition) live in
//! [`crate::store::RecordStore`], which works against any backend.
//!
//! ```text
//! file     <root>/<data_dir>/technicians.json + tasks.json
//! remote   one JSON document { "technicians": [...], "tasks": [...] } over HTTP
//! memory   process-local, nothing persisted
//! ```

use std::path::Path;

use crate::config::{BackendKind, Config};
use crate::error::Result;
use crate::model::{Task, Technician};

pub mod file;
pub mod memory;
pub mod remote;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use remote::RemoteDocumentBackend;

/// Read-all / write-all access to the two collections.
pub trait Backend {
    /// Short name for logs and output.
    fn name(&self) -> &'static str;

    /// Human-readable location (path or URL).
    fn location(&self) -> String;

    /// Prepare empty storage if none exists.
    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn read_technicians(&self) -> Result<Vec<Technician>>;

    fn write_technicians(&self, technicians: &[Technician]) -> Result<()>;

    fn read_tasks(&self) -> Result<Vec<Task>>;

    fn write_tasks(&self, tasks: &[Task]) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn location(&self) -> String {
        (**self).location()
    }

    fn init(&self) -> Result<()> {
        (**self).init()
    }

    fn read_technicians(&self) -> Result<Vec<Technician>> {
        (**self).read_technicians()
    }

    fn write_technicians(&self, technicians: &[Technician]) -> Result<()> {
        (**self).write_technicians(technicians)
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        (**self).read_tasks()
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        (**self).write_tasks(tasks)
    }
}

/// Build the configured backend. Relative data directories resolve
/// against `root`.
pub fn open(config: &Config, root: &Path) -> Result<Box<dyn Backend>> {
    let backend: Box<dyn Backend> = match config.storage.backend {
        BackendKind::File => Box::new(JsonFileBackend::new(
            root.join(&config.storage.data_dir),
            config.storage.lock_timeout_ms,
        )),
        BackendKind::Remote => Box::new(RemoteDocumentBackend::from_config(&config.storage.remote)?),
        BackendKind::Memory => Box::new(MemoryBackend::new()),
    };
    tracing::debug!(backend = backend.name(), location = %backend.location(), "opened backend");
    Ok(backend)
}
