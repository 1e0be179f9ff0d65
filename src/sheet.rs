//! Fixed-column task rows for spreadsheet-style consumers.
//!
//! Column order is part of the external format:
//! `ID, Technician, Description, Created At, Status, Completed At`.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::model::{timestamp, Task};

pub const TASK_COLUMNS: [&str; 6] = [
    "ID",
    "Technician",
    "Description",
    "Created At",
    "Status",
    "Completed At",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Technician")]
    pub technician: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Created At")]
    pub created_at: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Completed At")]
    pub completed_at: String,
}

impl TaskRow {
    pub fn new(task: &Task, technician: &str) -> Self {
        Self {
            id: task.id,
            technician: technician.to_string(),
            description: task.description.clone(),
            created_at: timestamp::format(&task.created_at),
            status: task.status_label().to_string(),
            completed_at: task
                .completed_at
                .as_ref()
                .map(timestamp::format)
                .unwrap_or_default(),
        }
    }

    pub fn cells(&self) -> [String; 6] {
        [
            self.id.to_string(),
            self.technician.clone(),
            self.description.clone(),
            self.created_at.clone(),
            self.status.clone(),
            self.completed_at.clone(),
        ]
    }
}

/// Write a header row plus one row per task.
pub fn write_csv<W: Write>(writer: W, rows: &[TaskRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(TASK_COLUMNS)?;
    for row in rows {
        csv.write_record(row.cells())?;
    }
    csv.flush()?;
    Ok(())
}

pub fn to_csv_string(rows: &[TaskRow]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
