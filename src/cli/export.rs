//! svctrack export command implementation
//!
//! Writes every task as a fixed-column row (CSV or JSON) for spreadsheets.

use std::path::PathBuf;

use super::{read_or_empty, ExportFormat, GlobalOptions};
use crate::error::Result;
use crate::lock;
use crate::output::{emit_success, HumanOutput};
use crate::sheet::{self, TaskRow};
use crate::tracker::{task_rows, TechnicianNames};

/// Options for `svctrack export`
pub struct ExportOptions {
    pub format: ExportFormat,
    pub output: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct ExportReport {
    path: PathBuf,
    format: &'static str,
    rows: usize,
}

fn render(format: ExportFormat, rows: &[TaskRow]) -> Result<String> {
    match format {
        ExportFormat::Csv => sheet::to_csv_string(rows),
        ExportFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(rows)?)),
    }
}

pub fn run(global: &GlobalOptions, options: ExportOptions) -> Result<()> {
    let tracker = global.open_tracker()?;
    let mut human = HumanOutput::new("svctrack export");
    let technicians = read_or_empty(tracker.store().list_technicians(), "technicians", &mut human)?;
    let tasks = read_or_empty(tracker.store().list_tasks(), "tasks", &mut human)?;
    let rows = task_rows(&tasks, &TechnicianNames::new(&technicians));
    let content = render(options.format, &rows)?;

    // Stdout carries the export itself.
    let Some(path) = options.output else {
        for warning in human.warnings() {
            eprintln!("warning: {warning}");
        }
        print!("{content}");
        return Ok(());
    };

    lock::write_atomic(&path, content.as_bytes())?;
    tracing::info!(path = %path.display(), rows = rows.len(), "exported tasks");

    let format = match options.format {
        ExportFormat::Csv => "csv",
        ExportFormat::Json => "json",
    };
    human.set_header(format!("svctrack export: wrote {} row(s)", rows.len()));
    human.push_summary("path", path.display().to_string());
    human.push_summary("format", format);

    emit_success(
        global.output(),
        "export",
        &ExportReport {
            path,
            format,
            rows: rows.len(),
        },
        Some(&human),
    )
}
