//! svctrack report command implementation
//!
//! Lists tasks completed within the reporting window.

use chrono::{DateTime, Utc};

use super::{parse_cutoff, read_or_empty, GlobalOptions};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::tracker::{completed_since, CompletedTask, TechnicianNames};

/// Options for `svctrack report`
pub struct ReportOptions {
    pub days: Option<u32>,
    pub since: Option<String>,
}

#[derive(serde::Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    window_days: Option<u32>,
    cutoff: DateTime<Utc>,
    tasks: Vec<CompletedTask>,
}

pub fn run(global: &GlobalOptions, options: ReportOptions) -> Result<()> {
    let root = global.resolve_root()?;
    let config = global.load_config(&root)?;
    let tracker = global.open_tracker_with(&root, &config)?;

    let (window_days, cutoff) = match &options.since {
        Some(raw) => (None, parse_cutoff(raw)?),
        None => {
            let days = options.days.unwrap_or(config.report.window_days);
            if days == 0 {
                return Err(Error::InvalidArgument("--days must be >= 1".to_string()));
            }
            (Some(days), tracker.window_cutoff(days)?)
        }
    };

    let mut human = HumanOutput::new("svctrack report");
    let technicians = read_or_empty(tracker.store().list_technicians(), "technicians", &mut human)?;
    let tasks = read_or_empty(tracker.store().list_tasks(), "tasks", &mut human)?;
    let completed = completed_since(&tasks, &TechnicianNames::new(&technicians), cutoff);

    let header = match window_days {
        Some(days) => format!(
            "svctrack report: {} task(s) completed in the last {days} days",
            completed.len()
        ),
        None => format!(
            "svctrack report: {} task(s) completed since {}",
            completed.len(),
            cutoff.to_rfc3339()
        ),
    };
    human.set_header(header);
    human.push_summary("cutoff", cutoff.to_rfc3339());
    for task in &completed {
        human.push_detail(format!(
            "{}: {} | Completed by: {} on {}",
            task.id,
            task.description,
            task.technician,
            task.completed_at.date_naive()
        ));
    }

    emit_success(
        global.output(),
        "report",
        &Report {
            window_days,
            cutoff,
            tasks: completed,
        },
        Some(&human),
    )
}
