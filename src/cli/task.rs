//! svctrack task command implementation
//!
//! Create, list, show, update, complete, and delete tasks.

use super::{read_or_empty, GlobalOptions};
use crate::backend::Backend;
use crate::error::Result;
use crate::model::{timestamp, Task, UNKNOWN_TECHNICIAN};
use crate::output::{emit_success, HumanOutput};
use crate::tracker::{join_tasks, TaskFilter, TaskView, TechnicianNames, Tracker};

/// Options for `svctrack task add`
pub struct AddOptions {
    pub technician_id: u64,
    pub description: String,
}

#[derive(serde::Serialize)]
struct TaskReport {
    task: TaskView,
}

#[derive(serde::Serialize)]
struct DoneReport {
    task: TaskView,
    changed: bool,
}

#[derive(serde::Serialize)]
struct ListReport {
    pending_only: bool,
    tasks: Vec<TaskView>,
}

#[derive(serde::Serialize)]
struct RmReport {
    id: u64,
    deleted: bool,
}

fn task_line(view: &TaskView) -> String {
    format!(
        "{}: [{}] {} (Tech: {})",
        view.task.id,
        view.task.status_label(),
        view.task.description,
        view.technician
    )
}

fn describe(human: &mut HumanOutput, view: &TaskView) {
    human.push_summary("technician", format!("{} (id {})", view.technician, view.task.technician_id));
    human.push_summary("status", view.task.status_label());
    human.push_summary("created", timestamp::format(&view.task.created_at));
    if let Some(completed_at) = &view.task.completed_at {
        human.push_summary("completed", timestamp::format(completed_at));
    }
}

pub fn run_add(global: &GlobalOptions, options: AddOptions) -> Result<()> {
    let tracker = global.open_tracker()?;
    let task = tracker
        .store()
        .create_task(options.technician_id, &options.description)?;

    let mut human = HumanOutput::new(format!("svctrack task add: created task {}", task.id));
    let names = names_after_write(&tracker, &mut human)?;
    let view = view_for(names.as_ref(), task);
    human.push_summary("description", view.task.description.clone());
    describe(&mut human, &view);
    if names.is_some() && view.technician == UNKNOWN_TECHNICIAN {
        human.push_warning(format!(
            "no technician with id {}; task shows as Unknown",
            view.task.technician_id
        ));
        human.push_next_step("svctrack tech list");
    }
    human.push_next_step(format!("svctrack task done {}", view.task.id));

    emit_success(global.output(), "task add", &TaskReport { task: view }, Some(&human))
}

pub fn run_list(global: &GlobalOptions, pending_only: bool) -> Result<()> {
    let tracker = global.open_tracker()?;
    let mut human = HumanOutput::new("svctrack task list");
    let technicians = read_or_empty(tracker.store().list_technicians(), "technicians", &mut human)?;
    let tasks = read_or_empty(tracker.store().list_tasks(), "tasks", &mut human)?;

    let filter = if pending_only {
        TaskFilter::Pending
    } else {
        TaskFilter::All
    };
    let views = join_tasks(tasks, &TechnicianNames::new(&technicians), filter);

    human.set_header(format!("svctrack task list: {} task(s)", views.len()));
    if pending_only {
        human.push_summary("pending only", "");
    }
    for view in &views {
        human.push_detail(task_line(view));
    }

    emit_success(
        global.output(),
        "task list",
        &ListReport {
            pending_only,
            tasks: views,
        },
        Some(&human),
    )
}

pub fn run_show(global: &GlobalOptions, id: u64) -> Result<()> {
    let tracker = global.open_tracker()?;
    let view = tracker.task_view(id)?;

    let mut human = HumanOutput::new(format!("svctrack task show: {}", task_line(&view)));
    describe(&mut human, &view);

    emit_success(global.output(), "task show", &TaskReport { task: view }, Some(&human))
}

pub fn run_update(global: &GlobalOptions, id: u64, description: &str) -> Result<()> {
    let tracker = global.open_tracker()?;
    let task = tracker.store().update_task_description(id, description)?;

    let mut human = HumanOutput::new(format!("svctrack task update: updated task {id}"));
    let view = view_for(names_after_write(&tracker, &mut human)?.as_ref(), task);
    human.push_summary("description", view.task.description.clone());

    emit_success(global.output(), "task update", &TaskReport { task: view }, Some(&human))
}

pub fn run_done(global: &GlobalOptions, id: u64) -> Result<()> {
    let tracker = global.open_tracker()?;
    let (task, changed) = tracker.store().mark_task_done(id)?;

    let header = if changed {
        format!("svctrack task done: task {id} marked done")
    } else {
        format!("svctrack task done: task {id} was already done")
    };
    let mut human = HumanOutput::new(header);
    let view = view_for(names_after_write(&tracker, &mut human)?.as_ref(), task);
    describe(&mut human, &view);
    human.push_next_step("svctrack report");

    emit_success(
        global.output(),
        "task done",
        &DoneReport {
            task: view,
            changed,
        },
        Some(&human),
    )
}

pub fn run_rm(global: &GlobalOptions, id: u64) -> Result<()> {
    let tracker = global.open_tracker()?;
    let deleted = tracker.store().delete_task(id)?;

    let header = if deleted {
        format!("svctrack task rm: deleted task {id}")
    } else {
        format!("svctrack task rm: no task {id}; nothing to do")
    };
    let human = HumanOutput::new(header);

    emit_success(global.output(), "task rm", &RmReport { id, deleted }, Some(&human))
}

/// Names for decorating a just-written task. The write already succeeded,
/// so a failed technician read only costs the display name; `None` means
/// the read failed and a warning was recorded.
fn names_after_write<B: Backend>(
    tracker: &Tracker<B>,
    human: &mut HumanOutput,
) -> Result<Option<TechnicianNames>> {
    match tracker.names() {
        Ok(names) => Ok(Some(names)),
        Err(err) if err.is_backend() => {
            tracing::warn!(error = %err, "could not read technicians after write");
            human.push_warning(format!("could not read technicians: {err}"));
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn view_for(names: Option<&TechnicianNames>, task: Task) -> TaskView {
    let technician = names
        .map(|names| names.display_name(task.technician_id))
        .unwrap_or_else(|| UNKNOWN_TECHNICIAN.to_string());
    TaskView { task, technician }
}
