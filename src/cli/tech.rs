//! svctrack tech command implementation

use super::{read_or_empty, GlobalOptions};
use crate::error::Result;
use crate::model::Technician;
use crate::output::{emit_success, HumanOutput};
use crate::store::UpsertOutcome;

/// Options for `svctrack tech add`
pub struct AddOptions {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(serde::Serialize)]
struct AddReport {
    technician: Technician,
    outcome: UpsertOutcome,
}

#[derive(serde::Serialize)]
struct ListReport {
    technicians: Vec<Technician>,
}

pub fn run_add(global: &GlobalOptions, options: AddOptions) -> Result<()> {
    let tracker = global.open_tracker()?;
    let (technician, outcome) =
        tracker
            .store()
            .upsert_technician(&options.name, &options.phone, &options.email)?;

    let header = match outcome {
        UpsertOutcome::Created => format!("svctrack tech add: added {}", technician.name),
        UpsertOutcome::Updated => format!("svctrack tech add: updated {}", technician.name),
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("id", technician.id.to_string());
    human.push_summary("phone", technician.phone.clone());
    human.push_summary("email", technician.email.clone());
    human.push_next_step(format!(
        "svctrack task add --tech {} <description>",
        technician.id
    ));

    emit_success(
        global.output(),
        "tech add",
        &AddReport { technician, outcome },
        Some(&human),
    )
}

pub fn run_list(global: &GlobalOptions) -> Result<()> {
    let tracker = global.open_tracker()?;
    let mut human = HumanOutput::new("svctrack tech list");
    let technicians = read_or_empty(tracker.store().list_technicians(), "technicians", &mut human)?;

    human.set_header(format!(
        "svctrack tech list: {} technician(s)",
        technicians.len()
    ));
    for tech in &technicians {
        human.push_detail(format!("{}: {} | {} | {}", tech.id, tech.name, tech.phone, tech.email));
    }
    if technicians.is_empty() {
        human.push_next_step("svctrack tech add <name>");
    }

    emit_success(
        global.output(),
        "tech list",
        &ListReport { technicians },
        Some(&human),
    )
}
