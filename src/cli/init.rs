//! svctrack init command implementation
//!
//! Creates the default config and empty data files.

use std::path::PathBuf;

use super::GlobalOptions;
use crate::config::{Config, CONFIG_FILE};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

#[derive(serde::Serialize)]
struct InitReport {
    root: PathBuf,
    backend: &'static str,
    location: String,
    created_config: bool,
}

pub fn run(global: &GlobalOptions) -> Result<()> {
    let root = global.resolve_root()?;
    std::fs::create_dir_all(&root)?;

    let config_path = global
        .config
        .clone()
        .unwrap_or_else(|| root.join(CONFIG_FILE));
    let created_config = if config_path.exists() {
        false
    } else {
        Config::default().save(&config_path)?;
        tracing::info!(path = %config_path.display(), "wrote default config");
        true
    };

    let config = global.load_config(&root)?;
    let tracker = global.open_tracker_with(&root, &config)?;
    let backend = tracker.store().backend();
    backend.init()?;

    let report = InitReport {
        root: root.clone(),
        backend: backend.name(),
        location: backend.location(),
        created_config,
    };

    let header = if created_config {
        "svctrack init: initialized".to_string()
    } else {
        "svctrack init: config already present".to_string()
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("root", root.display().to_string());
    human.push_summary("backend", report.backend);
    human.push_summary("location", report.location.clone());
    human.push_next_step("svctrack tech add <name>");

    emit_success(global.output(), "init", &report, Some(&human))
}
