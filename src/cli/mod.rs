//! Command-line interface for svctrack
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::backend::{self, Backend};
use crate::config::{BackendKind, Config};
use crate::error::{Error, Result};
use crate::output::{HumanOutput, OutputOptions};
use crate::store::RecordStore;
use crate::tracker::Tracker;

mod export;
mod init;
mod report;
mod task;
mod tech;

/// svctrack - service-call tracker
///
/// Register technicians, assign tasks to them, mark tasks done, and report
/// on completed work over a rolling window.
#[derive(Parser, Debug)]
#[command(name = "svctrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Working root holding .svctrack.toml and the data directory
    #[arg(long, global = true, env = "SVCTRACK_ROOT")]
    pub root: Option<PathBuf>,

    /// Explicit config file (defaults to <root>/.svctrack.toml)
    #[arg(long, global = true, env = "SVCTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured storage backend
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data files and a default config
    Init,

    /// Technician management
    #[command(subcommand)]
    Tech(TechCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Tasks completed within the reporting window
    Report {
        /// Look-back window in days (defaults to report.window_days)
        #[arg(long, conflicts_with = "since")]
        days: Option<u32>,

        /// Explicit cutoff timestamp (RFC 3339)
        #[arg(long)]
        since: Option<String>,
    },

    /// Export tasks as spreadsheet rows
    Export {
        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Technician subcommands
#[derive(Subcommand, Debug)]
pub enum TechCommands {
    /// Add a technician, or update phone/email of an existing one (matched by name)
    Add {
        /// Technician name (matched case-insensitively)
        name: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        email: String,
    },

    /// List technicians
    List,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task assigned to a technician
    Add {
        /// Technician id
        #[arg(long = "tech")]
        technician_id: u64,

        /// Task description
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// List tasks
    List {
        /// Only show tasks that are not done
        #[arg(long)]
        pending: bool,
    },

    /// Show one task
    Show { id: u64 },

    /// Replace a task's description
    Update {
        id: u64,

        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// Mark a task done
    Done { id: u64 },

    /// Delete a task
    Rm { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub backend: Option<BackendKind>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    pub fn resolve_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// Explicit config files must exist and load cleanly; the implicit one
    /// may be absent.
    pub fn load_config(&self, root: &Path) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_from_root(root)?,
        };
        if let Some(kind) = self.backend {
            config.storage.backend = kind;
            config.validate()?;
        }
        Ok(config)
    }

    pub fn open_tracker(&self) -> Result<Tracker<Box<dyn Backend>>> {
        let root = self.resolve_root()?;
        let config = self.load_config(&root)?;
        self.open_tracker_with(&root, &config)
    }

    pub fn open_tracker_with(
        &self,
        root: &Path,
        config: &Config,
    ) -> Result<Tracker<Box<dyn Backend>>> {
        let backend = backend::open(config, root)?;
        Ok(Tracker::new(RecordStore::new(backend)))
    }
}

/// A failed read becomes an empty collection plus a warning; user errors
/// still propagate.
pub(crate) fn read_or_empty<T>(
    result: Result<Vec<T>>,
    what: &str,
    human: &mut HumanOutput,
) -> Result<Vec<T>> {
    match result {
        Ok(records) => Ok(records),
        Err(err) if err.is_backend() => {
            tracing::warn!(error = %err, "could not read {what}; treating as empty");
            human.push_warning(format!("could not read {what}: {err}"));
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}

pub(crate) fn join_words(words: &[String]) -> String {
    words.join(" ")
}

pub(crate) fn parse_cutoff(raw: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    crate::model::timestamp::parse(raw)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid timestamp '{raw}'")))
}

impl Cli {
    fn global(&self) -> GlobalOptions {
        GlobalOptions {
            root: self.root.clone(),
            config: self.config.clone(),
            backend: self.backend,
            json: self.json,
            quiet: self.quiet,
        }
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = self.global();
        match self.command {
            Commands::Init => init::run(&global),
            Commands::Tech(cmd) => match cmd {
                TechCommands::Add { name, phone, email } => tech::run_add(
                    &global,
                    tech::AddOptions { name, phone, email },
                ),
                TechCommands::List => tech::run_list(&global),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    technician_id,
                    description,
                } => task::run_add(
                    &global,
                    task::AddOptions {
                        technician_id,
                        description: join_words(&description),
                    },
                ),
                TaskCommands::List { pending } => task::run_list(&global, pending),
                TaskCommands::Show { id } => task::run_show(&global, id),
                TaskCommands::Update { id, description } => {
                    task::run_update(&global, id, &join_words(&description))
                }
                TaskCommands::Done { id } => task::run_done(&global, id),
                TaskCommands::Rm { id } => task::run_rm(&global, id),
            },
            Commands::Report { days, since } => report::run(
                &global,
                report::ReportOptions { days, since },
            ),
            Commands::Export { format, output } => export::run(
                &global,
                export::ExportOptions { format, output },
            ),
        }
    }
}
