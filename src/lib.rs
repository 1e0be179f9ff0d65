//! svctrack - Service-call tracker library
//!
//! This library provides the core functionality for the svctrack CLI:
//! technicians, the tasks assigned to them, and completion reporting.
//!
//! # Core Concepts
//!
//! - **Technicians**: people tasks are assigned to; upserted by case-insensitive name
//! - **Tasks**: pending until marked done, which stamps `completed_at` once
//! - **Backends**: where records live (JSON files, a remote JSON document, memory)
//! - **Reports**: tasks completed within a rolling window (30 days by default)
//!
//! # Module Organization
//!
//! - `backend`: Storage backends (read-all / write-all per collection)
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.svctrack.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes for the data files
//! - `model`: Technician and task records
//! - `output`: Human and JSON output envelopes
//! - `sheet`: Fixed-column task rows and CSV export
//! - `store`: Record operations (id assignment, upsert, done transition)
//! - `tracker`: Name joins, task views, and the completion report

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod sheet;
pub mod store;
pub mod tracker;

pub use error::{Error, Result};
