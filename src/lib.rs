//! `sheetsync` - sheet/tracker reconciliation library
//!
//! This crate provides the core functionality for the `ssy` CLI tool, which
//! keeps a local work-item sheet and a remote issue tracker in agreement.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Record, RemoteIssue, SyncMark, Ownership)
//! - [`sheet`] - The local record store (JSONL table)
//! - [`remote`] - Tracker gateway: the `Tracker` trait and its HTTP impl
//! - [`sync`] - Outbound/inbound reconcilers and the run driver
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling
//! - [`logging`] - tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod remote;
pub mod sheet;
pub mod sync;

pub use error::{Result, SyncError};

use clap::Parser;

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    let parsed = cli::Cli::parse();
    logging::init_logging(parsed.verbose, parsed.quiet, parsed.log_file.as_deref())?;
    cli::commands::dispatch(&parsed)
}
