//! Command-line interface for `sheetsync`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// `sheetsync` (ssy) - sheet/tracker reconciliation.
#[derive(Parser, Debug)]
#[command(name = "ssy")]
#[command(
    author,
    version,
    about = "Reconcile a local work-item sheet with a remote issue tracker",
    long_about = None,
    after_help = "One blocking tracker call at a time, no retries; run one instance at a time."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Mirror log events to a JSON file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Config file (default: ./sheetsync.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full reconciliation pass (outbound, then inbound)
    Sync(SyncArgs),

    /// Create an empty sheet file
    Init(InitArgs),

    /// List the records in a sheet
    List(ListArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Path to the sheet file
    pub sheet: PathBuf,

    /// Tracker project key
    #[arg(long)]
    pub project: Option<String>,

    /// Tracker base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path of the sheet file to create
    pub sheet: PathBuf,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the sheet file
    pub sheet: PathBuf,
}
