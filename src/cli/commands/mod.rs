//! Command implementations.

pub mod init;
pub mod list;
pub mod sync;
pub mod version;

use anyhow::Result;

use crate::cli::{Cli, Commands};

/// Route a parsed command line to its implementation.
///
/// # Errors
///
/// Returns an error if the command fails.
pub fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Sync(args) => sync::execute(args, cli.config.as_deref(), cli.json),
        Commands::Init(args) => init::execute(args, cli.json),
        Commands::List(args) => list::execute(args, cli.json),
        Commands::Version => version::execute(cli.json),
    }
}
