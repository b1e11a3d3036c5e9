//! Sync command implementation.

use std::path::Path;

use anyhow::Result;

use crate::cli::SyncArgs;
use crate::config::{CliOverrides, Config};
use crate::sync::run_sync;

/// Execute the sync command.
///
/// # Errors
///
/// Returns an error for config/auth problems or sheet load/save failures;
/// per-record remote failures only show up in the counts.
pub fn execute(args: &SyncArgs, config_path: Option<&Path>, json: bool) -> Result<()> {
    let overrides = CliOverrides {
        config_path: config_path.map(Path::to_path_buf),
        base_url: args.base_url.clone(),
        project: args.project.clone(),
    };
    let config = Config::load(&overrides)?;

    let report = run_sync(&args.sheet, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Sync finished for {}", args.sheet.display());
        println!("  created:  {}", report.created);
        println!("  updated:  {}", report.updated);
        println!("  added:    {}", report.added);
        println!("  merged:   {}", report.merged);
        println!("  skipped:  {}", report.skipped);
        if report.has_failures() {
            println!("  failed:   {} (will retry next run)", report.failed);
        }
    }

    Ok(())
}
