//! List command implementation.

use anyhow::Result;

use crate::cli::ListArgs;
use crate::model::Record;
use crate::sheet::Sheet;

/// Print the records of a sheet.
///
/// # Errors
///
/// Returns an error if the sheet cannot be read.
pub fn execute(args: &ListArgs, json: bool) -> Result<()> {
    let sheet = Sheet::load(&args.sheet)?;

    if json {
        println!("{}", serde_json::to_string_pretty(sheet.records())?);
        return Ok(());
    }

    if sheet.is_empty() {
        println!("Sheet {} is empty.", args.sheet.display());
        return Ok(());
    }

    for record in sheet.records() {
        print_record(record);
    }
    println!("{} record(s)", sheet.len());

    Ok(())
}

fn print_record(record: &Record) {
    let sequence = record
        .sequence
        .map_or_else(|| "-".to_string(), |no| no.to_string());
    let key = record.remote_key().unwrap_or("-");
    let status = if record.status.trim().is_empty() {
        "-"
    } else {
        record.status.trim()
    };

    println!(
        "{sequence:>4}  [{}] {key:<12} {status:<10} {}",
        record.sync, record.summary
    );
    if !record.assignee.is_empty() {
        println!("      assignee: {}", record.assignee);
    }
    if !record.comment.is_empty() {
        println!("      comment:  {}", record.comment);
    }
}
