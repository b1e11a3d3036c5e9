//! Init command implementation.

use anyhow::{Result, bail};

use crate::cli::InitArgs;
use crate::sheet::Sheet;

/// Create an empty sheet file at the given path.
///
/// # Errors
///
/// Returns an error if the file already exists or cannot be written.
pub fn execute(args: &InitArgs, json: bool) -> Result<()> {
    if args.sheet.exists() {
        bail!("sheet already exists: {}", args.sheet.display());
    }

    Sheet::new().save(&args.sheet)?;

    if json {
        println!(
            "{}",
            serde_json::json!({"created": args.sheet.display().to_string()})
        );
    } else {
        println!("Created empty sheet {}", args.sheet.display());
    }

    Ok(())
}
