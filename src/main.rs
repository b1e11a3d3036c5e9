//! `sheetsync` (ssy) - sheet/tracker reconciliation
//!
//! Keeps a local work-item sheet and a remote issue tracker in agreement.
//! Single-threaded and synchronous: one tracker call in flight at a time.

use sheetsync::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
