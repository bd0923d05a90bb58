//! Inspect command implementation.

use crate::cli::InspectArgs;
use crate::commands::entries_under;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use confprov_config::ExperimentConfig;

/// Execute the inspect command.
///
/// Archived provenance describes the files as they were when the snapshot
/// was saved; it is shown as-is and never merged with a live load.
pub fn execute_inspect(args: InspectArgs, formatter: &Formatter) -> Result<String> {
    let snapshot = ExperimentConfig::load_snapshot(&args.snapshot)?;

    if snapshot.provenance.is_empty() {
        return Ok(formatter.warning("Snapshot has no archived provenance"));
    }

    match &args.path {
        Some(path) => {
            let entry = snapshot
                .provenance
                .lookup(path)
                .ok_or_else(|| CliError::NotFound(path.clone()))?;
            formatter.format_source(path, entry)
        }
        None => {
            let entries = entries_under(&snapshot.provenance, None);
            formatter.format_entries(&entries)
        }
    }
}
