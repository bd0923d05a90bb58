//! Export command implementation.

use crate::cli::ExportArgs;
use crate::commands::load_tracked;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use confprov_config::LoaderSettings;

/// Execute the export command.
pub fn execute_export(args: ExportArgs, settings: &LoaderSettings, formatter: &Formatter) -> Result<String> {
    let config = load_tracked(&args.dir, settings)?;

    if !config.export_provenance(&args.output)? {
        return Err(CliError::NothingTracked);
    }

    let count = config.tracker().map_or(0, |index| index.len());
    Ok(formatter.success(&format!(
        "Exported {} parameter(s) to {}",
        count,
        args.output.display()
    )))
}
