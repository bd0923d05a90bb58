//! Source command implementation.

use crate::cli::SourceArgs;
use crate::commands::load_tracked;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use confprov_config::LoaderSettings;

/// Execute the source command.
pub fn execute_source(args: SourceArgs, settings: &LoaderSettings, formatter: &Formatter) -> Result<String> {
    let config = load_tracked(&args.dir, settings)?;

    let entry = config
        .tracker()
        .and_then(|index| index.lookup(&args.path))
        .ok_or_else(|| CliError::NotFound(args.path.clone()))?;

    formatter.format_source(&args.path, entry)
}
