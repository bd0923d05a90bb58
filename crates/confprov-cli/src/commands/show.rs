//! Show command implementation.

use crate::cli::ShowArgs;
use crate::commands::load_tracked;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use confprov_config::LoaderSettings;
use serde_yaml::Value;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, settings: &LoaderSettings, formatter: &Formatter) -> Result<String> {
    let config = load_tracked(&args.dir, settings)?;

    let value = match &args.path {
        Some(path) => config
            .get(path)
            .cloned()
            .ok_or_else(|| CliError::NotFound(path.clone()))?,
        None => Value::Mapping(config.data().clone()),
    };

    formatter.format_value(&value)
}
