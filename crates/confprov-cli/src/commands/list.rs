//! List command implementation.

use crate::cli::ListArgs;
use crate::commands::{entries_under, load_tracked};
use crate::error::Result;
use crate::output::Formatter;
use confprov_config::LoaderSettings;
use confprov_domain::ProvenanceIndex;

/// Execute the list command.
pub fn execute_list(args: ListArgs, settings: &LoaderSettings, formatter: &Formatter) -> Result<String> {
    let config = load_tracked(&args.dir, settings)?;
    let empty = ProvenanceIndex::new();
    let index = config.tracker().unwrap_or(&empty);

    let entries = entries_under(index, args.prefix.as_deref());
    formatter.format_entries(&entries)
}
