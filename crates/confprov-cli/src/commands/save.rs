//! Save command implementation.

use crate::cli::SaveArgs;
use crate::commands::load_tracked;
use crate::error::Result;
use crate::output::Formatter;
use confprov_config::LoaderSettings;

/// Execute the save command.
pub fn execute_save(args: SaveArgs, settings: &LoaderSettings, formatter: &Formatter) -> Result<String> {
    let config = load_tracked(&args.dir, settings)?;
    let replacing = config.snapshot_path().exists();
    let path = config.save()?;

    let mut output = formatter.success(&format!("Snapshot saved to {}", path.display()));
    if replacing {
        output.push('\n');
        output.push_str(&formatter.info(&format!(
            "Previous snapshot kept at {}",
            config.backup_path().display()
        )));
    }
    Ok(output)
}
