//! confprov CLI library.
//!
//! This library provides the core functionality for the `confprov` command-line
//! interface, including configuration management, command execution, and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

/// Run a parsed command line and print what it rendered.
pub fn execute(cli: Cli, config: &Config) -> Result<()> {
    println!("{}", render(cli, config)?);
    Ok(())
}

/// Run a parsed command line against loaded CLI configuration and return
/// its rendered output.
pub fn render(cli: Cli, config: &Config) -> Result<String> {
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);
    let loader = &config.loader;

    match cli.command {
        Command::Show(args) => commands::execute_show(args, loader, &formatter),
        Command::Source(args) => commands::execute_source(args, loader, &formatter),
        Command::List(args) => commands::execute_list(args, loader, &formatter),
        Command::Export(args) => commands::execute_export(args, loader, &formatter),
        Command::Save(args) => commands::execute_save(args, loader, &formatter),
        Command::Inspect(args) => commands::execute_inspect(args, &formatter),
    }
}
