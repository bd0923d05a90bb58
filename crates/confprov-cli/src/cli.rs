//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// confprov - Inspect where experiment configuration values come from.
#[derive(Debug, Parser)]
#[command(name = "confprov")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CONFPROV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (paths only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the merged configuration or one value
    Show(ShowArgs),

    /// Print where one parameter was set
    Source(SourceArgs),

    /// List tracked parameters
    List(ListArgs),

    /// Write the provenance tree as JSON
    Export(ExportArgs),

    /// Write the metadata snapshot
    Save(SaveArgs),

    /// Read provenance archived in a saved snapshot
    Inspect(InspectArgs),
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Configuration directory
    pub dir: PathBuf,

    /// Dotted parameter path (e.g. DEFAULT.EXPID)
    pub path: Option<String>,
}

/// Arguments for the source command.
#[derive(Debug, Parser)]
pub struct SourceArgs {
    /// Configuration directory
    pub dir: PathBuf,

    /// Dotted parameter path
    pub path: String,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Configuration directory
    pub dir: PathBuf,

    /// Only list parameters under this dotted prefix
    #[arg(short, long)]
    pub prefix: Option<String>,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Configuration directory
    pub dir: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "provenance.json")]
    pub output: PathBuf,
}

/// Arguments for the save command.
#[derive(Debug, Parser)]
pub struct SaveArgs {
    /// Configuration directory
    pub dir: PathBuf,
}

/// Arguments for the inspect command.
#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Saved snapshot file
    pub snapshot: PathBuf,

    /// Dotted parameter path to look up
    pub path: Option<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl Cli {
    /// Log filter implied by `-v` flags, if any were given
    pub fn log_filter(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
