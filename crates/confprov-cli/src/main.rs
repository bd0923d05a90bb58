//! confprov CLI - Inspect provenance of layered experiment configuration.

use clap::Parser;
use confprov_cli::{Cli, Config, Formatter};
use confprov_cli::config::OutputFormat;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        let formatter = Formatter::new(OutputFormat::Table, true);
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

fn run() -> confprov_cli::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Log to stderr; RUST_LOG wins over -v and the config file
    let level = cli.log_filter().unwrap_or(config.settings.log_level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    confprov_cli::execute(cli, &config)
}
