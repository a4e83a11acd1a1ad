mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::CliError;
use crate::logging::init_tracing;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(&cli);
    init_tracing();
    tracing::debug!(?config, "Resolved configuration");

    let output = commands::run(&cli, &config).await?;
    let stdout = std::io::stdout();
    output::render(&output, cli.format, cli.pretty, &mut stdout.lock())?;
    Ok(())
}
