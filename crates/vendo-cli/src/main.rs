//! vendo CLI binary.
//!
//! Entry point for the `vendo` command-line tool. Initializes logging via
//! `tracing`, parses arguments with `clap`, and dispatches to the matching
//! command handler.

mod cli;
mod commands;

use miette::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    commands::dispatch(args).await
}
