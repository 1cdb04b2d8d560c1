#![recursion_limit = "256"]

mod cli;
mod application;
mod domain;
mod data;
mod features;
mod ml;
mod infra;
mod report;

use anyhow::Result;
use cli::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("review_sentiment=info")),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
