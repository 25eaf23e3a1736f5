mod analytics;
mod args;
mod error;
mod loader;
mod runner;

use crate::args::Args;
use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    args.validate();

    info!(
        "Processing benchmark results under {}",
        args.results_dir.display()
    );
    runner::run(args)?;
    info!("Finished processing benchmark results.");
    Ok(())
}
