use anyhow::Result;
use clap::Parser;

use xcrunner::Xcrunner;

fn main() -> Result<()> {
    // Initialize tracing based on RUST_LOG env var
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    Xcrunner::parse().command.execute()
}
