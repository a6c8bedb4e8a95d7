//! rust-toolchain-setup - Provision a local Rust toolchain directory
//!
//! Entry point for the rust-toolchain-setup command-line application.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use rust_toolchain_setup::cli::output::{display_error, OutputConfig};
use rust_toolchain_setup::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_with_metadata();

    // Apply output configuration globally
    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.apply_global();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(output_config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Run the command and handle errors
    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
