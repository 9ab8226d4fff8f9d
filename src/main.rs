//! Main entry point for the vaccinare-slots CLI

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use vaccinare_slots::cli::{Cli, Commands};

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing(verbose: bool) {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let default_directive = if verbose {
        "vaccinare_slots=debug"
    } else {
        "vaccinare_slots=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::GetCounties(args) => args.execute(&cli).await.map_err(|e| anyhow::anyhow!(e)),
        // No upload backend ships with the CLI; the collaborator is wired in
        // by embedders through the library API.
        Commands::GetAvailableSlots(args) => args
            .execute(&cli, None)
            .await
            .map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        error!("Command failed: {e}");
        std::process::exit(1);
    }
}
