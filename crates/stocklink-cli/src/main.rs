//! Stocklink CLI - Operator interface for the inventory sync
//!
//! Provides commands for:
//! - Running a sync pass against the remote inventory system
//! - Pre-flight validation of configuration and both connections
//! - Inspecting the location-to-warehouse mapping table

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{check::CheckCommand, mappings::MappingsCommand, sync::SyncCommand};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "stocklink", version, about = "ERP-to-cloud inventory reconciliation")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one inventory sync pass
    Sync(SyncCommand),
    /// Validate configuration and both upstream connections
    Check(CheckCommand),
    /// Show the location-to-warehouse mapping table
    Mappings(MappingsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Sync(cmd) => cmd.execute(cli.config.as_deref(), format).await,
        Commands::Check(cmd) => cmd.execute(cli.config.as_deref(), format).await,
        Commands::Mappings(cmd) => cmd.execute(cli.config.as_deref(), format).await,
    }
}
