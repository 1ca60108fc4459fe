//! EZPlan command line
//!
//! Usage:
//!   ezplan load templates/devices --config loader.toml
//!   ezplan reconcile scenario.yaml --json

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod load;
mod reconcile;

#[derive(Parser, Debug)]
#[command(name = "ezplan")]
#[command(version, about = "IO-Link template ingestion and operation mode reconciliation")]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a template directory and report the result
    Load(load::LoadArgs),
    /// Reconcile instance modes against generic modes from a YAML scenario
    Reconcile(reconcile::ReconcileArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Load(args) => load::run(args).await,
        Command::Reconcile(args) => reconcile::run(&args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
