//! Baton CLI
//!
//! Command-line interface for driving staged batch pipelines on an LSF
//! cluster.

mod commands;
mod config;
mod logging;

use baton_driver::DriverError;
use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::GlobalArgs;
use std::process::ExitCode;

/// Exit status when a stage outlives the poll timeout
const TIMEOUT_EXIT_STATUS: u8 = 2;

#[derive(Parser)]
#[command(name = "baton", version)]
#[command(about = "Batch pipeline driver for LSF clusters", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.global.log.as_deref(), cli.global.log_level) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        return ExitCode::FAILURE;
    }

    match handle_command(cli.command, &cli.global).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(exit_status(&e))
        }
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<DriverError>() {
        Some(e) if e.is_timeout() => TIMEOUT_EXIT_STATUS,
        _ => 1,
    }
}
