//! Tracing setup
//!
//! `RUST_LOG` takes precedence; otherwise every baton crate logs at the
//! level chosen with `--log-level`. With `--log` the output is appended to a
//! file instead of stderr.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;

const CRATES: [&str; 5] = [
    "baton",
    "baton_client",
    "baton_core",
    "baton_driver",
    "baton_ledger",
];

pub fn init(log_file: Option<&Path>, level: LogLevel) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(level).into());

    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi),
        )
        .try_init()
        .context("failed to initialize logging")
}

fn default_directives(level: LogLevel) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}
