//! formgate - submit page forms from the terminal.
//!
//! Reads a page definition (the forms and their roles), submits one form per
//! invocation, and prints the resulting banner or user list.

mod cli;
mod render;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use formgate_core::Config;

/// Log file name prefix when logging to a directory
const LOG_FILE_PREFIX: &str = "formgate.log";

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let (mut config, ignored) = Config::load()?;
    if let Some(ref base_url) = cli.base_url {
        config.base_url = Some(base_url.clone());
    }

    let _guard = init_tracing(config.log_dir.as_deref());
    for skipped in &ignored {
        warn!("{}", skipped);
    }
    info!("formgate starting");

    let code = cli.run(&config).await?;

    info!("formgate done");
    Ok(code)
}
