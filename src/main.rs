use anyhow::Result;
use clap::Parser;
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use med_assist_shim::config::Config;
use med_assist_shim::dispatch::{Mode, dispatch, render_outcome};
use med_assist_shim::error::ShimError;

/// Reads one JSON request on stdin and writes one JSON envelope on stdout
#[derive(Parser)]
#[command(name = "med-assist-shim")]
#[command(version, about = "Medical chat, article and location backend for the web app", long_about = None)]
struct Cli {
    /// Request mode
    #[arg(value_enum, default_value_t = Mode::Chat)]
    mode: Mode,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Stdout carries the response envelope, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Arc::new(Config::load());

    let (json, status) = render_outcome(run(cli.mode, config).await);
    println!("{json}");
    Ok(ExitCode::from(status))
}

async fn run(mode: Mode, config: Arc<Config>) -> Result<serde_json::Value, ShimError> {
    let mut body = String::new();
    std::io::stdin().read_to_string(&mut body)?;

    let mut handlers = med_assist_shim::gemini_handlers(config)?;
    dispatch(&mut handlers, mode, &body).await
}
