use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use unitctl::Cli;
use unitctl::commands;
use unitctl::output::Output;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing with RUST_LOG env filter
    // e.g., RUST_LOG=unitctl=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            Output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
