mod app;
mod cli;
mod console;
mod error;
mod telemetry;
mod toaster;
mod views;

use clap::Parser;
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => {}
        Err(CliError::ActionFailed) => std::process::exit(1),
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let log_config = cli.logging.to_config();
    telemetry::init(&log_config).map_err(|err| CliError::Logging(err.to_string()))?;
    debug!(log_level = ?log_config.level, log_file = ?log_config.file, "logging configured");
    app::run(cli).await
}
