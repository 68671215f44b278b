//! crimecast binary entry point.

use std::process::ExitCode;

use clap::Parser;
use crimecast::cli::Cli;
use crimecast::config::Config;
use crimecast::pipeline::Pipeline;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = crimecast::logging::init(&cli.log_file) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let config = match Config::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            error!("{}", e.report());
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(?config, "Starting run");
    let report = Pipeline::openai(&config).run().await;
    info!(succeeded = report.succeeded(), "Run finished");

    // Stage failures are in the log; they do not change the exit status.
    ExitCode::SUCCESS
}
