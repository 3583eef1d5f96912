#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error, info};
use uptime::{
    CancellationToken, CycleDispatcher, EndpointDescriptor, HttpChecker, MonitorSettings,
    MonitoringScheduler, Reporter, load_endpoints,
};

mod error;

use error::AppError;
use logger::init_tracing;

/// Monitor the health of endpoints listed in a YAML file
#[derive(Debug, Parser)]
#[command(name = "uppe-monitor")]
struct Cli {
    /// Path to the YAML file containing endpoints
    endpoint_file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    // Startup failures surface before the runtime or the loop exist.
    let endpoints = load_endpoints(&cli.endpoint_file)?;
    let settings = MonitorSettings::load_default()?;
    debug!("{settings}");

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(monitor(endpoints, &settings))
}

async fn monitor(
    endpoints: Vec<EndpointDescriptor>,
    settings: &MonitorSettings,
) -> Result<(), AppError> {
    let checker = Arc::new(HttpChecker::new(settings)?);
    let mut scheduler = MonitoringScheduler::new(
        endpoints,
        CycleDispatcher::new(checker),
        Reporter::stdout(),
        settings.interval(),
    );

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, stopping monitor");
                trigger.cancel();
            }
            // The default SIGINT disposition still terminates the process.
            Err(e) => error!("Failed to listen for Ctrl+C: {e}"),
        }
    });

    scheduler.run(&cancel).await?;
    Ok(())
}
