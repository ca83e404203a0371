use clap::Parser;
use config::DtpSettings;
use observability::{LogAggregator, LogProducer, QueueLayer, log_queue};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod credentials;
mod output;
pub mod ux_error;

use commands::Cli;
use ux_error::UxError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (producer, receiver) = log_queue(&cli.log_name);
    init_tracing(producer.clone());

    let credentials = credentials::provider();
    let settings = match DtpSettings::load(&cli.config, &cli.mappings, credentials.as_ref()).await {
        Ok(settings) => Arc::new(settings),
        Err(e) => {
            ux_error::settings_error(&e, &cli.config, &cli.mappings).display();
            return ExitCode::FAILURE;
        }
    };

    let mut aggregator = LogAggregator::from_queue(producer, receiver, settings.log_dir());
    if let Err(e) = aggregator.start() {
        output::warn(&format!("Run log disabled: {e}"));
    }

    let result = commands::run(cli.command, settings).await;
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }

    match aggregator.shutdown() {
        Ok(report) => debug!(
            written = report.written,
            failed = report.failed,
            "Run log closed"
        ),
        Err(e) => output::warn(&format!("Run log incomplete: {e}"))
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Console output filtered by `RUST_LOG` (default `info`), with every
/// event also queued for the run log.
fn init_tracing(producer: LogProducer) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(QueueLayer::new(producer))
        .with(filter)
        .init();
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<UxError>() {
        Some(ux) => ux.display(),
        None => output::error(&format!("{err:#}"))
    }
}
