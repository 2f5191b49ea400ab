//! Command-line entry point.
//!
//! Structured as a `clap::Parser` with a single top-level command.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config;
use crate::errors::HarvestResult;
use crate::pipeline::{self, PipelineController, PipelineState, ProgressEvent, TracingProgress};

#[derive(Parser, Debug)]
#[command(name = "gallery-harvester")]
#[command(about = "Harvests generated media artifacts from an infinite-scroll gallery", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the JSON run configuration.
    pub config: PathBuf,

    /// Emit one JSON progress line per event on stdout instead of log lines.
    #[arg(long)]
    pub json_progress: bool,

    /// Minimum log level (overrides `RUST_LOG` if set).
    #[arg(long)]
    pub log_level: Option<String>,
}

fn init_tracing(log_level: Option<&str>) {
    let filter = log_level
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Run the harvester to completion and return the process exit code: `0`
/// success, `1` generic failure, `2` cancelled, `3` config error, `4`
/// browser error, `5` log corruption.
pub async fn run(cli: Cli) -> i32 {
    init_tracing(cli.log_level.as_deref());

    let (handle, mut signals) = pipeline::channel();
    install_signal_handler(handle);

    match run_inner(&cli, &mut signals).await {
        Ok(result) => {
            if result.is_success() {
                tracing::info!(downloads = result.downloads, "harvest completed");
                0
            } else {
                tracing::warn!(?result.final_state, ?result.reason, "harvest did not complete successfully");
                if result.final_state == PipelineState::Cancelled { 2 } else { 1 }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "harvest failed");
            e.exit_code()
        }
    }
}

async fn run_inner(cli: &Cli, signals: &mut pipeline::ControlSignals) -> HarvestResult<pipeline::RunResult> {
    let config = config::load_from_file(&cli.config).await?;
    let mut controller = PipelineController::new(config);

    if cli.json_progress {
        let mut reporter = JsonProgress;
        controller.run(signals, &mut reporter).await
    } else {
        let mut reporter = TracingProgress;
        controller.run(signals, &mut reporter).await
    }
}

/// Prints one JSON object per line to stdout, for callers that parse
/// progress programmatically rather than scraping logs.
struct JsonProgress;

impl pipeline::ProgressReporter for JsonProgress {
    fn report(&mut self, event: ProgressEvent) {
        let line = match event {
            ProgressEvent::Progress { current, total, status } => {
                serde_json::json!({"type": "progress", "current": current, "total": total, "status": status})
            }
            ProgressEvent::State(state) => serde_json::json!({"type": "state", "state": format!("{state:?}")}),
            ProgressEvent::Error(message) => serde_json::json!({"type": "error", "message": message}),
        };
        println!("{line}");
    }
}

/// First `Ctrl-C` requests a graceful stop; a second (while one is already
/// in flight) escalates to the emergency stop.
fn install_signal_handler(handle: pipeline::ControlHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::info!("stop requested, finishing the current container before exiting");
        handle.stop();
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("second stop request received, cancelling in-flight download");
        handle.stop_emergency();
    });
}
