//! Observer channel: the controller reports progress and state transitions
//! to a registered callback in emission order.

use super::state::PipelineState;

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Progress { current: u64, total: Option<u64>, status: String },
    State(PipelineState),
    Error(String),
}

/// A registered observer. `NoOpProgress` is the default for callers that
/// share the controller's execution context and don't need a queue.
pub trait ProgressReporter: Send {
    fn report(&mut self, event: ProgressEvent);
}

#[derive(Debug, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn report(&mut self, _event: ProgressEvent) {}
}

/// Forwards events to a `tracing` subscriber at an appropriate level.
#[derive(Debug, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn report(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Progress { current, total, status } => {
                tracing::info!(current, total, %status, "progress");
            }
            ProgressEvent::State(state) => {
                tracing::info!(?state, "pipeline state transition");
            }
            ProgressEvent::Error(message) => {
                tracing::warn!(%message, "pipeline error event");
            }
        }
    }
}

/// Forwards events over an unbounded channel, for callers that want to
/// observe progress from another task (e.g. a CLI progress bar).
pub struct ChannelProgress(pub tokio::sync::mpsc::UnboundedSender<ProgressEvent>);

impl ProgressReporter for ChannelProgress {
    fn report(&mut self, event: ProgressEvent) {
        let _ = self.0.send(event);
    }
}
