//! Pipeline Controller: the state machine that drives the pre-harvest
//! action script, resolves the boundary, and runs the harvest loop to
//! completion, plus the supporting control-signal, progress, and
//! download-detection plumbing.

mod controller;
mod download;
mod progress;
mod script;
mod signals;
mod state;

pub use controller::PipelineController;
pub use progress::{ChannelProgress, NoOpProgress, ProgressEvent, ProgressReporter, TracingProgress};
pub use signals::{channel, ControlHandle, ControlSignals, StopKind};
pub use state::{FinalizeReason, PipelineState, RunResult};
