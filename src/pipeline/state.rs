//! Pipeline Controller state machine.

use std::path::PathBuf;

/// `idle → initializing → logging_in → resolving_boundary → harvesting →
/// finalizing → {done, failed, cancelled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Initializing,
    LoggingIn,
    ResolvingBoundary,
    Harvesting,
    Finalizing,
    Done,
    Failed,
    Cancelled,
}

impl PipelineState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }
}

/// Why the controller transitioned into `finalizing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeReason {
    MaxDownloadsReached,
    DuplicateReached,
    DuplicateRun,
    EndOfGalleryAssumed,
    ScrollCapExceeded,
    ExternalStop,
    ExternalStopEmergency,
    ActionScriptCompleted,
    ExtractionFailuresExceeded,
    Error,
}

/// Terminal result record emitted by every exit path.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub final_state: PipelineState,
    pub reason: Option<FinalizeReason>,
    pub actions_completed: usize,
    pub total_actions: usize,
    pub downloads: u64,
    pub errors: Vec<String>,
    pub outputs: Vec<PathBuf>,
}

impl RunResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.final_state == PipelineState::Done
    }
}
