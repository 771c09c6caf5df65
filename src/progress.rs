//! Progress callback trait for interface-agnostic status updates
//!
//! The gate's per-fix status strings and the upload phases are surfaced
//! through this trait so the CLI can render them live (spinner) while tests
//! use the no-op implementation.

use crate::types::UploadOutcome;
use async_trait::async_trait;

/// Submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for an acceptable GPS fix
    AcquiringFix,
    /// The report is being uploaded
    Uploading,
    /// A terminal outcome has been produced
    Complete,
}

/// Progress callback trait
#[async_trait]
pub trait ReportProgress: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called with the gate's status message for each observed fix
    async fn on_fix_status(&self, message: &str);

    /// Called once with the terminal outcome of a submission attempt
    async fn on_outcome(&self, outcome: &UploadOutcome);
}

/// No-op progress callback for tests and non-interactive callers
pub struct NoopProgress;

#[async_trait]
impl ReportProgress for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_fix_status(&self, _message: &str) {}
    async fn on_outcome(&self, _outcome: &UploadOutcome) {}
}
