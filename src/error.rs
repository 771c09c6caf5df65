//! Error types for fms-report

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the library
///
/// Terminal submission outcomes (server rejection, missing photo, bad fix)
/// are *not* errors - they are [`crate::types::UploadOutcome`] variants.
/// This enum covers sequencing and environment failures.
#[derive(Debug, Error)]
pub enum Error {
    /// A submission attempt was triggered while another was in flight
    #[error("an upload is already in flight; wait for it to finish")]
    UploadInFlight,

    /// Submission was requested before every precondition was met
    #[error("not ready to submit: {0}")]
    NotReady(String),

    /// The location helper command failed or produced unusable output
    #[error("location source error: {0}")]
    LocationSource(String),

    /// Filesystem error (photo or preferences)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON (preferences file or helper command output)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No platform config directory to store preferences in
    #[error("could not determine a config directory for preferences")]
    NoConfigDir,

    /// Invariant violation that should not happen in practice
    #[error("internal error: {0}")]
    Internal(String),
}
