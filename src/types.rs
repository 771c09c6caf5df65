//! Core types for fms-report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The report being assembled, filled in incrementally as the user
/// completes each step. One active draft per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionDraft {
    /// Short description of the problem
    pub subject: String,
    /// Reporter's name
    pub reporter_name: String,
    /// Reporter's email address
    pub reporter_email: String,
    /// Path to the photo of the problem, once taken
    pub photo_path: Option<PathBuf>,
    /// Latitude of the accepted GPS fix
    pub latitude: Option<f64>,
    /// Longitude of the accepted GPS fix
    pub longitude: Option<f64>,
}

/// One reading from a location source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Estimated horizontal accuracy in meters (0 = no accuracy data yet)
    pub accuracy_meters: f64,
    /// When the fix was produced
    pub timestamp: DateTime<Utc>,
}

/// Terminal outcome of one submission attempt
///
/// Exactly one of these is produced per `submit` call; there is no partial
/// success. All failure variants leave the draft intact for retry.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The server accepted the report (body was exactly `"SUCCESS"`)
    Success {
        /// Latitude that was submitted
        latitude: f64,
        /// Longitude that was submitted
        longitude: f64,
    },
    /// No location reading was available at submission time
    LocationUnavailable,
    /// A reading was available but failed the accuracy/staleness checks
    LocationInaccurate,
    /// The photo file is missing or empty
    PhotoMissing,
    /// Transport-level failure (timeout, refused connection, I/O)
    NetworkError(String),
    /// The server responded with something other than `"SUCCESS"`
    ServerRejected(String),
}

impl UploadOutcome {
    /// Whether this outcome is the successful one
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// User-facing notice naming the likely cause and a remedy
    pub fn notice(&self) -> String {
        match self {
            Self::Success {
                latitude,
                longitude,
            } => format!("Report submitted for location {latitude}, {longitude}."),
            Self::LocationUnavailable => {
                "Could not get location! Can you see the sky? Please try again later.".to_string()
            }
            Self::LocationInaccurate => {
                "Sorry, your GPS location is not accurate enough. Can you see the sky?".to_string()
            }
            Self::PhotoMissing => "Photo not found!".to_string(),
            Self::NetworkError(detail) => format!(
                "Sorry, there was an error uploading - maybe the network connection is down? \
                 Please try again later. ({detail})"
            ),
            Self::ServerRejected(body) => format!(
                "Sorry, there was an error uploading. Please try again later. \
                 The server response was: {body}"
            ),
        }
    }
}
