//! Helper-command location source
//!
//! Runs a user-configured command (`termux-location`, a `gpspipe` wrapper,
//! `CoreLocationCLI -json`, ...) and parses one JSON object from its
//! stdout. The expected shape follows termux-location:
//!
//! ```json
//! { "latitude": 51.5, "longitude": -0.12, "accuracy": 8.0,
//!   "time": "2026-08-23T12:00:00Z" }
//! ```
//!
//! `time` is optional; a reading without one is stamped at parse time.

use crate::error::{Error, Result};
use crate::location::LocationSource;
use crate::types::LocationFix;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

/// Raw reading as printed by the helper command
#[derive(Debug, Deserialize)]
struct RawReading {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    accuracy: f64,
    #[serde(default)]
    time: Option<DateTime<Utc>>,
}

/// A location source that shells out to a helper command per read
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    /// Create a source from a full command line, split on whitespace
    ///
    /// Returns `None` for a blank command line.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl LocationSource for CommandSource {
    async fn latest_fix(&self) -> Result<Option<LocationFix>> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| Error::LocationSource(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(Error::LocationSource(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            // The helper ran but has no reading yet
            return Ok(None);
        }

        let raw: RawReading = serde_json::from_str(trimmed)
            .map_err(|e| Error::LocationSource(format!("unparseable reading: {e}")))?;

        let fix = LocationFix {
            latitude: raw.latitude,
            longitude: raw.longitude,
            accuracy_meters: raw.accuracy,
            timestamp: raw.time.unwrap_or_else(Utc::now),
        };
        debug!(?fix, "read fix from {}", self.program);
        Ok(Some(fix))
    }
}
