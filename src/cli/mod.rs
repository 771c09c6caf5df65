//! CLI commands
//!
//! Command implementations for the `fms` binary.

mod check;
mod contact;
mod report;

pub use check::run_check;
pub use contact::{run_contact_set, run_contact_show};
pub use report::run_report;

use anyhow::{Result, bail};
use clap::Args;
use fms_report::location::{CommandSource, LocationSource, StaticSource};
use fms_report::progress::{Phase, ReportProgress};
use fms_report::types::UploadOutcome;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Where location readings come from
#[derive(Args, Debug)]
pub struct LocationArgs {
    /// Helper command printing one JSON reading (e.g. "termux-location")
    #[arg(long, global = true)]
    pub locate_cmd: Option<String>,

    /// Fixed latitude (use together with --lon)
    #[arg(long, global = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Fixed longitude (use together with --lat)
    #[arg(long, global = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Claimed accuracy in meters for a fixed --lat/--lon position
    #[arg(long, global = true, default_value_t = 10.0)]
    pub accuracy: f64,
}

impl LocationArgs {
    /// Build the configured source; fixed coordinates win over the helper
    pub fn build_source(&self) -> Result<Arc<dyn LocationSource>> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Ok(Arc::new(StaticSource::new(lat, lon, self.accuracy)));
        }
        if let Some(cmd) = self.locate_cmd.as_deref() {
            match CommandSource::parse(cmd) {
                Some(source) => return Ok(Arc::new(source)),
                None => bail!("--locate-cmd is blank"),
            }
        }
        bail!("no location source configured; pass --lat/--lon or --locate-cmd")
    }
}

/// Spinner-backed progress display for interactive runs
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Create a spinner that ticks while phases run
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }

    /// Stop the spinner, leaving the terminal clean
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportProgress for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::AcquiringFix => self.spinner.set_message("Waiting for a GPS fix..."),
            Phase::Uploading => self.spinner.set_message(
                "Uploading. This can take up to a minute, depending on your \
                 connection speed. Please be patient!",
            ),
            Phase::Complete => self.spinner.finish_and_clear(),
        }
    }

    async fn on_fix_status(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    async fn on_outcome(&self, _outcome: &UploadOutcome) {}
}
