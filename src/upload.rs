//! Upload sequencer - one submission attempt, one terminal outcome
//!
//! Builds the multipart report and POSTs it to the FixMyStreet import
//! endpoint. Exactly one attempt is made per call, at most one call is in
//! flight at a time, and every call ends in exactly one
//! [`UploadOutcome`]. Photo and location are re-validated at entry rather
//! than trusting the readiness gate (defense in depth).

use crate::error::{Error, Result};
use crate::gate;
use crate::location::LocationSource;
use crate::types::{SubmissionDraft, UploadOutcome};
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use url::Url;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Where reports go
pub const REPORT_ENDPOINT: &str = "https://www.fixmystreet.com/import";

/// Bounded connection timeout for the single upload attempt, in seconds
const UPLOAD_TIMEOUT_SECS: u64 = 100;

/// Constant `service` field naming the reporting device
const SERVICE_FIELD: &str = "your command line";

/// Clears the in-flight flag on every exit path
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Performs submission attempts
///
/// Reusable across attempts; holds the HTTP client, the target endpoint and
/// the previous-timestamp watermark used for the entry staleness check.
pub struct Uploader {
    client: Client,
    endpoint: Url,
    in_flight: AtomicBool,
    last_seen_timestamp: Mutex<Option<DateTime<Utc>>>,
}

impl Uploader {
    /// Create an uploader targeting the real FixMyStreet endpoint
    pub fn new() -> Self {
        let endpoint = Url::parse(REPORT_ENDPOINT).expect("literal URL");
        Self::with_endpoint(endpoint)
    }

    /// Create an uploader targeting a custom endpoint (testing, cobrands)
    pub fn with_endpoint(endpoint: Url) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint,
            in_flight: AtomicBool::new(false),
            last_seen_timestamp: Mutex::new(None),
        }
    }

    /// Perform one submission attempt
    ///
    /// Entry checks run before any network I/O: the photo file must exist
    /// and be non-empty, and a fresh location read must pass the same
    /// accuracy/staleness rules the gate applies. A second call while one
    /// is in flight is refused with [`Error::UploadInFlight`].
    ///
    /// Every other failure is a terminal [`UploadOutcome`], not an error.
    pub async fn submit(
        &self,
        draft: &SubmissionDraft,
        source: &dyn LocationSource,
    ) -> Result<UploadOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::UploadInFlight);
        }
        let _guard = FlightGuard(&self.in_flight);

        // Photo first: no network I/O without one.
        let Some(photo_path) = draft.photo_path.as_deref() else {
            return Ok(UploadOutcome::PhotoMissing);
        };
        match tokio::fs::metadata(photo_path).await {
            Ok(meta) if meta.len() > 0 => {}
            _ => return Ok(UploadOutcome::PhotoMissing),
        }

        // Fresh location read, validated independently of the gate.
        let Some(fix) = source.latest_fix().await? else {
            warn!("no location reading at submission time");
            return Ok(UploadOutcome::LocationUnavailable);
        };
        let previous = {
            let mut last = self
                .last_seen_timestamp
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            last.replace(fix.timestamp)
        };
        if let Err(reason) = gate::assess_fix(&fix, previous) {
            warn!(?reason, "fresh fix failed entry validation");
            return Ok(UploadOutcome::LocationInaccurate);
        }

        let photo_bytes = match tokio::fs::read(photo_path).await {
            Ok(bytes) => bytes,
            Err(e) => return Ok(UploadOutcome::NetworkError(e.to_string())),
        };

        let lat = fix.latitude;
        let lon = fix.longitude;

        let photo = match Part::bytes(photo_bytes)
            .file_name("photo")
            .mime_str("image/jpeg")
        {
            Ok(part) => part,
            Err(e) => return Ok(UploadOutcome::NetworkError(e.to_string())),
        };
        let form = Form::new()
            .text("service", SERVICE_FIELD)
            .text("subject", draft.subject.clone())
            .text("name", draft.reporter_name.clone())
            .text("email", draft.reporter_email.clone())
            .text("lat", lat.to_string())
            .text("lon", lon.to_string())
            .part("photo", photo);

        debug!(endpoint = %self.endpoint, lat, lon, "posting report");

        // One attempt, no retry. The response (and with it the connection)
        // is consumed or dropped before this function returns.
        let response = match self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(UploadOutcome::NetworkError(e.to_string())),
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Ok(UploadOutcome::NetworkError(e.to_string())),
        };

        Ok(classify_body(body, lat, lon))
    }
}

impl Default for Uploader {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a completed HTTP response body to its outcome
///
/// Success is recognized only by an exact-match `"SUCCESS"` body; anything
/// else is carried back verbatim as a rejection.
fn classify_body(body: String, latitude: f64, longitude: f64) -> UploadOutcome {
    if body == "SUCCESS" {
        UploadOutcome::Success {
            latitude,
            longitude,
        }
    } else {
        UploadOutcome::ServerRejected(body)
    }
}
