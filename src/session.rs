//! Report session - one pass through the reporting flow
//!
//! The ambient activity state of the original client maps to an explicit
//! session object: it owns the draft, the readiness gate and the live
//! location subscription, is constructed on entering the flow and dropped
//! on leaving it.

use crate::error::{Error, Result};
use crate::gate::{GateDecision, ReadinessGate};
use crate::location::LocationSource;
use crate::progress::{Phase, ReportProgress};
use crate::types::{SubmissionDraft, UploadOutcome};
use crate::upload::Uploader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How often the live subscription polls the source
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Session-scoped reporting state
pub struct ReportSession {
    draft: SubmissionDraft,
    gate: ReadinessGate,
    source: Arc<dyn LocationSource>,
}

impl ReportSession {
    /// Start a session subscribed to the given location source
    pub fn new(source: Arc<dyn LocationSource>) -> Self {
        Self {
            draft: SubmissionDraft::default(),
            gate: ReadinessGate::new(),
            source,
        }
    }

    /// Record the details step on both the draft and the gate
    pub fn set_details(&mut self, subject: &str, name: &str, email: &str) {
        self.draft.subject = subject.to_string();
        self.draft.reporter_name = name.to_string();
        self.draft.reporter_email = email.to_string();
        self.gate.set_details(subject, name, email);
    }

    /// Record the photo step
    pub fn set_photo(&mut self, path: Option<PathBuf>) {
        self.gate.set_photo_acquired(path.is_some());
        self.draft.photo_path = path;
    }

    /// Take one reading from the source and feed it through the gate
    ///
    /// Returns the gate's decision, or `None` if the source has no reading
    /// yet. An accepted fix updates the draft's coordinates.
    pub async fn poll_location(&mut self) -> Result<Option<GateDecision>> {
        let Some(fix) = self.source.latest_fix().await? else {
            return Ok(None);
        };
        let decision = self.gate.observe(&fix);
        if decision.is_accepted() {
            self.draft.latitude = Some(fix.latitude);
            self.draft.longitude = Some(fix.longitude);
        }
        Ok(Some(decision))
    }

    /// Poll the source until a fix is accepted or the deadline passes
    ///
    /// Each decision's status string is surfaced through `progress`.
    /// Returns whether a fix was accepted.
    pub async fn wait_for_fix(
        &mut self,
        interval: Duration,
        max_wait: Duration,
        progress: &dyn ReportProgress,
    ) -> Result<bool> {
        progress.on_phase(Phase::AcquiringFix).await;
        let deadline = tokio::time::Instant::now() + max_wait;

        loop {
            match self.poll_location().await? {
                Some(decision) => {
                    progress.on_fix_status(decision.message()).await;
                    if decision.is_accepted() {
                        return Ok(true);
                    }
                }
                None => {
                    progress.on_fix_status("Waiting for a GPS reading...").await;
                }
            }
            if tokio::time::Instant::now() + interval > deadline {
                return Ok(false);
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Whether all three submission preconditions hold
    pub const fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Which preconditions are still missing, for display
    pub fn missing(&self) -> Vec<&'static str> {
        self.gate.missing()
    }

    /// The draft as assembled so far
    pub const fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    /// Submit the draft once, off the interactive path
    ///
    /// Refuses when the gate is not satisfied. The attempt runs on a
    /// background task and delivers exactly one outcome back through its
    /// join handle. On success the draft is reset for the next report;
    /// failures leave it intact so the user may retry.
    pub async fn submit(
        &mut self,
        uploader: Arc<Uploader>,
        progress: &dyn ReportProgress,
    ) -> Result<UploadOutcome> {
        if !self.gate.is_ready() {
            return Err(Error::NotReady(self.missing().join(", ")));
        }

        progress.on_phase(Phase::Uploading).await;

        let draft = self.draft.clone();
        let source = Arc::clone(&self.source);
        let attempt =
            tokio::spawn(async move { uploader.submit(&draft, source.as_ref()).await });

        let outcome = attempt
            .await
            .map_err(|e| Error::Internal(format!("upload task failed: {e}")))??;

        progress.on_phase(Phase::Complete).await;
        progress.on_outcome(&outcome).await;

        if outcome.is_success() {
            info!("report accepted, resetting draft");
            self.draft = SubmissionDraft::default();
            self.gate = ReadinessGate::new();
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::StaticSource;
    use crate::progress::NoopProgress;

    fn session_with_good_source() -> ReportSession {
        ReportSession::new(Arc::new(StaticSource::new(51.5, -0.12, 10.0)))
    }

    #[tokio::test]
    async fn poll_location_feeds_the_gate() {
        let mut session = session_with_good_source();
        let decision = session.poll_location().await.unwrap().unwrap();
        assert!(decision.is_accepted());
        assert_eq!(session.draft().latitude, Some(51.5));
        assert_eq!(session.draft().longitude, Some(-0.12));
    }

    #[tokio::test]
    async fn readiness_requires_all_three_steps() {
        let mut session = session_with_good_source();
        assert!(!session.is_ready());

        session.set_details("Pothole", "Jo", "jo@example.com");
        session.set_photo(Some(PathBuf::from("/tmp/photo.jpg")));
        assert!(!session.is_ready()); // no fix observed yet

        session.poll_location().await.unwrap();
        assert!(session.is_ready());
    }

    #[tokio::test]
    async fn inaccurate_source_never_becomes_ready() {
        let mut session =
            ReportSession::new(Arc::new(StaticSource::new(51.5, -0.12, 150.0)));
        session.set_details("Pothole", "Jo", "jo@example.com");
        session.set_photo(Some(PathBuf::from("/tmp/photo.jpg")));

        let accepted = session
            .wait_for_fix(
                Duration::from_millis(5),
                Duration::from_millis(30),
                &NoopProgress,
            )
            .await
            .unwrap();
        assert!(!accepted);
        assert!(!session.is_ready());
    }

    #[tokio::test]
    async fn submit_refuses_when_not_ready() {
        let mut session = session_with_good_source();
        let result = session
            .submit(Arc::new(Uploader::new()), &NoopProgress)
            .await;
        assert!(matches!(result, Err(Error::NotReady(_))));
    }

    #[tokio::test]
    async fn clearing_the_photo_revokes_readiness() {
        let mut session = session_with_good_source();
        session.set_details("Pothole", "Jo", "jo@example.com");
        session.set_photo(Some(PathBuf::from("/tmp/photo.jpg")));
        session.poll_location().await.unwrap();
        assert!(session.is_ready());

        session.set_photo(None);
        assert!(!session.is_ready());
        assert!(session.missing().contains(&"photo"));
    }
}
