//! Readiness gate - decides when a report may be submitted
//!
//! Three preconditions must hold before a submission is allowed: the
//! details step is complete (subject, name, valid email), a photo has been
//! taken, and a GPS fix of sufficient quality has been observed. Location
//! fixes stream through [`ReadinessGate::observe`], which judges each one
//! and records the coordinates of the latest accepted fix.

use crate::types::LocationFix;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Worst acceptable horizontal accuracy, in meters
pub const MAX_ACCURACY_METERS: f64 = 24.0;

/// Email shape accepted by the details step
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,4}$").expect("literal regex")
});

/// Why a fix was judged unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixRejection {
    /// Horizontal accuracy was worse than [`MAX_ACCURACY_METERS`]
    Inaccurate,
    /// The timestamp did not advance since the previous reading
    Stale,
    /// The reading carried no accuracy estimate at all
    NoAccuracyData,
}

impl FixRejection {
    /// Human-readable status naming the failed condition
    pub const fn message(self) -> &'static str {
        match self {
            Self::Inaccurate => "GPS fix is not accurate enough yet. Can you see the sky?",
            Self::Stale => "GPS has not produced a new fix since the last reading. Waiting...",
            Self::NoAccuracyData => "GPS fix has no accuracy estimate yet. Waiting...",
        }
    }
}

/// Outcome of observing one location fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Fix accepted; its coordinates are now the draft's location
    Accepted,
    /// Fix not yet usable
    Rejected(FixRejection),
}

impl GateDecision {
    /// Human-readable status for display
    pub const fn message(self) -> &'static str {
        match self {
            Self::Accepted => "GPS fix acquired.",
            Self::Rejected(reason) => reason.message(),
        }
    }

    /// Whether the fix was accepted
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Judge one fix against the accuracy and staleness rules
///
/// `previous` is the timestamp of the reading seen immediately before this
/// one; an equal timestamp means the source has stalled. Check order
/// matters: a zero-accuracy reading from a stalled source reports the stall.
pub fn assess_fix(
    fix: &LocationFix,
    previous: Option<DateTime<Utc>>,
) -> Result<(), FixRejection> {
    if fix.accuracy_meters > MAX_ACCURACY_METERS {
        return Err(FixRejection::Inaccurate);
    }
    if previous == Some(fix.timestamp) {
        return Err(FixRejection::Stale);
    }
    if fix.accuracy_meters == 0.0 {
        return Err(FixRejection::NoAccuracyData);
    }
    Ok(())
}

/// Whether a details field is non-blank
pub fn field_is_valid(field: &str) -> bool {
    !field.trim().is_empty()
}

/// Whether an email address looks deliverable
pub fn email_is_valid(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Tracks the three submission preconditions
///
/// Never fails: every observed fix produces a decision plus a status
/// message. Purely synchronous.
#[derive(Debug, Default)]
pub struct ReadinessGate {
    has_details: bool,
    has_photo: bool,
    has_accurate_fix: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
    previous_timestamp: Option<DateTime<Utc>>,
}

impl ReadinessGate {
    /// Create a gate with no preconditions met
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the details step; all three fields must pass validation
    pub fn set_details(&mut self, subject: &str, name: &str, email: &str) {
        self.has_details =
            field_is_valid(subject) && field_is_valid(name) && email_is_valid(email);
        debug!(has_details = self.has_details, "details updated");
    }

    /// Record whether a photo has been taken
    pub fn set_photo_acquired(&mut self, acquired: bool) {
        self.has_photo = acquired;
    }

    /// Judge one location fix, recording its coordinates if accepted
    ///
    /// The stored previous timestamp advances to this fix's timestamp
    /// regardless of the decision, so the next reading is compared against
    /// this one.
    pub fn observe(&mut self, fix: &LocationFix) -> GateDecision {
        let decision = match assess_fix(fix, self.previous_timestamp) {
            Ok(()) => {
                self.latitude = Some(fix.latitude);
                self.longitude = Some(fix.longitude);
                self.has_accurate_fix = true;
                GateDecision::Accepted
            }
            Err(reason) => GateDecision::Rejected(reason),
        };
        self.previous_timestamp = Some(fix.timestamp);

        debug!(
            accuracy = fix.accuracy_meters,
            timestamp = %fix.timestamp,
            status = decision.message(),
            "observed fix"
        );
        decision
    }

    /// Whether all three preconditions hold
    pub const fn is_ready(&self) -> bool {
        self.has_details && self.has_photo && self.has_accurate_fix
    }

    /// Coordinates of the latest accepted fix, if any
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Which precondition is still missing, for display
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.has_details {
            missing.push("details (subject, name, valid email)");
        }
        if !self.has_photo {
            missing.push("photo");
        }
        if !self.has_accurate_fix {
            missing.push("accurate GPS fix");
        }
        missing
    }
}
