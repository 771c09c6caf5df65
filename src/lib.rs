//! fms-report - report street problems to FixMyStreet
//!
//! Library crate behind the `fms` binary. The flow mirrors the original
//! mobile client: collect a subject and contact details, point at a photo
//! of the problem, wait for a GPS fix of sufficient quality, then POST one
//! multipart report to the FixMyStreet import endpoint.
//!
//! The two load-bearing pieces are the [`gate::ReadinessGate`], which
//! decides per location fix whether a submission may proceed, and the
//! [`upload::Uploader`], which performs exactly one submission attempt and
//! classifies its terminal outcome.

pub mod error;
pub mod gate;
pub mod location;
pub mod prefs;
pub mod progress;
pub mod session;
pub mod types;
pub mod upload;
