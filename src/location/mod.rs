//! Location sources
//!
//! The platform GPS of the original client maps to the [`LocationSource`]
//! trait: something that can be asked for its most recent fix. Only the
//! latest reading matters; staleness is judged by the gate, not here.

mod command;

pub use command::CommandSource;

use crate::error::Result;
use crate::types::LocationFix;
use async_trait::async_trait;
use chrono::Utc;

/// A source of location fixes
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// The most recent fix, or `None` if the source has no reading yet
    async fn latest_fix(&self) -> Result<Option<LocationFix>>;
}

/// A source that always reports the same coordinates
///
/// Backs the `--lat`/`--lon` flags and tests. Each read carries a fresh
/// timestamp so the staleness check sees an advancing source.
#[derive(Debug, Clone)]
pub struct StaticSource {
    latitude: f64,
    longitude: f64,
    accuracy_meters: f64,
}

impl StaticSource {
    /// Create a source pinned to the given coordinates
    pub const fn new(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
        }
    }
}

#[async_trait]
impl LocationSource for StaticSource {
    async fn latest_fix(&self) -> Result<Option<LocationFix>> {
        Ok(Some(LocationFix {
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy_meters: self.accuracy_meters,
            timestamp: Utc::now(),
        }))
    }
}

/// A source that never has a reading
///
/// Stands in when no real source is configured; every read reports
/// "nothing yet".
#[derive(Debug, Clone, Copy)]
pub struct NullSource;

#[async_trait]
impl LocationSource for NullSource {
    async fn latest_fix(&self) -> Result<Option<LocationFix>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_source_reports_pinned_coordinates() {
        let source = StaticSource::new(51.5, -0.12, 10.0);
        let fix = source.latest_fix().await.unwrap().unwrap();
        assert_eq!(fix.latitude, 51.5);
        assert_eq!(fix.longitude, -0.12);
        assert_eq!(fix.accuracy_meters, 10.0);
    }

    #[tokio::test]
    async fn static_source_timestamps_advance() {
        let source = StaticSource::new(51.5, -0.12, 10.0);
        let first = source.latest_fix().await.unwrap().unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = source.latest_fix().await.unwrap().unwrap();
        assert!(second.timestamp > first.timestamp);
    }
}
