use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::times::Prayer;

/// Errors from almuslim operations.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlmuslimError {
    /// The sun never reaches the altitude required for this event on this date.
    ///
    /// Expected at extreme latitudes around the solstices. The whole
    /// computation is rejected; no partial prayer times are produced.
    #[error("{event} is unreachable at latitude {latitude:.4}° on {date}")]
    Unreachable {
        event: Prayer,
        latitude: f64,
        date: NaiveDate,
    },

    /// Coordinates outside the valid geographic range.
    #[error("Invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Invalid configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Hijri month-start table could not be read.
    #[error("Hijri table load failed: {0}")]
    TableLoad(String),

    /// Remote lookup failure.
    #[error("Network error: {0}")]
    Network(String),
}

impl AlmuslimError {
    /// Creates an `Unreachable` error.
    pub fn unreachable(event: Prayer, latitude: f64, date: NaiveDate) -> Self {
        Self::Unreachable { event, latitude, date }
    }

    /// Creates an `InvalidConfiguration` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }

    /// True for the geometric "cannot compute" outcome.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}
