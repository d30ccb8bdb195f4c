use serde::{Deserialize, Serialize};

use crate::AlmuslimError;

/// Observer position. Longitude is east-positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    /// Height above sea level in meters. Informational only; no correction is applied.
    pub elevation_m: Option<f64>,
}

impl GeoLocation {
    /// Creates a location, rejecting coordinates outside [-90, 90] x [-180, 180].
    pub fn new(lat: f64, lng: f64) -> Result<Self, AlmuslimError> {
        if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0 {
            return Err(AlmuslimError::InvalidCoordinate { latitude: lat, longitude: lng });
        }
        Ok(Self::new_unchecked(lat, lng))
    }

    /// Creates a location without range checks.
    pub fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng, elevation_m: None }
    }

    pub fn with_elevation(mut self, meters: f64) -> Self {
        self.elevation_m = Some(meters);
        self
    }
}
