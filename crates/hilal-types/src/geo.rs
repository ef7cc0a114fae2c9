//! Geographic types.

use serde::{Deserialize, Serialize};

/// Geographic coordinates (Latitude, Longitude) in decimal degrees.
///
/// No altitude: every computation assumes an observer at sea level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl GeoCoordinate {
    /// Creates a new validated coordinate.
    ///
    /// Returns `Err(HilalError::ValidationError)` if coordinates are out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, crate::HilalError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(crate::HilalError::ValidationError(format!(
                "Latitude {} out of range [-90, 90]",
                lat
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(crate::HilalError::ValidationError(format!(
                "Longitude {} out of range [-180, 180]",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Creates a coordinate without validation. Use with trusted inputs only.
    #[inline]
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}
