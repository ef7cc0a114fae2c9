//! Threshold bundle for the geometric month-start rule.

use serde::{Deserialize, Serialize};

/// Configurable crescent visibility thresholds at sunset.
///
/// Used only by the geometric month-start rule. Lag and altitude are strict
/// lower bounds; age and elongation are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrescentVisibilityCriteria {
    /// Moonset must follow sunset by more than this. Default: 0
    pub min_lag_minutes: f64,
    /// Moon altitude at sunset must exceed this. Default: 0
    pub min_moon_altitude_deg: f64,
    /// Hours since conjunction, at least. Default: 12
    pub min_moon_age_hours: f64,
    /// Sun-Moon elongation, at least. Default: 6
    pub min_moon_elongation_deg: f64,
}

impl Default for CrescentVisibilityCriteria {
    fn default() -> Self {
        Self {
            min_lag_minutes: 0.0,
            min_moon_altitude_deg: 0.0,
            min_moon_age_hours: 12.0,
            min_moon_elongation_deg: 6.0,
        }
    }
}

impl CrescentVisibilityCriteria {
    pub fn new(
        min_lag_minutes: f64,
        min_moon_altitude_deg: f64,
        min_moon_age_hours: f64,
        min_moon_elongation_deg: f64,
    ) -> Self {
        Self { min_lag_minutes, min_moon_altitude_deg, min_moon_age_hours, min_moon_elongation_deg }
    }

    /// Whether every threshold is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.min_lag_minutes,
            self.min_moon_altitude_deg,
            self.min_moon_age_hours,
            self.min_moon_elongation_deg,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
