//! Month-start estimate: the common output of every visibility estimator.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How likely the new crescent is to be seen on an evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Likelihood {
    Low,
    Medium,
    High,
    /// No sunset was found for the date (polar day or night).
    Unknown,
}

impl Likelihood {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Likelihood::Unknown)
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Likelihood::Low => "low",
            Likelihood::Medium => "medium",
            Likelihood::High => "high",
            Likelihood::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Yallop (1997) visibility zones, from easily visible (A) to not visible (F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum YallopZone {
    /// Easily visible to the naked eye.
    A,
    /// Visible under perfect conditions.
    B,
    /// May need optical aid to find the crescent.
    C,
    /// Will need optical aid.
    D,
    /// Not visible with a telescope.
    E,
    /// Not visible, below the Danjon limit.
    F,
}

impl fmt::Display for YallopZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Odeh (2004) visibility zones, from naked-eye visible (A) to not visible (D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OdehZone {
    /// Visible by naked eye.
    A,
    /// Visible by optical aid, could be seen by naked eye.
    B,
    /// Visible by optical aid only.
    C,
    /// Not visible even with optical aid.
    D,
}

impl fmt::Display for OdehZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Flat bag of per-evening measurements. Every field is optional; absent
/// values render as a placeholder upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moonrise_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moonset_utc: Option<DateTime<Utc>>,
    /// Moonset minus sunset. Negative when the Moon set before the Sun.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_altitude_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_azimuth_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_altitude_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_azimuth_deg: Option<f64>,
    /// Moon azimuth minus Sun azimuth, wrapped to [-180, 180).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_azimuth_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elongation_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_age_hours: Option<f64>,
    /// Illuminated fraction of the lunar disc (0..1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub illumination_fraction: Option<f64>,
    /// Geocentric phase as a fraction of the lunation: 0 new, 0.5 full.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moon_phase_fraction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_percent: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_time_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_time_moon_altitude_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_time_moon_azimuth_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_time_sun_altitude_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_time_sun_azimuth_deg: Option<f64>,
    /// Illuminated fraction at the best time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_time_illumination_fraction: Option<f64>,
    /// Best-time Moon altitude minus Sun altitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcv_deg: Option<f64>,
    /// Sun-Moon elongation at the best time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arcl_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crescent_width_arcmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yallop_q: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yallop_zone: Option<YallopZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odeh_v: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odeh_zone: Option<OdehZone>,
}

fn iso(dt: Option<DateTime<Utc>>) -> Option<String> {
    dt.map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl EstimateMetrics {
    /// Sunset as an ISO-8601 UTC string (`2026-02-17T15:27:12.000Z`).
    pub fn sunset_utc_iso(&self) -> Option<String> {
        iso(self.sunset_utc)
    }

    pub fn moonset_utc_iso(&self) -> Option<String> {
        iso(self.moonset_utc)
    }

    pub fn sunrise_utc_iso(&self) -> Option<String> {
        iso(self.sunrise_utc)
    }

    pub fn moonrise_utc_iso(&self) -> Option<String> {
        iso(self.moonrise_utc)
    }

    pub fn best_time_utc_iso(&self) -> Option<String> {
        iso(self.best_time_utc)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Verdict for one (date, location) evening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthStartEstimate {
    pub likelihood: Likelihood,
    pub metrics: EstimateMetrics,
}

impl MonthStartEstimate {
    pub fn new(likelihood: Likelihood, metrics: EstimateMetrics) -> Self {
        Self { likelihood, metrics }
    }

    /// The "no sunset found" verdict: unknown likelihood and an empty metrics bag.
    pub fn unknown() -> Self {
        Self { likelihood: Likelihood::Unknown, metrics: EstimateMetrics::default() }
    }

    pub fn is_unknown(&self) -> bool {
        self.likelihood.is_unknown()
    }
}
