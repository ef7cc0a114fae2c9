//! Month-start decision rules and evening providers.

use chrono::NaiveDate;
use hilal_astronomy::odeh::odeh_month_start_estimate_with;
use hilal_astronomy::yallop::yallop_month_start_estimate_with;
use hilal_astronomy::{Ephemeris, EveningEstimator, MeeusEphemeris, VisibilityScoreModel};
use hilal_types::{CrescentVisibilityCriteria, GeoCoordinate, MonthStartEstimate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which estimator judges each evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimationMethod {
    /// Weighted-score model over altitude, elongation, age and lag.
    #[default]
    Heuristic,
    /// Yallop (1997) q-test.
    Yallop,
    /// Odeh (2004) V-test.
    Odeh,
}

impl fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Heuristic => "heuristic",
            Self::Yallop => "yallop",
            Self::Odeh => "odeh",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for EstimationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(Self::Heuristic),
            "yallop" => Ok(Self::Yallop),
            "odeh" => Ok(Self::Odeh),
            other => Err(format!("unknown estimation method '{}'", other)),
        }
    }
}

/// How an evening estimate becomes a yes/no "month starts tomorrow".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MonthStartRule {
    /// All four [`CrescentVisibilityCriteria`] thresholds must hold.
    #[default]
    Geometric,
    /// Positive lag and altitude, and a score at or above the threshold.
    ScoreThreshold,
}

impl fmt::Display for MonthStartRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Geometric => "geometric",
            Self::ScoreThreshold => "score-threshold",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for MonthStartRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geometric" => Ok(Self::Geometric),
            "score-threshold" | "score_threshold" | "threshold" => Ok(Self::ScoreThreshold),
            other => Err(format!("unknown month-start rule '{}'", other)),
        }
    }
}

/// Geometric rule: lag and altitude strictly above their minimums, age and
/// elongation at or above theirs. Any missing metric fails the test, which
/// covers `Unknown` estimates.
pub fn meets_crescent_visibility_criteria_at_sunset(
    estimate: &MonthStartEstimate,
    criteria: &CrescentVisibilityCriteria,
) -> bool {
    let m = &estimate.metrics;
    let (Some(lag), Some(alt), Some(age), Some(elong)) =
        (m.lag_minutes, m.moon_altitude_deg, m.moon_age_hours, m.elongation_deg)
    else {
        return false;
    };
    lag > criteria.min_lag_minutes
        && alt > criteria.min_moon_altitude_deg
        && age >= criteria.min_moon_age_hours
        && elong >= criteria.min_moon_elongation_deg
}

/// Score-threshold rule: moon sets after the sun, is above the horizon, and
/// the visibility score reaches `threshold`.
pub fn meets_score_threshold_at_sunset(estimate: &MonthStartEstimate, threshold: f64) -> bool {
    let m = &estimate.metrics;
    let (Some(lag), Some(alt), Some(score)) = (m.lag_minutes, m.moon_altitude_deg, m.visibility_score) else {
        return false;
    };
    lag > 0.0 && alt > 0.0 && score >= threshold
}

impl MonthStartRule {
    pub fn evaluate(&self, estimate: &MonthStartEstimate, criteria: &CrescentVisibilityCriteria, threshold: f64) -> bool {
        match self {
            Self::Geometric => meets_crescent_visibility_criteria_at_sunset(estimate, criteria),
            Self::ScoreThreshold => meets_score_threshold_at_sunset(estimate, threshold),
        }
    }
}

/// Source of per-evening estimates for the calendar builder.
///
/// Any `Fn(NaiveDate, GeoCoordinate) -> MonthStartEstimate` is a provider.
pub trait EveningProvider {
    fn evening_estimate(&self, date: NaiveDate, location: GeoCoordinate) -> MonthStartEstimate;
}

impl<F> EveningProvider for F
where
    F: Fn(NaiveDate, GeoCoordinate) -> MonthStartEstimate,
{
    fn evening_estimate(&self, date: NaiveDate, location: GeoCoordinate) -> MonthStartEstimate {
        self(date, location)
    }
}

/// Provider backed by an [`Ephemeris`] and one of the three estimators.
#[derive(Debug, Clone)]
pub struct AstronomicalProvider<E = MeeusEphemeris> {
    estimator: EveningEstimator<E>,
    method: EstimationMethod,
}

impl Default for AstronomicalProvider<MeeusEphemeris> {
    fn default() -> Self {
        Self::new(MeeusEphemeris, EstimationMethod::default())
    }
}

impl<E: Ephemeris> AstronomicalProvider<E> {
    pub fn new(ephemeris: E, method: EstimationMethod) -> Self {
        Self { estimator: EveningEstimator::new(ephemeris), method }
    }

    /// Score model for the heuristic method; ignored by Yallop and Odeh.
    pub fn with_model(mut self, model: VisibilityScoreModel) -> Self {
        self.estimator = self.estimator.with_model(model);
        self
    }

    pub fn method(&self) -> EstimationMethod {
        self.method
    }
}

impl<E: Ephemeris> EveningProvider for AstronomicalProvider<E> {
    fn evening_estimate(&self, date: NaiveDate, location: GeoCoordinate) -> MonthStartEstimate {
        match self.method {
            EstimationMethod::Heuristic => self.estimator.estimate(date, location),
            EstimationMethod::Yallop => yallop_month_start_estimate_with(self.estimator.ephemeris(), date, location),
            EstimationMethod::Odeh => odeh_month_start_estimate_with(self.estimator.ephemeris(), date, location),
        }
    }
}
