//! Heuristic visibility score.
//!
//! Four evening metrics are each mapped onto 0..1 by a linear band and
//! combined with fixed weights. Gates then force the obvious cases: a Moon
//! too old is not a new crescent, a Moon below the horizon or too close to
//! the Sun cannot be seen, and a clearly favourable one is always `High`.

use hilal_types::{HilalError, Likelihood};
use serde::{Deserialize, Serialize};

/// A moon older than this is the previous month's, not a new crescent.
pub const MAX_NEW_CRESCENT_AGE_HOURS: f64 = 72.0;
/// Past half-lunation the Moon is waning toward the next conjunction.
pub const MAX_NEW_CRESCENT_PHASE: f64 = 0.5;

/// Linear band `[min, max]` mapped onto `0..=1`, times a weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBand {
    pub min: f64,
    pub max: f64,
    pub weight: f64,
}

impl ScoreBand {
    pub const fn new(min: f64, max: f64, weight: f64) -> Self {
        Self { min, max, weight }
    }

    /// Position of `value` inside the band, clamped to 0..=1.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max <= self.min {
            return if value >= self.max { 1.0 } else { 0.0 };
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn weighted(&self, value: f64) -> f64 {
        self.weight * self.normalize(value)
    }
}

/// Metrics the score is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub moon_altitude_deg: f64,
    pub elongation_deg: f64,
    pub moon_age_hours: f64,
    /// `None` when no moonset was found near sunset.
    pub lag_minutes: Option<f64>,
    pub moon_phase_fraction: f64,
}

/// Below this line the crescent cannot be seen; the score is capped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowGate {
    /// Moon altitude at or below this is treated as set.
    pub max_moon_altitude_deg: f64,
    pub min_elongation_deg: f64,
    pub min_moon_age_hours: f64,
    pub score_cap: f64,
}

/// Above this line the crescent is plainly visible; the score is floored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighOverride {
    pub min_moon_altitude_deg: f64,
    pub min_elongation_deg: f64,
    pub min_moon_age_hours: f64,
    pub score_floor: f64,
}

/// Tunable constants of the heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisibilityScoreModel {
    pub altitude: ScoreBand,
    pub elongation: ScoreBand,
    pub age: ScoreBand,
    pub lag: ScoreBand,
    pub max_crescent_age_hours: f64,
    pub max_phase_fraction: f64,
    pub low_gate: LowGate,
    pub high_override: HighOverride,
    /// Scores at or above this are `High`.
    pub high_threshold: f64,
    /// Scores at or below this are `Low`.
    pub low_threshold: f64,
}

impl Default for VisibilityScoreModel {
    fn default() -> Self {
        Self {
            altitude: ScoreBand::new(0.0, 10.0, 0.35),
            elongation: ScoreBand::new(6.0, 15.0, 0.35),
            age: ScoreBand::new(12.0, 24.0, 0.20),
            lag: ScoreBand::new(0.0, 60.0, 0.10),
            max_crescent_age_hours: MAX_NEW_CRESCENT_AGE_HOURS,
            max_phase_fraction: MAX_NEW_CRESCENT_PHASE,
            low_gate: LowGate {
                max_moon_altitude_deg: 0.0,
                min_elongation_deg: 6.0,
                min_moon_age_hours: 12.0,
                score_cap: 0.2,
            },
            high_override: HighOverride {
                min_moon_altitude_deg: 7.0,
                min_elongation_deg: 12.0,
                min_moon_age_hours: 20.0,
                score_floor: 0.75,
            },
            high_threshold: 0.66,
            low_threshold: 0.33,
        }
    }
}

impl VisibilityScoreModel {
    /// Weighted sum of the four bands. A missing lag contributes nothing.
    pub fn raw_score(&self, inputs: &ScoreInputs) -> f64 {
        let lag = inputs.lag_minutes.map_or(0.0, |lag| self.lag.weighted(lag));
        let score = self.altitude.weighted(inputs.moon_altitude_deg)
            + self.elongation.weighted(inputs.elongation_deg)
            + self.age.weighted(inputs.moon_age_hours)
            + lag;
        score.clamp(0.0, 1.0)
    }

    /// The Moon in the sky is not a new crescent any more.
    pub fn is_past_new_crescent(&self, moon_age_hours: f64, moon_phase_fraction: f64) -> bool {
        moon_age_hours > self.max_crescent_age_hours || moon_phase_fraction > self.max_phase_fraction
    }

    /// Applies the gates and thresholds. Returns the likelihood and the
    /// final score.
    pub fn classify(&self, inputs: &ScoreInputs) -> (Likelihood, f64) {
        if self.is_past_new_crescent(inputs.moon_age_hours, inputs.moon_phase_fraction) {
            return (Likelihood::Low, 0.0);
        }

        let score = self.raw_score(inputs);
        let low = &self.low_gate;
        if inputs.moon_altitude_deg <= low.max_moon_altitude_deg
            || inputs.elongation_deg < low.min_elongation_deg
            || inputs.moon_age_hours < low.min_moon_age_hours
        {
            return (Likelihood::Low, score.min(low.score_cap));
        }

        let high = &self.high_override;
        if inputs.moon_altitude_deg >= high.min_moon_altitude_deg
            && inputs.elongation_deg >= high.min_elongation_deg
            && inputs.moon_age_hours >= high.min_moon_age_hours
        {
            return (Likelihood::High, score.max(high.score_floor));
        }

        let likelihood = if score >= self.high_threshold {
            Likelihood::High
        } else if score <= self.low_threshold {
            Likelihood::Low
        } else {
            Likelihood::Medium
        };
        (likelihood, score)
    }

    /// Checks that weights and thresholds make sense.
    pub fn validate(&self) -> Result<(), HilalError> {
        let bands = [self.altitude, self.elongation, self.age, self.lag];
        if bands.iter().any(|b| !(b.min.is_finite() && b.max.is_finite() && b.weight.is_finite()) || b.weight < 0.0) {
            return Err(HilalError::invalid_config("score bands must be finite with non-negative weights"));
        }
        if bands.iter().map(|b| b.weight).sum::<f64>() <= 0.0 {
            return Err(HilalError::invalid_config("score weights must not all be zero"));
        }
        if !(0.0..=1.0).contains(&self.low_threshold)
            || !(0.0..=1.0).contains(&self.high_threshold)
            || self.low_threshold >= self.high_threshold
        {
            return Err(HilalError::invalid_config("score thresholds must satisfy 0 <= low < high <= 1"));
        }
        Ok(())
    }
}

/// Score as a whole percentage.
pub fn visibility_percent(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}
