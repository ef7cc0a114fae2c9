//! Estimated Hijri calendar builder.
//!
//! The calendar is a fold over consecutive Gregorian days carrying the
//! current Hijri date. The civil calendar supplies only the starting date;
//! after that every month boundary comes from the evening estimates.

use chrono::{Duration, NaiveDate};
use hilal_astronomy::{MeeusEphemeris, VisibilityScoreModel};
use hilal_calendar::to_hijri;
use hilal_types::{
    CrescentVisibilityCriteria, EstimatedHijriDay, GeoCoordinate, HijriDate, HilalError, MonthStartEstimate,
    MAX_HIJRI_MONTH_DAYS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::constants::{DEFAULT_MIN_END_OF_MONTH_DAY, DEFAULT_SCORE_THRESHOLD, DEFAULT_WARM_UP_DAYS};
use crate::month_start::{AstronomicalProvider, EstimationMethod, EveningProvider, MonthStartRule};

/// Calendar builder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarOptions {
    pub method: EstimationMethod,
    pub rule: MonthStartRule,
    /// Thresholds for [`MonthStartRule::Geometric`].
    pub criteria: CrescentVisibilityCriteria,
    /// Minimum score for [`MonthStartRule::ScoreThreshold`]. Default: 0.4
    pub score_threshold: f64,
    /// A month may not end before this day. Default: 29
    pub min_end_of_month_day: usize,
    /// Heuristic score model, used with [`EstimationMethod::Heuristic`].
    pub score_model: VisibilityScoreModel,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            method: EstimationMethod::default(),
            rule: MonthStartRule::default(),
            criteria: CrescentVisibilityCriteria::default(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            min_end_of_month_day: DEFAULT_MIN_END_OF_MONTH_DAY,
            score_model: VisibilityScoreModel::default(),
        }
    }
}

impl CalendarOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> CalendarOptionsBuilder {
        CalendarOptionsBuilder::new()
    }

    pub fn method(mut self, method: EstimationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn rule(mut self, rule: MonthStartRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn criteria(mut self, criteria: CrescentVisibilityCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Clamped to 1..=30.
    pub fn min_end_of_month_day(mut self, day: usize) -> Self {
        self.min_end_of_month_day = day.clamp(1, MAX_HIJRI_MONTH_DAYS);
        self
    }

    pub fn score_model(mut self, model: VisibilityScoreModel) -> Self {
        self.score_model = model;
        self
    }

    pub fn validate(&self) -> Result<(), HilalError> {
        if !(1..=MAX_HIJRI_MONTH_DAYS).contains(&self.min_end_of_month_day) {
            return Err(HilalError::invalid_config(format!(
                "minEndOfMonthDay {} outside 1..={}",
                self.min_end_of_month_day, MAX_HIJRI_MONTH_DAYS
            )));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(HilalError::invalid_config(format!(
                "scoreThreshold {} outside [0, 1]",
                self.score_threshold
            )));
        }
        if !self.criteria.is_finite() {
            return Err(HilalError::invalid_config("crescent criteria must be finite"));
        }
        self.score_model.validate()
    }

    /// Provider for this configuration on the default ephemeris.
    pub fn provider(&self) -> AstronomicalProvider<MeeusEphemeris> {
        AstronomicalProvider::new(MeeusEphemeris, self.method).with_model(self.score_model)
    }

    /// Whether the month that contains `today` ends after this evening.
    ///
    /// The estimate is requested only when the answer depends on it.
    pub fn month_ends_after<F>(&self, today: HijriDate, estimate: F) -> bool
    where
        F: FnOnce() -> MonthStartEstimate,
    {
        if today.day >= MAX_HIJRI_MONTH_DAYS {
            return true;
        }
        if today.day < self.min_end_of_month_day {
            return false;
        }

        let est = estimate();
        if est.is_unknown() {
            warn!(hijri = %today, "evening estimate unknown, month continues");
            return false;
        }
        self.rule.evaluate(&est, &self.criteria, self.score_threshold)
    }
}

/// Validating builder for [`CalendarOptions`].
#[derive(Debug, Default)]
pub struct CalendarOptionsBuilder {
    method: Option<EstimationMethod>,
    rule: Option<MonthStartRule>,
    criteria: Option<CrescentVisibilityCriteria>,
    score_threshold: Option<f64>,
    min_end_of_month_day: Option<usize>,
    score_model: Option<VisibilityScoreModel>,
}

impl CalendarOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: EstimationMethod) -> Self { self.method = Some(method); self }
    pub fn rule(mut self, rule: MonthStartRule) -> Self { self.rule = Some(rule); self }
    pub fn criteria(mut self, criteria: CrescentVisibilityCriteria) -> Self { self.criteria = Some(criteria); self }
    pub fn score_threshold(mut self, threshold: f64) -> Self { self.score_threshold = Some(threshold); self }
    pub fn min_end_of_month_day(mut self, day: usize) -> Self { self.min_end_of_month_day = Some(day); self }
    pub fn score_model(mut self, model: VisibilityScoreModel) -> Self { self.score_model = Some(model); self }

    /// Builds and validates. Out-of-range values are rejected, not clamped.
    pub fn build(self) -> Result<CalendarOptions, HilalError> {
        let options = CalendarOptions {
            method: self.method.unwrap_or_default(),
            rule: self.rule.unwrap_or_default(),
            criteria: self.criteria.unwrap_or_default(),
            score_threshold: self.score_threshold.unwrap_or(DEFAULT_SCORE_THRESHOLD),
            min_end_of_month_day: self.min_end_of_month_day.unwrap_or(DEFAULT_MIN_END_OF_MONTH_DAY),
            score_model: self.score_model.unwrap_or_default(),
        };
        options.validate()?;
        Ok(options)
    }
}

/// Lazily walks `[start, end]`, yielding one [`EstimatedHijriDay`] per day.
pub struct EstimatedCalendarIterator<'a, P: EveningProvider + ?Sized> {
    current: Option<NaiveDate>,
    end: NaiveDate,
    hijri: HijriDate,
    location: GeoCoordinate,
    options: &'a CalendarOptions,
    provider: &'a P,
}

impl<'a, P: EveningProvider + ?Sized> EstimatedCalendarIterator<'a, P> {
    /// Starts at `start` with an explicit Hijri seed.
    pub fn with_seed(
        start: NaiveDate,
        end: NaiveDate,
        seed: HijriDate,
        location: GeoCoordinate,
        options: &'a CalendarOptions,
        provider: &'a P,
    ) -> Self {
        Self { current: (start <= end).then_some(start), end, hijri: seed, location, options, provider }
    }
}

impl<P: EveningProvider + ?Sized> Iterator for EstimatedCalendarIterator<'_, P> {
    type Item = EstimatedHijriDay;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.current.filter(|d| *d <= self.end)?;
        let today = self.hijri;

        // The last day's evening only matters for the day after the range
        let ends = date < self.end
            && self.options.month_ends_after(today, || self.provider.evening_estimate(date, self.location));

        self.hijri = if ends {
            let next = today.first_of_next_month();
            debug!(%date, from = %today, to = %next, "month transition");
            next
        } else {
            today.next_day()
        };
        self.current = date.succ_opt();

        Some(EstimatedHijriDay::new(date, today))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.current {
            Some(d) if d <= self.end => (self.end - d).num_days() as usize + 1,
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

/// Iterator over `[start, end]` seeded from the civil calendar at `start`.
///
/// # Errors
/// `DateOutOfRange` if `start` is outside the civil converter's range.
pub fn estimated_calendar_iter<'a, P: EveningProvider + ?Sized>(
    start: NaiveDate,
    end: NaiveDate,
    location: GeoCoordinate,
    options: &'a CalendarOptions,
    provider: &'a P,
) -> Result<EstimatedCalendarIterator<'a, P>, HilalError> {
    let seed = to_hijri(start, 0)?;
    Ok(EstimatedCalendarIterator::with_seed(start, end, seed, location, options, provider))
}

/// Builds the estimated calendar for `[start, end]` with a custom provider.
///
/// An empty range (`end < start`) yields an empty calendar.
pub fn build_estimated_hijri_calendar_with<P: EveningProvider + ?Sized>(
    start: NaiveDate,
    end: NaiveDate,
    location: GeoCoordinate,
    options: &CalendarOptions,
    provider: &P,
) -> Result<Vec<EstimatedHijriDay>, HilalError> {
    if end < start {
        return Ok(Vec::new());
    }
    Ok(estimated_calendar_iter(start, end, location, options, provider)?.collect())
}

/// Builds the estimated calendar for `[start, end]` with the configured
/// estimator on the built-in ephemeris.
#[instrument(skip(options), fields(method = %options.method, rule = %options.rule))]
pub fn build_estimated_hijri_calendar_range(
    start: NaiveDate,
    end: NaiveDate,
    location: GeoCoordinate,
    options: &CalendarOptions,
) -> Result<Vec<EstimatedHijriDay>, HilalError> {
    options.validate()?;
    let provider = options.provider();
    build_estimated_hijri_calendar_with(start, end, location, options, &provider)
}

/// Builds from `warm_up_days` before `start` and returns only `[start, end]`.
///
/// Starting earlier lets the estimated month boundaries take over from the
/// civil seed before the visible range begins.
#[instrument(skip(options), fields(method = %options.method, rule = %options.rule))]
pub fn build_estimated_hijri_calendar_window(
    start: NaiveDate,
    end: NaiveDate,
    location: GeoCoordinate,
    options: &CalendarOptions,
    warm_up_days: Option<u32>,
) -> Result<Vec<EstimatedHijriDay>, HilalError> {
    options.validate()?;
    let provider = options.provider();
    build_estimated_hijri_calendar_window_with(start, end, location, options, &provider, warm_up_days)
}

pub fn build_estimated_hijri_calendar_window_with<P: EveningProvider + ?Sized>(
    start: NaiveDate,
    end: NaiveDate,
    location: GeoCoordinate,
    options: &CalendarOptions,
    provider: &P,
    warm_up_days: Option<u32>,
) -> Result<Vec<EstimatedHijriDay>, HilalError> {
    if end < start {
        return Ok(Vec::new());
    }
    let warm_up = i64::from(warm_up_days.unwrap_or(DEFAULT_WARM_UP_DAYS));
    let seed_date = start
        .checked_sub_signed(Duration::days(warm_up))
        .ok_or_else(|| HilalError::ValidationError(format!("warm-up of {} days before {} underflows", warm_up, start)))?;

    Ok(estimated_calendar_iter(seed_date, end, location, options, provider)?
        .skip_while(|day| day.gregorian < start)
        .collect())
}
