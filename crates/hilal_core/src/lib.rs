//! # Hilal core
//!
//! Facade over the hilal crates plus configuration loading.
//!
//! - `types`: value types (HijriDate, MonthStartEstimate, GeoCoordinate, ...)
//! - `calendar`: civil Hijri conversion used as the calendar seed
//! - `astronomy`: ephemeris, evening estimator, Yallop and Odeh criteria
//! - `rules`: month-start rules, calendar builder, signal levels
//! - `config`: [`HilalConfig`] loaded from JSON or the environment

pub mod config;

pub use hilal_astronomy as astronomy;
pub use hilal_calendar as calendar;
pub use hilal_rules as rules;
pub use hilal_types as types;

pub use config::HilalConfig;

pub use hilal_types::{
    CrescentVisibilityCriteria, EstimateMetrics, EstimatedHijriDay, GeoCoordinate, GregorianDate, HijriDate,
    HilalError, Likelihood, MonthStartEstimate, ObserverLocation, OdehZone, YallopZone,
};
pub use hilal_calendar::{get_hijri_month_name, to_gregorian, to_hijri};
pub use hilal_astronomy::{
    compute_odeh_test, compute_yallop_test, estimate_month_start_likelihood_at_sunset, odeh_month_start_estimate,
    yallop_month_start_estimate, Ephemeris, EveningEstimator, MeeusEphemeris, VisibilityScoreModel,
};
pub use hilal_rules::{
    apply_exclusivity, build_estimated_hijri_calendar_range, build_estimated_hijri_calendar_window,
    build_estimated_hijri_calendar_with, classify_signal, estimate_month_start_window,
    estimate_month_start_window_with, estimated_calendar_iter, EstimatedCalendarIterator, MonthStartWindowEntry,
    estimated_gregorian_candidates, find_estimated_gregorian_for_hijri_date,
    find_estimated_gregorian_for_hijri_month_day, meets_crescent_visibility_criteria_at_sunset,
    meets_score_threshold_at_sunset, normalize_signal_levels, AstronomicalProvider, CalendarOptions,
    EstimationMethod, EveningProvider, HilalDateExt, MonthStartRule, SignalEntry, SignalLevel,
};

pub mod prelude {
    pub use crate::config::HilalConfig;
    pub use crate::{
        build_estimated_hijri_calendar_range, build_estimated_hijri_calendar_window,
        estimate_month_start_likelihood_at_sunset, to_hijri,
    };
    pub use crate::{
        CalendarOptions, EstimatedHijriDay, EstimationMethod, GeoCoordinate, HijriDate, HilalDateExt,
        HilalError, Likelihood, MonthStartEstimate, MonthStartRule, SignalLevel,
    };
}

/// Estimated calendar for `[start, end]` using a loaded configuration.
///
/// Uses the configured warm-up so month boundaries are already estimated
/// when the range begins.
///
/// # Errors
/// `InvalidConfiguration` when the config has no location or fails
/// validation, plus any civil converter range error.
pub fn build_calendar_from_config(
    config: &HilalConfig,
    start: GregorianDate,
    end: GregorianDate,
) -> Result<Vec<EstimatedHijriDay>, HilalError> {
    config.validate()?;
    let location = config
        .location
        .ok_or_else(|| HilalError::invalid_config("a location is required to build a calendar"))?;
    build_estimated_hijri_calendar_window(start, end, location, &config.calendar, Some(config.warm_up_days))
}
