//! Month-start candidate window around the civil first day of a Hijri month.

use chrono::{Duration, NaiveDate};
use hilal_calendar::to_gregorian;
use hilal_types::{GeoCoordinate, HijriDate, HilalError, MonthStartEstimate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::CalendarOptions;
use crate::constants::{WINDOW_DAYS_AFTER, WINDOW_DAYS_BEFORE};
use crate::month_start::EveningProvider;
use crate::signal::{apply_exclusivity, SignalEntry};

/// One candidate evening and its normalized signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthStartWindowEntry {
    /// Gregorian date of the evening; a sighting means the month starts the next day.
    pub evening: NaiveDate,
    pub estimate: MonthStartEstimate,
    pub signal: SignalEntry,
}

/// Evaluates the evenings from civil day 1 − 2 through civil day 1 + 1 of
/// `year`/`month` with the configured estimator.
pub fn estimate_month_start_window(
    year: usize,
    month: usize,
    location: GeoCoordinate,
    options: &CalendarOptions,
) -> Result<Vec<MonthStartWindowEntry>, HilalError> {
    options.validate()?;
    estimate_month_start_window_with(year, month, location, &options.provider())
}

/// Same as [`estimate_month_start_window`] with a custom provider.
///
/// # Errors
/// `InvalidHijriDate` for a month outside 1..=12, `DateOutOfRange` outside
/// the civil converter's years.
pub fn estimate_month_start_window_with<P: EveningProvider + ?Sized>(
    year: usize,
    month: usize,
    location: GeoCoordinate,
    provider: &P,
) -> Result<Vec<MonthStartWindowEntry>, HilalError> {
    let civil_first = to_gregorian(HijriDate::new(year, month, 1)?)?;

    let mut entries: Vec<MonthStartWindowEntry> = (-WINDOW_DAYS_BEFORE..=WINDOW_DAYS_AFTER)
        .filter_map(|offset| civil_first.checked_add_signed(Duration::days(offset)))
        .map(|evening| {
            let estimate = provider.evening_estimate(evening, location);
            let percent = estimate.metrics.visibility_percent.unwrap_or(0);
            let signal = SignalEntry::new(evening, percent, estimate.metrics.lag_minutes);
            MonthStartWindowEntry { evening, estimate, signal }
        })
        .collect();

    apply_exclusivity(entries.iter_mut().map(|e| &mut e.signal));
    debug!(year, month, %civil_first, evenings = entries.len(), "month-start window");
    Ok(entries)
}
