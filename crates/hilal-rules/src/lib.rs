//! Estimated Hijri calendar engine for Hilal.
//!
//! Turns per-evening crescent verdicts into a continuous Hijri calendar and
//! into display signal levels.

pub mod constants;
pub mod month_start;
pub mod builder;
pub mod lookup;
pub mod signal;
pub mod window;
pub mod extension;

pub use month_start::{
    meets_crescent_visibility_criteria_at_sunset, meets_score_threshold_at_sunset, AstronomicalProvider,
    EstimationMethod, EveningProvider, MonthStartRule,
};
pub use builder::{
    build_estimated_hijri_calendar_range, build_estimated_hijri_calendar_window,
    build_estimated_hijri_calendar_window_with, build_estimated_hijri_calendar_with,
    estimated_calendar_iter, CalendarOptions, CalendarOptionsBuilder, EstimatedCalendarIterator,
};
pub use lookup::{
    estimated_gregorian_candidates, find_estimated_gregorian_for_hijri_date,
    find_estimated_gregorian_for_hijri_month_day,
};
pub use signal::{apply_exclusivity, classify_signal, normalize_signal_levels, SignalEntry, SignalLevel};
pub use window::{estimate_month_start_window, estimate_month_start_window_with, MonthStartWindowEntry};
pub use extension::HilalDateExt;
