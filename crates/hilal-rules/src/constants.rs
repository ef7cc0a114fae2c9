//! Calendar builder defaults.

/// Score an evening must reach under the score-threshold rule.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.4;
/// Earliest Hijri day on which astronomy may end a month.
pub const DEFAULT_MIN_END_OF_MONTH_DAY: usize = 29;
/// Days the windowed builder starts ahead of the requested range.
pub const DEFAULT_WARM_UP_DAYS: u32 = 90;

/// Evenings inspected before civil day 1 by the month-start window.
pub const WINDOW_DAYS_BEFORE: i64 = 2;
/// Evenings inspected after civil day 1 by the month-start window.
pub const WINDOW_DAYS_AFTER: i64 = 1;

// Signal level bands on the 0-100 visibility percentage (inclusive upper bounds)
pub const SIGNAL_NO_CHANCE_MAX: u8 = 0;
pub const SIGNAL_VERY_LOW_MAX: u8 = 10;
pub const SIGNAL_LOW_MAX: u8 = 35;
pub const SIGNAL_MEDIUM_MAX: u8 = 65;
