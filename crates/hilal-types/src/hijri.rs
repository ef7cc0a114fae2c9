//! Hijri date value type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::HilalError;

/// Hard cap on the length of a Hijri month.
pub const MAX_HIJRI_MONTH_DAYS: usize = 30;

/// Returns Hijri month name.
pub fn hijri_month_name(month: usize) -> &'static str {
    match month {
        1 => "Muharram", 2 => "Safar", 3 => "Rabi' al-Awwal", 4 => "Rabi' al-Thani",
        5 => "Jumada al-Ula", 6 => "Jumada al-Akhirah", 7 => "Rajab", 8 => "Sha'ban",
        9 => "Ramadhan", 10 => "Shawwal", 11 => "Dhu al-Qi'dah", 12 => "Dhu al-Hijjah",
        _ => "Unknown",
    }
}

/// A Hijri calendar date. Month 1-12, day 1-30.
///
/// Ordering is chronological (year, then month, then day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HijriDate {
    pub year: usize,
    pub month: usize,
    pub day: usize,
}

impl HijriDate {
    /// Creates a validated Hijri date.
    ///
    /// Only the declared bounds are checked (month 1-12, day 1-30); whether
    /// day 30 exists in a particular month is decided by the calendar in use.
    pub fn new(year: usize, month: usize, day: usize) -> Result<Self, HilalError> {
        if year == 0 || !(1..=12).contains(&month) || !(1..=MAX_HIJRI_MONTH_DAYS).contains(&day) {
            return Err(HilalError::InvalidHijriDate { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Creates a Hijri date without validation. Use with trusted inputs only.
    #[inline]
    pub const fn new_unchecked(year: usize, month: usize, day: usize) -> Self {
        Self { year, month, day }
    }

    /// The following day in the same month.
    pub fn next_day(self) -> Self {
        Self { day: self.day + 1, ..self }
    }

    /// Day 1 of the following month, wrapping Dhu al-Hijjah into Muharram of the next year.
    pub fn first_of_next_month(self) -> Self {
        if self.month >= 12 {
            Self { year: self.year + 1, month: 1, day: 1 }
        } else {
            Self { year: self.year, month: self.month + 1, day: 1 }
        }
    }

    /// Whether `next` directly follows `self` in a calendar whose months may
    /// have any length from 1 to 30 days.
    pub fn is_followed_by(&self, next: &HijriDate) -> bool {
        *next == self.next_day() || *next == self.first_of_next_month()
    }

    pub fn month_name(&self) -> &'static str {
        hijri_month_name(self.month)
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} AH", self.day, self.month_name(), self.year)
    }
}
