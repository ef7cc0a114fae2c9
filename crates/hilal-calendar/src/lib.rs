//! Civil Hijri calendar conversion for Hilal.
//!
//! Gregorian <-> Hijri on top of the `hijri_date` crate (Umm al-Qura tables).
//! The estimated calendar uses this only as its starting anchor.

use chrono::{Datelike, Duration, NaiveDate};
use std::cell::RefCell;

pub use hilal_types::{HijriDate, HilalError, hijri_month_name};

/// Minimum Gregorian year for Hijri conversion.
pub const HIJRI_MIN_YEAR: i32 = 1938;
/// Maximum Gregorian year for Hijri conversion.
pub const HIJRI_MAX_YEAR: i32 = 2076;
/// First Hijri year covered by the tables.
pub const HIJRI_MIN_HIJRI_YEAR: usize = 1356;
/// Last Hijri year covered by the tables.
pub const HIJRI_MAX_HIJRI_YEAR: usize = 1500;

/// Julian Day Number of 1 Muharram 1 AH in the arithmetic calendar.
const ISLAMIC_EPOCH_JDN: i64 = 1_948_440;
/// Julian Day Number of 0001-01-01 (proleptic Gregorian), minus one.
const JDN_BEFORE_CE: i64 = 1_721_425;
/// How far the arithmetic estimate is allowed to be off from the tables.
const MAX_SEARCH_OFFSET_DAYS: i64 = 5;

// Thread-local cache: (gregorian, adjustment) -> hijri
thread_local! {
    static HIJRI_CACHE: RefCell<Option<(NaiveDate, i64, HijriDate)>> = const { RefCell::new(None) };
}

fn civil_hijri(date: NaiveDate) -> Result<HijriDate, HilalError> {
    let year = date.year();
    if !(HIJRI_MIN_YEAR..=HIJRI_MAX_YEAR).contains(&year) {
        return Err(HilalError::date_out_of_range(date, HIJRI_MIN_YEAR, HIJRI_MAX_YEAR));
    }

    let h = hijri_date::HijriDate::from_gr(year as usize, date.month() as usize, date.day() as usize)
        .map_err(|_| HilalError::date_out_of_range(date, HIJRI_MIN_YEAR, HIJRI_MAX_YEAR))?;

    Ok(HijriDate::new_unchecked(h.year(), h.month(), h.day()))
}

/// Converts Gregorian to Hijri with adjustment.
///
/// # Arguments
/// * `date` - Gregorian date
/// * `adjustment` - Day offset (positive = Hijri ahead)
///
/// # Errors
/// Returns `DateOutOfRange` if the adjusted date is outside 1938-2076.
pub fn to_hijri(date: NaiveDate, adjustment: i64) -> Result<HijriDate, HilalError> {
    let cached = HIJRI_CACHE.with(|cache| {
        cache.borrow().as_ref().and_then(|(d, adj, h)| {
            (*d == date && *adj == adjustment).then_some(*h)
        })
    });

    if let Some(h) = cached {
        return Ok(h);
    }

    let adjusted_date = date
        .checked_add_signed(Duration::days(adjustment))
        .ok_or_else(|| HilalError::date_out_of_range(date, HIJRI_MIN_YEAR, HIJRI_MAX_YEAR))?;

    let hijri = civil_hijri(adjusted_date)?;

    HIJRI_CACHE.with(|cache| {
        *cache.borrow_mut() = Some((date, adjustment, hijri));
    });

    Ok(hijri)
}

/// Arithmetic (tabular) estimate of the Gregorian date of a Hijri date.
fn arithmetic_estimate(hijri: HijriDate) -> Option<NaiveDate> {
    let y = hijri.year as i64;
    let m = hijri.month as i64;
    let d = hijri.day as i64;
    let jdn = d + (29.5 * (m - 1) as f64).ceil() as i64 + (y - 1) * 354 + (3 + 11 * y) / 30
        + ISLAMIC_EPOCH_JDN
        - 1;
    NaiveDate::from_num_days_from_ce_opt((jdn - JDN_BEFORE_CE) as i32)
}

/// Converts a Hijri date to Gregorian.
///
/// # Errors
/// * `InvalidHijriDate` if month/day are out of bounds or the day does not
///   exist in that month (day 30 of a 29-day month).
/// * `DateOutOfRange` if the year is outside 1356-1500 AH.
pub fn to_gregorian(hijri: HijriDate) -> Result<NaiveDate, HilalError> {
    let hijri = HijriDate::new(hijri.year, hijri.month, hijri.day)?;
    let estimate = arithmetic_estimate(hijri).ok_or(HilalError::InvalidHijriDate {
        year: hijri.year,
        month: hijri.month,
        day: hijri.day,
    })?;

    if !(HIJRI_MIN_HIJRI_YEAR..=HIJRI_MAX_HIJRI_YEAR).contains(&hijri.year) {
        return Err(HilalError::date_out_of_range(estimate, HIJRI_MIN_YEAR, HIJRI_MAX_YEAR));
    }

    // Closest candidates first: 0, +1, -1, +2, -2, ...
    for offset in 0..=MAX_SEARCH_OFFSET_DAYS * 2 {
        let delta = if offset % 2 == 0 { -(offset / 2) } else { offset / 2 + 1 };
        let Some(candidate) = estimate.checked_add_signed(Duration::days(delta)) else {
            continue;
        };
        if let Ok(h) = civil_hijri(candidate) {
            if h == hijri {
                return Ok(candidate);
            }
        }
    }

    Err(HilalError::InvalidHijriDate { year: hijri.year, month: hijri.month, day: hijri.day })
}

/// Returns Hijri month name.
pub fn get_hijri_month_name(month: usize) -> &'static str {
    hijri_month_name(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let h1 = to_hijri(date, 0).unwrap();
        let h2 = to_hijri(date, 0).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_out_of_range() {
        let old_date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        assert!(matches!(to_hijri(old_date, 0), Err(HilalError::DateOutOfRange { .. })));

        let future_date = NaiveDate::from_ymd_opt(2100, 1, 1).unwrap();
        assert!(to_hijri(future_date, 0).is_err());
    }

    #[test]
    fn test_known_date() {
        // 1 Ramadhan 1445 (Umm al-Qura) = 2024-03-11
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let h = to_hijri(date, 0).unwrap();
        assert_eq!(h, HijriDate::new_unchecked(1445, 9, 1));
    }

    #[test]
    fn test_adjustment_shifts_by_one_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let h = to_hijri(date, 1).unwrap();
        assert_eq!(h, HijriDate::new_unchecked(1445, 9, 2));
    }

    #[test]
    fn test_round_trip() {
        let mut d = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        for _ in 0..800 {
            let h = to_hijri(d, 0).unwrap();
            assert_eq!(to_gregorian(h).unwrap(), d, "round trip failed for {} ({})", d, h);
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_to_gregorian_rejects_invalid() {
        assert!(to_gregorian(HijriDate::new_unchecked(1447, 13, 1)).is_err());
        assert!(to_gregorian(HijriDate::new_unchecked(1447, 1, 31)).is_err());
        assert!(to_gregorian(HijriDate::new_unchecked(1200, 1, 1)).is_err());
    }

    #[test]
    fn test_month_names() {
        assert_eq!(get_hijri_month_name(9), "Ramadhan");
        assert_eq!(get_hijri_month_name(13), "Unknown");
    }
}
