//! Time scales: UTC instants, Julian Days and ΔT.
//!
//! Positions are evaluated in Terrestrial Time (TT = UT + ΔT); sidereal time
//! and every public instant stay in UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Julian Day of the Unix epoch (1970-01-01T00:00Z).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian Day of J2000.0.
pub const J2000_JD: f64 = 2_451_545.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Converts `DateTime<Utc>` to Julian Day (UT), millisecond precision.
pub fn datetime_to_jd(dt: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_JD + dt.timestamp_millis() as f64 / MILLIS_PER_DAY
}

/// Converts a Julian Day (UT) back to `DateTime<Utc>`.
///
/// Returns `None` for non-finite input or dates chrono cannot represent.
pub fn jd_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    let millis = ((jd - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round();
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// 00:00 UTC of a calendar date.
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// ΔT = TT − UT in seconds.
///
/// Espenak & Meeus polynomials up to 2005, observed values to 2025, then a
/// linear extrapolation at the observed rate of ~0.1 s/yr until 2050.
pub fn delta_t_seconds(jd_ut: f64) -> f64 {
    let y = 2000.0 + (jd_ut - J2000_JD) / 365.25;

    if y < 1900.0 {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    } else if y < 1920.0 {
        let t = y - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t * t + 0.0061966 * t.powi(3) - 0.000197 * t.powi(4)
    } else if y < 1941.0 {
        let t = y - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t * t + 0.0020936 * t.powi(3)
    } else if y < 1961.0 {
        let t = y - 1950.0;
        29.07 + 0.407 * t - t * t / 233.0 + t.powi(3) / 2547.0
    } else if y < 1986.0 {
        let t = y - 1975.0;
        45.45 + 1.067 * t - t * t / 260.0 - t.powi(3) / 718.0
    } else if y < 2005.0 {
        let t = y - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t * t + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if y < 2025.0 {
        64.69 + 0.2335 * (y - 2005.0)
    } else if y < 2050.0 {
        69.36 + 0.1 * (y - 2025.0)
    } else {
        let u = (y - 1820.0) / 100.0;
        (-20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)).max(71.86)
    }
}

/// Julian Ephemeris Day (TT) for a Julian Day in UT.
pub fn jd_ut_to_tt(jd_ut: f64) -> f64 {
    jd_ut + delta_t_seconds(jd_ut) / 86_400.0
}
