//! Coordinate conversions and corrections.
//!
//! Implements:
//! - Ecliptic → Equatorial conversion
//! - Equatorial → Horizontal (Azimuth/Altitude) conversion
//! - Local Sidereal Time (LST)
//! - Topocentric Parallax Correction
//!
//! Reference: Jean Meeus, "Astronomical Algorithms", Chapters 11, 12, 13, 22, 40.

use crate::time::J2000_JD;

/// Earth's equatorial radius in km.
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.14;
/// Polar / equatorial radius ratio b/a (Meeus, Chapter 11).
const EARTH_AXIS_RATIO: f64 = 0.99664719;

/// Normalizes an angle to [0, 360).
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Wraps an angle to [-180, 180).
#[inline]
pub fn wrap_pm180(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Mean obliquity of the ecliptic in degrees (Meeus 22.2).
pub fn mean_obliquity(jde: f64) -> f64 {
    let t = (jde - J2000_JD) / 36525.0;
    23.439291 - 0.0130042 * t - 1.64e-7 * t * t + 5.04e-7 * t * t * t
}

/// Ecliptic (lon, lat) to equatorial (RA, Dec), all in degrees.
pub fn ecliptic_to_equatorial(lon: f64, lat: f64, obliquity: f64) -> (f64, f64) {
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_eps, cos_eps) = obliquity.to_radians().sin_cos();

    // Meeus 13.3, 13.4
    let ra = (sin_lon * cos_eps - sin_lat / cos_lat * sin_eps).atan2(cos_lon);
    let dec = (sin_lat * cos_eps + cos_lat * sin_eps * sin_lon).asin();

    (normalize_degrees(ra.to_degrees()), dec.to_degrees())
}

/// Local mean sidereal time in degrees for a Julian Day (UT) and an
/// east-positive longitude.
pub fn local_sidereal_time(jd_ut: f64, longitude: f64) -> f64 {
    let d = jd_ut - J2000_JD;
    let t = d / 36525.0;

    // Greenwich mean sidereal time at any instant (Meeus 12.4)
    let gmst = 280.46061837 + 360.98564736629 * d + 0.000387933 * t * t - t * t * t / 38_710_000.0;

    normalize_degrees(gmst + longitude)
}

/// Equatorial (RA, Dec) to horizontal coordinates, no refraction.
///
/// Returns (azimuth measured from North through East, altitude), degrees.
pub fn equatorial_to_horizontal(ra: f64, dec: f64, lst: f64, lat: f64) -> (f64, f64) {
    let (sin_h, cos_h) = (lst - ra).to_radians().sin_cos();
    let (sin_dec, cos_dec) = dec.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();

    // Meeus 13.6
    let alt = (sin_lat * sin_dec + cos_lat * cos_dec * cos_h).asin();

    // Meeus 13.5 gives azimuth from the South; shift to North-based
    let az = sin_h.atan2(cos_h * sin_lat - sin_dec / cos_dec * cos_lat);

    (normalize_degrees(az.to_degrees() + 180.0), alt.to_degrees())
}

/// Geocentric observer terms (ρ sin φ', ρ cos φ') at sea level (Meeus 11).
fn observer_terms(lat: f64) -> (f64, f64) {
    let u = (EARTH_AXIS_RATIO * lat.to_radians().tan()).atan();
    (EARTH_AXIS_RATIO * u.sin(), u.cos())
}

/// Shifts geocentric (RA, Dec) to the topocentric place seen by an observer
/// at sea level.
///
/// Returns (topocentric RA, topocentric Dec), degrees.
pub fn apply_parallax(ra: f64, dec: f64, distance_km: f64, observer_lat: f64, lst: f64) -> (f64, f64) {
    let (rho_sin_phi, rho_cos_phi) = observer_terms(observer_lat);

    // Meeus 40.1
    let sin_pi = EARTH_EQUATORIAL_RADIUS_KM / distance_km;

    let (sin_h, cos_h) = (lst - ra).to_radians().sin_cos();
    let (sin_dec, cos_dec) = dec.to_radians().sin_cos();

    // Meeus 40.2, 40.3
    let delta_ra = (-rho_cos_phi * sin_pi * sin_h).atan2(cos_dec - rho_cos_phi * sin_pi * cos_h);
    let dec_prime = ((sin_dec - rho_sin_phi * sin_pi) * delta_ra.cos())
        .atan2(cos_dec - rho_cos_phi * sin_pi * cos_h);

    (normalize_degrees(ra + delta_ra.to_degrees()), dec_prime.to_degrees())
}

/// Spherical (lon, lat, distance) to rectangular coordinates.
pub fn spherical_to_cartesian(lon: f64, lat: f64, distance: f64) -> (f64, f64, f64) {
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    (distance * cos_lat * cos_lon, distance * cos_lat * sin_lon, distance * sin_lat)
}
