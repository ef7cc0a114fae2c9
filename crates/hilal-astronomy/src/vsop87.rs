//! Geocentric position of the Sun from VSOP87D.
//!
//! Reference: Jean Meeus, "Astronomical Algorithms", Chapter 25.

use vsop87::vsop87d;

/// Annual aberration constant κ in degrees (20.4898").
const ABERRATION_DEG: f64 = 20.4898 / 3600.0;

/// Geometric geocentric ecliptic coordinates of the Sun, mean equinox of date.
///
/// `jde` is a Julian Ephemeris Day (TT). Returns
/// (longitude deg, latitude deg, distance AU).
pub fn geometric(jde: f64) -> (f64, f64, f64) {
    let earth = vsop87d::earth(jde);

    // Heliocentric Earth -> geocentric Sun
    let lon = (earth.longitude().to_degrees() + 180.0).rem_euclid(360.0);
    let lat = -earth.latitude().to_degrees();

    (lon, lat, earth.distance())
}

/// Geocentric ecliptic coordinates of the Sun corrected for aberration.
pub fn calculate(jde: f64) -> (f64, f64, f64) {
    let (lon, lat, dist_au) = geometric(jde);
    let apparent = (lon - ABERRATION_DEG / dist_au).rem_euclid(360.0);
    (apparent, lat, dist_au)
}
