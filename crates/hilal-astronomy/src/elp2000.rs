//! Geocentric position of the Moon from ELP-2000/82 (via `astro`).
//!
//! Reference: Jean Meeus, "Astronomical Algorithms", Chapter 47.

use astro::lunar;

/// Geocentric ecliptic coordinates of the Moon, mean equinox of date.
///
/// `jde` is a Julian Ephemeris Day (TT). Returns
/// (longitude deg, latitude deg, distance km).
pub fn calculate(jde: f64) -> (f64, f64, f64) {
    let (point, dist_km) = lunar::geocent_ecl_pos(jde);

    let lon = point.long.to_degrees().rem_euclid(360.0);
    let lat = point.lat.to_degrees();

    (lon, lat, dist_km)
}
