//! Ephemeris service consumed by the crescent estimators.
//!
//! [`Ephemeris`] is the seam between the estimators and the positional
//! astronomy underneath. [`MeeusEphemeris`] implements it with VSOP87 for
//! the Sun and ELP-2000/82 for the Moon; tests substitute fixed-answer fakes.

use chrono::{DateTime, Duration, Utc};
use hilal_types::GeoCoordinate;

use crate::coords::{self, normalize_degrees, wrap_pm180};
use crate::time::{datetime_to_jd, jd_ut_to_tt};
use crate::{elp2000, vsop87};

/// Astronomical unit in km.
pub const AU_KM: f64 = 149_597_870.7;
/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588853;
/// Mean lunar radius in km.
pub const MOON_RADIUS_KM: f64 = 1737.4;

/// Standard refraction at the horizon (34').
const HORIZON_REFRACTION_DEG: f64 = 34.0 / 60.0;
/// Solar semi-diameter at 1 AU (959.63").
const SUN_SEMI_DIAMETER_AT_1AU_DEG: f64 = 959.63 / 3600.0;

/// Coarse scan step for rise/set searches.
const RISE_SET_STEP_MINUTES: i64 = 20;
/// Bisection rounds after a bracket is found (20 min / 2^24 < 0.1 ms).
const RISE_SET_BISECTIONS: usize = 24;
/// Half-width of the bracket around a predicted lunar phase.
const PHASE_BRACKET_DAYS: f64 = 3.0;
const PHASE_BISECTIONS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
}

/// Horizon crossing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiseSet {
    Rise,
    Set,
}

/// Topocentric equatorial place, equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialCoords {
    pub ra_deg: f64,
    pub dec_deg: f64,
    /// Geocentric distance.
    pub distance_au: f64,
}

/// Airless horizontal place. Azimuth is measured from North through East.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoords {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

/// Geocentric ecliptic rectangular vector in AU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Angle to another vector in degrees, 0..=180.
    pub fn angle_between(&self, other: &Vector3) -> f64 {
        let denom = self.length() * other.length();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos().to_degrees()
    }
}

/// Angle between two geocentric vectors, degrees.
pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
    a.angle_between(b)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Illumination {
    /// Sun-body-Earth angle in degrees.
    pub phase_angle_deg: f64,
    /// Illuminated fraction of the disc, 0..=1.
    pub phase_fraction: f64,
}

/// Positional astronomy needed to judge an evening.
///
/// Implementations must be thread-safe; one instance is shared by every
/// lookup in a calendar build.
pub trait Ephemeris: Send + Sync {
    /// Topocentric RA/Dec of a body, equinox of date.
    fn equator_of_date(&self, body: Body, time: DateTime<Utc>, observer: GeoCoordinate) -> EquatorialCoords;

    /// Airless altitude/azimuth of an equatorial place.
    fn horizon(&self, time: DateTime<Utc>, observer: GeoCoordinate, ra_deg: f64, dec_deg: f64) -> HorizontalCoords;

    /// Next rise or set of a body after `start` (or before it when
    /// `limit_days` is negative), within `|limit_days|`.
    fn search_rise_set(
        &self,
        body: Body,
        observer: GeoCoordinate,
        direction: RiseSet,
        start: DateTime<Utc>,
        limit_days: f64,
    ) -> Option<DateTime<Utc>>;

    fn geocentric_vector(&self, body: Body, time: DateTime<Utc>) -> Vector3;

    fn illumination(&self, body: Body, time: DateTime<Utc>) -> Illumination;

    /// Moon minus Sun geocentric ecliptic longitude, 0..360. 0 is new moon.
    fn moon_phase_angle(&self, time: DateTime<Utc>) -> f64;

    /// Instant at which the phase angle reaches `target_deg`, searching
    /// forward from `start` (backward for negative `limit_days`).
    fn search_moon_phase(&self, target_deg: f64, start: DateTime<Utc>, limit_days: f64) -> Option<DateTime<Utc>>;

    /// Airless topocentric altitude/azimuth of a body.
    fn horizontal(&self, body: Body, time: DateTime<Utc>, observer: GeoCoordinate) -> HorizontalCoords {
        let eq = self.equator_of_date(body, time, observer);
        self.horizon(time, observer, eq.ra_deg, eq.dec_deg)
    }

    /// Geocentric Sun-Moon separation in degrees.
    fn elongation(&self, time: DateTime<Utc>) -> f64 {
        let sun = self.geocentric_vector(Body::Sun, time);
        let moon = self.geocentric_vector(Body::Moon, time);
        angle_between(&sun, &moon)
    }
}

/// VSOP87 / ELP-2000/82 ephemeris following Meeus' algorithms.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeeusEphemeris;

impl MeeusEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Geocentric ecliptic (lon deg, lat deg, distance AU), equinox of date.
    fn ecliptic(&self, body: Body, time: DateTime<Utc>) -> (f64, f64, f64) {
        let jde = jd_ut_to_tt(datetime_to_jd(time));
        match body {
            Body::Sun => vsop87::calculate(jde),
            Body::Moon => {
                let (lon, lat, dist_km) = elp2000::calculate(jde);
                (lon, lat, dist_km / AU_KM)
            }
        }
    }

    /// Altitude of the body's centre at the moment its upper limb touches
    /// the refracted horizon.
    fn rise_set_altitude(&self, body: Body, distance_au: f64) -> f64 {
        let semi_diameter = match body {
            Body::Sun => SUN_SEMI_DIAMETER_AT_1AU_DEG / distance_au,
            Body::Moon => (MOON_RADIUS_KM / (distance_au * AU_KM)).asin().to_degrees(),
        };
        -(HORIZON_REFRACTION_DEG + semi_diameter)
    }

    fn altitude_above_rise_set(&self, body: Body, time: DateTime<Utc>, observer: GeoCoordinate) -> f64 {
        let eq = self.equator_of_date(body, time, observer);
        let hor = self.horizon(time, observer, eq.ra_deg, eq.dec_deg);
        hor.altitude_deg - self.rise_set_altitude(body, eq.distance_au)
    }
}

/// Converts a fractional day count to a chrono duration (millisecond precision).
fn days(d: f64) -> Duration {
    Duration::milliseconds((d * 86_400_000.0).round() as i64)
}

fn crosses(direction: RiseSet, before: f64, after: f64) -> bool {
    match direction {
        RiseSet::Set => before > 0.0 && after <= 0.0,
        RiseSet::Rise => before < 0.0 && after >= 0.0,
    }
}

/// Shrinks a sign-change bracket `[a, b]` of `f` to a single instant.
fn bisect<F>(mut a: DateTime<Utc>, mut fa: f64, mut b: DateTime<Utc>, rounds: usize, f: F) -> DateTime<Utc>
where
    F: Fn(DateTime<Utc>) -> f64,
{
    for _ in 0..rounds {
        let mid = a + (b - a) / 2;
        let fm = f(mid);
        if (fa > 0.0) == (fm > 0.0) {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }
    a + (b - a) / 2
}

impl Ephemeris for MeeusEphemeris {
    fn equator_of_date(&self, body: Body, time: DateTime<Utc>, observer: GeoCoordinate) -> EquatorialCoords {
        let jd = datetime_to_jd(time);
        let (lon, lat, distance_au) = self.ecliptic(body, time);
        let (ra, dec) = coords::ecliptic_to_equatorial(lon, lat, coords::mean_obliquity(jd_ut_to_tt(jd)));
        let lst = coords::local_sidereal_time(jd, observer.lng);
        let (ra_deg, dec_deg) = coords::apply_parallax(ra, dec, distance_au * AU_KM, observer.lat, lst);
        EquatorialCoords { ra_deg, dec_deg, distance_au }
    }

    fn horizon(&self, time: DateTime<Utc>, observer: GeoCoordinate, ra_deg: f64, dec_deg: f64) -> HorizontalCoords {
        let lst = coords::local_sidereal_time(datetime_to_jd(time), observer.lng);
        let (azimuth_deg, altitude_deg) = coords::equatorial_to_horizontal(ra_deg, dec_deg, lst, observer.lat);
        HorizontalCoords { altitude_deg, azimuth_deg }
    }

    fn search_rise_set(
        &self,
        body: Body,
        observer: GeoCoordinate,
        direction: RiseSet,
        start: DateTime<Utc>,
        limit_days: f64,
    ) -> Option<DateTime<Utc>> {
        if !limit_days.is_finite() || limit_days == 0.0 {
            return None;
        }

        let f = |t: DateTime<Utc>| self.altitude_above_rise_set(body, t, observer);
        let step = Duration::minutes(RISE_SET_STEP_MINUTES);
        let steps = (limit_days.abs() * 1440.0 / RISE_SET_STEP_MINUTES as f64).ceil() as usize;
        let end = start + days(limit_days);

        if limit_days > 0.0 {
            let (mut a, mut fa) = (start, f(start));
            for _ in 0..steps {
                let b = (a + step).min(end);
                let fb = f(b);
                if crosses(direction, fa, fb) {
                    return Some(bisect(a, fa, b, RISE_SET_BISECTIONS, f));
                }
                a = b;
                fa = fb;
            }
        } else {
            let (mut b, mut fb) = (start, f(start));
            for _ in 0..steps {
                let a = (b - step).max(end);
                let fa = f(a);
                if crosses(direction, fa, fb) {
                    return Some(bisect(a, fa, b, RISE_SET_BISECTIONS, f));
                }
                b = a;
                fb = fa;
            }
        }
        None
    }

    fn geocentric_vector(&self, body: Body, time: DateTime<Utc>) -> Vector3 {
        let (lon, lat, dist) = self.ecliptic(body, time);
        let (x, y, z) = coords::spherical_to_cartesian(lon, lat, dist);
        Vector3::new(x, y, z)
    }

    fn illumination(&self, body: Body, time: DateTime<Utc>) -> Illumination {
        match body {
            Body::Sun => Illumination { phase_angle_deg: 0.0, phase_fraction: 1.0 },
            Body::Moon => {
                let sun = self.geocentric_vector(Body::Sun, time);
                let moon = self.geocentric_vector(Body::Moon, time);
                let psi = angle_between(&sun, &moon).to_radians();
                let (r, delta) = (sun.length(), moon.length());

                // Meeus 48.3
                let i = (r * psi.sin()).atan2(delta - r * psi.cos());
                Illumination {
                    phase_angle_deg: i.to_degrees(),
                    phase_fraction: (1.0 + i.cos()) / 2.0,
                }
            }
        }
    }

    fn moon_phase_angle(&self, time: DateTime<Utc>) -> f64 {
        let (sun_lon, _, _) = self.ecliptic(Body::Sun, time);
        let (moon_lon, _, _) = self.ecliptic(Body::Moon, time);
        normalize_degrees(moon_lon - sun_lon)
    }

    fn search_moon_phase(&self, target_deg: f64, start: DateTime<Utc>, limit_days: f64) -> Option<DateTime<Utc>> {
        if !limit_days.is_finite() || limit_days == 0.0 {
            return None;
        }

        let f = |t: DateTime<Utc>| wrap_pm180(self.moon_phase_angle(t) - target_deg);
        let ahead = normalize_degrees(self.moon_phase_angle(start) - target_deg);

        // Predict the crossing from the mean motion, then bracket it
        let guess_days = if limit_days > 0.0 {
            (360.0 - ahead) / 360.0 * SYNODIC_MONTH_DAYS
        } else {
            -ahead / 360.0 * SYNODIC_MONTH_DAYS
        };
        let guess = start + days(guess_days);
        let mut a = guess - days(PHASE_BRACKET_DAYS);
        let mut b = guess + days(PHASE_BRACKET_DAYS);
        if limit_days > 0.0 {
            a = a.max(start);
        } else {
            b = b.min(start);
        }

        let (fa, fb) = (f(a), f(b));
        if !(fa < 0.0 && fb >= 0.0 && fb - fa < 180.0) {
            return None;
        }

        let found = bisect(a, fa, b, PHASE_BISECTIONS, f);
        let within = if limit_days > 0.0 { found <= start + days(limit_days) } else { found >= start + days(limit_days) };
        within.then_some(found)
    }
}
