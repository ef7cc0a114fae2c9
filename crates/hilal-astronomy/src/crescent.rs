//! Best-time crescent geometry shared by the Yallop and Odeh criteria.
//!
//! Both criteria evaluate the sky at the "best time" after sunset, measure
//! the arc of vision (ARCV) and the topocentric crescent width (W'), then
//! map a criterion-specific test value onto visibility zones. The geometry
//! lives here; each criterion only supplies its polynomial and zone table
//! through [`VisibilityCriterion`].

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use hilal_types::{EstimateMetrics, GeoCoordinate, Likelihood, MonthStartEstimate};
use tracing::{debug, warn};

use crate::coords::{wrap_pm180, EARTH_EQUATORIAL_RADIUS_KM};
use crate::ephemeris::{Body, Ephemeris, HorizontalCoords, AU_KM};
use crate::evening::EveningCircumstances;
use crate::score::{MAX_NEW_CRESCENT_AGE_HOURS, MAX_NEW_CRESCENT_PHASE};

/// Best time = sunset + 4/9 of the lag (Yallop 1997).
pub const BEST_TIME_LAG_FRACTION: f64 = 4.0 / 9.0;
/// Lunar semi-diameter over horizontal parallax.
pub const SEMI_DIAMETER_PER_PARALLAX: f64 = 0.27245;

/// Cubic `c0 + c1 w + c2 w² + c3 w³` in the crescent width (arcmin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrescentPolynomial {
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl CrescentPolynomial {
    pub fn eval(&self, w: f64) -> f64 {
        self.c0 + w * (self.c1 + w * (self.c2 + w * self.c3))
    }
}

/// Horizontal parallax of the Moon in degrees.
pub fn lunar_parallax_deg(distance_km: f64) -> f64 {
    (EARTH_EQUATORIAL_RADIUS_KM / distance_km).asin().to_degrees()
}

/// Semi-diameters and topocentric crescent width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrescentWidth {
    pub semi_diameter_deg: f64,
    pub topocentric_semi_diameter_deg: f64,
    pub width_arcmin: f64,
}

/// W' = SD' (1 − cos ARCL), with SD' augmented for the Moon's altitude.
pub fn crescent_width(parallax_deg: f64, moon_altitude_deg: f64, arcl_deg: f64) -> CrescentWidth {
    let semi_diameter_deg = SEMI_DIAMETER_PER_PARALLAX * parallax_deg;
    let topocentric_semi_diameter_deg =
        semi_diameter_deg * (1.0 + moon_altitude_deg.to_radians().sin() * parallax_deg.to_radians().sin());
    let width_arcmin = topocentric_semi_diameter_deg * (1.0 - arcl_deg.to_radians().cos()) * 60.0;
    CrescentWidth { semi_diameter_deg, topocentric_semi_diameter_deg, width_arcmin }
}

/// Sky geometry at the best time of one evening.
#[derive(Debug, Clone, PartialEq)]
pub struct CrescentGeometry {
    pub evening: EveningCircumstances,
    pub best_time: DateTime<Utc>,
    pub sun: HorizontalCoords,
    pub moon: HorizontalCoords,
    /// Moon altitude minus Sun altitude.
    pub arcv_deg: f64,
    /// Geocentric Sun-Moon elongation.
    pub arcl_deg: f64,
    /// Sun azimuth minus Moon azimuth, wrapped to [-180, 180).
    pub daz_deg: f64,
    pub parallax_deg: f64,
    pub width: CrescentWidth,
    pub illumination_fraction: f64,
}

impl CrescentGeometry {
    /// `None` when the date has no sunset.
    pub fn compute<E: Ephemeris + ?Sized>(ephemeris: &E, date: NaiveDate, location: GeoCoordinate) -> Option<Self> {
        let evening = EveningCircumstances::find(ephemeris, date, location)?;

        let offset_ms = evening.lag_minutes.map_or(0.0, |lag| lag * BEST_TIME_LAG_FRACTION * 60_000.0);
        let best_time = evening.sunset + Duration::milliseconds(offset_ms.round() as i64);

        let sun = ephemeris.horizontal(Body::Sun, best_time, location);
        let moon_eq = ephemeris.equator_of_date(Body::Moon, best_time, location);
        let moon = ephemeris.horizon(best_time, location, moon_eq.ra_deg, moon_eq.dec_deg);
        let arcl_deg = ephemeris.elongation(best_time);
        let parallax_deg = lunar_parallax_deg(moon_eq.distance_au * AU_KM);

        Some(Self {
            best_time,
            sun,
            moon,
            arcv_deg: moon.altitude_deg - sun.altitude_deg,
            arcl_deg,
            daz_deg: wrap_pm180(sun.azimuth_deg - moon.azimuth_deg),
            parallax_deg,
            width: crescent_width(parallax_deg, moon.altitude_deg, arcl_deg),
            illumination_fraction: ephemeris.illumination(Body::Moon, best_time).phase_fraction,
            evening,
        })
    }

    /// The Moon at sunset is older than a new crescent can be.
    pub fn is_past_new_crescent(&self) -> bool {
        self.evening.moon_age_hours > MAX_NEW_CRESCENT_AGE_HOURS
            || self.evening.moon_phase_fraction > MAX_NEW_CRESCENT_PHASE
    }

    /// Shared keys hold the sky at sunset; best-time positions go under
    /// their own keys.
    fn metrics(&self) -> EstimateMetrics {
        EstimateMetrics {
            best_time_utc: Some(self.best_time),
            best_time_moon_altitude_deg: Some(self.moon.altitude_deg),
            best_time_moon_azimuth_deg: Some(self.moon.azimuth_deg),
            best_time_sun_altitude_deg: Some(self.sun.altitude_deg),
            best_time_sun_azimuth_deg: Some(self.sun.azimuth_deg),
            best_time_illumination_fraction: Some(self.illumination_fraction),
            arcv_deg: Some(self.arcv_deg),
            arcl_deg: Some(self.arcl_deg),
            crescent_width_arcmin: Some(self.width.width_arcmin),
            ..self.evening.base_metrics()
        }
    }
}

/// A published crescent criterion: test value from (ARCV, W') and a zone table.
pub trait VisibilityCriterion {
    type Zone: Copy + PartialEq + fmt::Debug + fmt::Display;

    const NAME: &'static str;

    fn test_value(arcv_deg: f64, width_arcmin: f64) -> f64;

    fn zone(value: f64, arcl_deg: f64) -> Self::Zone;

    fn likelihood(zone: Self::Zone) -> Likelihood;

    /// Rough chance of a sighting per zone, as a percentage.
    fn percent(zone: Self::Zone) -> u8;

    /// Writes the criterion's own fields into the metrics bag.
    fn record(metrics: &mut EstimateMetrics, value: f64, zone: Self::Zone);
}

/// Geometry plus the criterion's verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct CrescentTestResult<C: VisibilityCriterion> {
    pub geometry: CrescentGeometry,
    pub value: f64,
    pub zone: C::Zone,
}

impl<C: VisibilityCriterion> CrescentTestResult<C> {
    pub fn from_geometry(geometry: CrescentGeometry) -> Self {
        let value = C::test_value(geometry.arcv_deg, geometry.width.width_arcmin);
        let zone = C::zone(value, geometry.arcl_deg);
        Self { geometry, value, zone }
    }

    pub fn likelihood(&self) -> Likelihood {
        C::likelihood(self.zone)
    }

    pub fn percent(&self) -> u8 {
        C::percent(self.zone)
    }

    /// Converts to the common estimate shape. A Moon too old for a new
    /// crescent is reported `Low` at 0% whatever the zone says.
    pub fn to_estimate(&self) -> MonthStartEstimate {
        let (likelihood, percent) = if self.geometry.is_past_new_crescent() {
            (Likelihood::Low, 0)
        } else {
            (self.likelihood(), self.percent())
        };

        let mut metrics = self.geometry.metrics();
        metrics.visibility_percent = Some(percent);
        metrics.visibility_score = Some(f64::from(percent) / 100.0);
        C::record(&mut metrics, self.value, self.zone);

        MonthStartEstimate::new(likelihood, metrics)
    }
}

/// Runs criterion `C` for the evening of `date`. `None` when there is no sunset.
pub fn compute_crescent_test<C, E>(ephemeris: &E, date: NaiveDate, location: GeoCoordinate) -> Option<CrescentTestResult<C>>
where
    C: VisibilityCriterion,
    E: Ephemeris + ?Sized,
{
    let geometry = CrescentGeometry::compute(ephemeris, date, location)?;
    let result = CrescentTestResult::<C>::from_geometry(geometry);
    debug!(
        criterion = C::NAME,
        %date,
        value = result.value,
        zone = %result.zone,
        arcv = result.geometry.arcv_deg,
        width = result.geometry.width.width_arcmin,
        "crescent test"
    );
    Some(result)
}

/// Month-start estimate from criterion `C`; `Unknown` when there is no sunset.
pub fn crescent_month_start_estimate<C, E>(ephemeris: &E, date: NaiveDate, location: GeoCoordinate) -> MonthStartEstimate
where
    C: VisibilityCriterion,
    E: Ephemeris + ?Sized,
{
    match compute_crescent_test::<C, E>(ephemeris, date, location) {
        Some(result) => result.to_estimate(),
        None => {
            warn!(criterion = C::NAME, %date, lat = location.lat, lng = location.lng, "no sunset found, likelihood unknown");
            MonthStartEstimate::unknown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polynomial_horner() {
        let p = CrescentPolynomial { c0: 1.0, c1: 2.0, c2: 3.0, c3: 4.0 };
        assert_eq!(p.eval(0.0), 1.0);
        assert_eq!(p.eval(2.0), 1.0 + 4.0 + 12.0 + 32.0);
    }

    #[test]
    fn test_parallax_mean_distance() {
        let p = lunar_parallax_deg(384_400.0);
        assert!((p - 0.9507).abs() < 1e-3, "parallax = {}", p);
    }

    #[test]
    fn test_crescent_width() {
        let w = crescent_width(0.9507213, 5.0, 10.0);
        assert!((w.semi_diameter_deg - 0.259024).abs() < 1e-5);
        assert!((w.topocentric_semi_diameter_deg - 0.259399).abs() < 1e-5);
        assert!((w.width_arcmin - 0.236451).abs() < 1e-4, "W' = {}", w.width_arcmin);
    }

    #[test]
    fn test_zero_elongation_has_no_width() {
        assert_eq!(crescent_width(0.95, 3.0, 0.0).width_arcmin, 0.0);
    }
}
