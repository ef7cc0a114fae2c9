//! Odeh (2004) V-test.
//!
//! V = ARCV − (−0.1018 W'³ + 0.7319 W'² − 6.3226 W' + 7.1651)
//!
//! Reference: M. S. Odeh, "New Criterion for Lunar Crescent Visibility",
//! Experimental Astronomy 18 (2004).

use chrono::NaiveDate;
use hilal_types::{EstimateMetrics, GeoCoordinate, Likelihood, MonthStartEstimate, OdehZone};

use crate::crescent::{
    compute_crescent_test, crescent_month_start_estimate, CrescentPolynomial, CrescentTestResult, VisibilityCriterion,
};
use crate::ephemeris::{Ephemeris, MeeusEphemeris};

const ODEH_POLYNOMIAL: CrescentPolynomial = CrescentPolynomial { c0: 7.1651, c1: -6.3226, c2: 0.7319, c3: -0.1018 };

/// Below this elongation (Danjon limit as revised by Odeh) nothing is visible.
pub const ODEH_MIN_ARCL_DEG: f64 = 6.4;

pub fn odeh_v(arcv_deg: f64, width_arcmin: f64) -> f64 {
    arcv_deg - ODEH_POLYNOMIAL.eval(width_arcmin)
}

pub fn odeh_zone(v: f64, arcl_deg: f64) -> OdehZone {
    if arcl_deg < ODEH_MIN_ARCL_DEG {
        OdehZone::D
    } else if v >= 5.65 {
        OdehZone::A
    } else if v >= 2.0 {
        OdehZone::B
    } else if v >= -0.96 {
        OdehZone::C
    } else {
        OdehZone::D
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Odeh;

impl VisibilityCriterion for Odeh {
    type Zone = OdehZone;

    const NAME: &'static str = "odeh";

    fn test_value(arcv_deg: f64, width_arcmin: f64) -> f64 {
        odeh_v(arcv_deg, width_arcmin)
    }

    fn zone(value: f64, arcl_deg: f64) -> OdehZone {
        odeh_zone(value, arcl_deg)
    }

    fn likelihood(zone: OdehZone) -> Likelihood {
        match zone {
            OdehZone::A | OdehZone::B => Likelihood::High,
            OdehZone::C => Likelihood::Medium,
            OdehZone::D => Likelihood::Low,
        }
    }

    fn percent(zone: OdehZone) -> u8 {
        match zone {
            OdehZone::A => 95,
            OdehZone::B => 75,
            OdehZone::C => 45,
            OdehZone::D => 0,
        }
    }

    fn record(metrics: &mut EstimateMetrics, value: f64, zone: OdehZone) {
        metrics.odeh_v = Some(value);
        metrics.odeh_zone = Some(zone);
    }
}

pub type OdehResult = CrescentTestResult<Odeh>;

/// Odeh test for the evening of `date`. `None` when there is no sunset.
pub fn compute_odeh_test(date: NaiveDate, location: GeoCoordinate) -> Option<OdehResult> {
    compute_odeh_test_with(&MeeusEphemeris, date, location)
}

pub fn compute_odeh_test_with<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    date: NaiveDate,
    location: GeoCoordinate,
) -> Option<OdehResult> {
    compute_crescent_test::<Odeh, E>(ephemeris, date, location)
}

pub fn odeh_month_start_estimate(date: NaiveDate, location: GeoCoordinate) -> MonthStartEstimate {
    odeh_month_start_estimate_with(&MeeusEphemeris, date, location)
}

pub fn odeh_month_start_estimate_with<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    date: NaiveDate,
    location: GeoCoordinate,
) -> MonthStartEstimate {
    crescent_month_start_estimate::<Odeh, E>(ephemeris, date, location)
}
