//! Yallop (1997) q-test.
//!
//! q = (ARCV − (11.8371 − 6.3226 W' + 0.7319 W'² − 0.1018 W'³)) / 10
//!
//! Reference: B. D. Yallop, "A Method for Predicting the First Sighting of
//! the New Crescent Moon", NAO Technical Note 69.

use chrono::NaiveDate;
use hilal_types::{EstimateMetrics, GeoCoordinate, Likelihood, MonthStartEstimate, YallopZone};

use crate::crescent::{
    compute_crescent_test, crescent_month_start_estimate, CrescentPolynomial, CrescentTestResult, VisibilityCriterion,
};
use crate::ephemeris::{Ephemeris, MeeusEphemeris};

const YALLOP_POLYNOMIAL: CrescentPolynomial = CrescentPolynomial { c0: 11.8371, c1: -6.3226, c2: 0.7319, c3: -0.1018 };

/// Lower bounds (exclusive) of zones A to E.
const ZONE_LIMITS: [(f64, YallopZone); 5] = [
    (0.216, YallopZone::A),
    (-0.014, YallopZone::B),
    (-0.160, YallopZone::C),
    (-0.232, YallopZone::D),
    (-0.293, YallopZone::E),
];

pub fn yallop_q(arcv_deg: f64, width_arcmin: f64) -> f64 {
    (arcv_deg - YALLOP_POLYNOMIAL.eval(width_arcmin)) / 10.0
}

pub fn yallop_zone(q: f64) -> YallopZone {
    ZONE_LIMITS
        .iter()
        .find(|(limit, _)| q > *limit)
        .map_or(YallopZone::F, |(_, zone)| *zone)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Yallop;

impl VisibilityCriterion for Yallop {
    type Zone = YallopZone;

    const NAME: &'static str = "yallop";

    fn test_value(arcv_deg: f64, width_arcmin: f64) -> f64 {
        yallop_q(arcv_deg, width_arcmin)
    }

    fn zone(value: f64, _arcl_deg: f64) -> YallopZone {
        yallop_zone(value)
    }

    fn likelihood(zone: YallopZone) -> Likelihood {
        match zone {
            YallopZone::A | YallopZone::B => Likelihood::High,
            YallopZone::C | YallopZone::D => Likelihood::Medium,
            YallopZone::E | YallopZone::F => Likelihood::Low,
        }
    }

    fn percent(zone: YallopZone) -> u8 {
        match zone {
            YallopZone::A => 95,
            YallopZone::B => 80,
            YallopZone::C => 55,
            YallopZone::D => 40,
            YallopZone::E => 10,
            YallopZone::F => 0,
        }
    }

    fn record(metrics: &mut EstimateMetrics, value: f64, zone: YallopZone) {
        metrics.yallop_q = Some(value);
        metrics.yallop_zone = Some(zone);
    }
}

pub type YallopResult = CrescentTestResult<Yallop>;

/// Yallop test for the evening of `date`. `None` when there is no sunset.
pub fn compute_yallop_test(date: NaiveDate, location: GeoCoordinate) -> Option<YallopResult> {
    compute_yallop_test_with(&MeeusEphemeris, date, location)
}

pub fn compute_yallop_test_with<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    date: NaiveDate,
    location: GeoCoordinate,
) -> Option<YallopResult> {
    compute_crescent_test::<Yallop, E>(ephemeris, date, location)
}

pub fn yallop_month_start_estimate(date: NaiveDate, location: GeoCoordinate) -> MonthStartEstimate {
    yallop_month_start_estimate_with(&MeeusEphemeris, date, location)
}

pub fn yallop_month_start_estimate_with<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    date: NaiveDate,
    location: GeoCoordinate,
) -> MonthStartEstimate {
    crescent_month_start_estimate::<Yallop, E>(ephemeris, date, location)
}
