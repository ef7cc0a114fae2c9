//! Extension trait for `NaiveDate`.

use chrono::NaiveDate;
use hilal_astronomy::{
    estimate_month_start_likelihood_at_sunset, odeh_month_start_estimate, yallop_month_start_estimate, MeeusEphemeris,
};
use hilal_calendar::to_hijri;
use hilal_types::{GeoCoordinate, HijriDate, HilalError, MonthStartEstimate};

use crate::month_start::{AstronomicalProvider, EstimationMethod, EveningProvider};

/// Extends `NaiveDate` with crescent estimates for its evening.
pub trait HilalDateExt {
    /// Heuristic estimate for the evening of this date.
    fn month_start_estimate(&self, location: GeoCoordinate) -> MonthStartEstimate;

    /// Yallop q-test estimate for the evening of this date.
    fn yallop_estimate(&self, location: GeoCoordinate) -> MonthStartEstimate;

    /// Odeh V-test estimate for the evening of this date.
    fn odeh_estimate(&self, location: GeoCoordinate) -> MonthStartEstimate;

    /// Estimate with a chosen method.
    fn estimate_with(&self, location: GeoCoordinate, method: EstimationMethod) -> MonthStartEstimate;

    /// Civil (Umm al-Qura) Hijri date.
    fn civil_hijri(&self) -> Result<HijriDate, HilalError>;
}

impl HilalDateExt for NaiveDate {
    fn month_start_estimate(&self, location: GeoCoordinate) -> MonthStartEstimate {
        estimate_month_start_likelihood_at_sunset(*self, location)
    }

    fn yallop_estimate(&self, location: GeoCoordinate) -> MonthStartEstimate {
        yallop_month_start_estimate(*self, location)
    }

    fn odeh_estimate(&self, location: GeoCoordinate) -> MonthStartEstimate {
        odeh_month_start_estimate(*self, location)
    }

    fn estimate_with(&self, location: GeoCoordinate, method: EstimationMethod) -> MonthStartEstimate {
        AstronomicalProvider::new(MeeusEphemeris, method).evening_estimate(*self, location)
    }

    fn civil_hijri(&self) -> Result<HijriDate, HilalError> {
        to_hijri(*self, 0)
    }
}
