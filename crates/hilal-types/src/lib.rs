//! Core types for Hilal - crescent visibility and estimated Hijri calendar engine.
//!
//! This crate contains pure type definitions with no astronomy.

mod calendar;
mod criteria;
mod error;
mod estimate;
mod geo;
mod hijri;

pub use calendar::EstimatedHijriDay;
pub use criteria::CrescentVisibilityCriteria;
pub use error::HilalError;
pub use estimate::{EstimateMetrics, Likelihood, MonthStartEstimate, OdehZone, YallopZone};
pub use geo::GeoCoordinate;
pub use hijri::{HijriDate, MAX_HIJRI_MONTH_DAYS, hijri_month_name};

/// Gregorian calendar date (proleptic, naive, no time-of-day).
pub type GregorianDate = chrono::NaiveDate;

/// Observer location on the Earth's surface (sea level).
pub type ObserverLocation = GeoCoordinate;
