//! # Hilal
//!
//! Crescent (hilal) visibility estimation and estimated Hijri calendars
//! built on high-precision Sun and Moon positions.
//!
//! This crate is a facade that re-exports the `hilal` ecosystem.
//!
//! ## Modules
//!
//! - `types`: core value types (HijriDate, MonthStartEstimate, GeoCoordinate, ...)
//! - `calendar`: civil Hijri conversion
//! - `astronomy`: ephemeris and the heuristic, Yallop and Odeh estimators
//! - `rules`: calendar builder, month-start rules and signal levels
//! - `config`: JSON / environment configuration
//!
//! ## Usage
//!
//! ```rust
//! use hilal::prelude::*;
//! use chrono::NaiveDate;
//!
//! let mecca = GeoCoordinate::new(21.4225, 39.8262).unwrap();
//! let evening = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
//! let estimate = estimate_month_start_likelihood_at_sunset(evening, mecca);
//! println!("{} ({:?}%)", estimate.likelihood, estimate.metrics.visibility_percent);
//! ```

pub use hilal_core::*;
