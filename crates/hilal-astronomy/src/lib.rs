//! Crescent visibility estimation for Hilal.
//!
//! Sun and Moon positions come from VSOP87 and ELP-2000/82 behind the
//! [`Ephemeris`] trait; three independent estimators sit on top of it:
//! the heuristic evening score, Yallop's q-test and Odeh's V-test.

pub mod time;
pub mod vsop87;
pub mod elp2000;
pub mod coords;
pub mod ephemeris;
pub mod evening;
pub mod score;
pub mod crescent;
pub mod yallop;
pub mod odeh;

pub use ephemeris::{
    Body, Ephemeris, EquatorialCoords, HorizontalCoords, Illumination, MeeusEphemeris, RiseSet,
    Vector3, AU_KM, SYNODIC_MONTH_DAYS,
};
pub use evening::{
    estimate_month_start_likelihood_at_sunset, EveningCircumstances, EveningEstimator, SunsetSky,
};
pub use score::{ScoreBand, ScoreInputs, VisibilityScoreModel};
pub use crescent::{CrescentGeometry, CrescentTestResult, VisibilityCriterion};
pub use yallop::{compute_yallop_test, yallop_month_start_estimate, Yallop, YallopResult};
pub use odeh::{compute_odeh_test, odeh_month_start_estimate, Odeh, OdehResult};
