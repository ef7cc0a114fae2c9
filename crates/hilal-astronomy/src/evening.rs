//! Sunset-anchored evening circumstances and the heuristic estimator.

use chrono::{DateTime, NaiveDate, Utc};
use hilal_types::{EstimateMetrics, GeoCoordinate, MonthStartEstimate};
use tracing::{debug, warn};

use crate::coords::wrap_pm180;
use crate::ephemeris::{Body, Ephemeris, HorizontalCoords, MeeusEphemeris, RiseSet, SYNODIC_MONTH_DAYS};
use crate::score::{visibility_percent, ScoreInputs, VisibilityScoreModel};
use crate::time::utc_midnight;

/// Sunset is searched this far ahead of 00:00 UTC of the date.
pub const SUNSET_SEARCH_DAYS: f64 = 2.0;
/// Moon rise/set are searched this far either side of sunset.
pub const MOON_EVENT_SEARCH_DAYS: f64 = 2.0;
/// Sunrise is searched this far ahead of 00:00 UTC of the date.
pub const SUNRISE_SEARCH_DAYS: f64 = 1.0;
/// The previous conjunction is searched this far back from sunset.
pub const CONJUNCTION_SEARCH_DAYS: f64 = 40.0;

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

/// Sun and Moon as seen at sunset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunsetSky {
    pub sun: HorizontalCoords,
    pub moon: HorizontalCoords,
    pub elongation_deg: f64,
    pub illumination_fraction: f64,
}

impl SunsetSky {
    pub fn observe<E: Ephemeris + ?Sized>(ephemeris: &E, sunset: DateTime<Utc>, location: GeoCoordinate) -> Self {
        Self {
            sun: ephemeris.horizontal(Body::Sun, sunset, location),
            moon: ephemeris.horizontal(Body::Moon, sunset, location),
            elongation_deg: ephemeris.elongation(sunset),
            illumination_fraction: ephemeris.illumination(Body::Moon, sunset).phase_fraction,
        }
    }

    /// Moon azimuth minus Sun azimuth, wrapped to [-180, 180).
    pub fn relative_azimuth_deg(&self) -> f64 {
        wrap_pm180(self.moon.azimuth_deg - self.sun.azimuth_deg)
    }
}

/// Timing facts about one evening, shared by all three estimators.
#[derive(Debug, Clone, PartialEq)]
pub struct EveningCircumstances {
    pub date: NaiveDate,
    pub sunset: DateTime<Utc>,
    pub sunrise: Option<DateTime<Utc>>,
    /// The moonset paired with this sunset: the next one when the Moon is
    /// up at sunset, the previous one otherwise.
    pub moonset: Option<DateTime<Utc>>,
    pub moonrise: Option<DateTime<Utc>>,
    pub moon_up_at_sunset: bool,
    /// Moonset minus sunset in minutes.
    pub lag_minutes: Option<f64>,
    pub conjunction: Option<DateTime<Utc>>,
    /// Hours since the previous conjunction.
    pub moon_age_hours: f64,
    /// Phase angle over 360: 0 new, 0.5 full.
    pub moon_phase_fraction: f64,
    pub sky: SunsetSky,
}

impl EveningCircumstances {
    /// Resolves the evening of `date` at `location`.
    ///
    /// Returns `None` when the Sun does not set within two days of
    /// 00:00 UTC (polar day or night).
    pub fn find<E: Ephemeris + ?Sized>(ephemeris: &E, date: NaiveDate, location: GeoCoordinate) -> Option<Self> {
        let anchor = utc_midnight(date);
        let sunset = ephemeris.search_rise_set(Body::Sun, location, RiseSet::Set, anchor, SUNSET_SEARCH_DAYS)?;
        let sunrise = ephemeris.search_rise_set(Body::Sun, location, RiseSet::Rise, anchor, SUNRISE_SEARCH_DAYS);

        let next_set = ephemeris.search_rise_set(Body::Moon, location, RiseSet::Set, sunset, MOON_EVENT_SEARCH_DAYS);
        let next_rise = ephemeris.search_rise_set(Body::Moon, location, RiseSet::Rise, sunset, MOON_EVENT_SEARCH_DAYS);

        // The Moon is up when it sets before it next rises
        let moon_up_at_sunset = match (next_set, next_rise) {
            (Some(set), Some(rise)) => set < rise,
            (Some(_), None) => true,
            _ => false,
        };

        let (moonset, moonrise) = if moon_up_at_sunset {
            let prev_rise =
                ephemeris.search_rise_set(Body::Moon, location, RiseSet::Rise, sunset, -MOON_EVENT_SEARCH_DAYS);
            (next_set, prev_rise)
        } else {
            let prev_set =
                ephemeris.search_rise_set(Body::Moon, location, RiseSet::Set, sunset, -MOON_EVENT_SEARCH_DAYS);
            (prev_set, next_rise)
        };
        let lag_minutes = moonset.map(|set| minutes_between(sunset, set));

        let phase_angle = ephemeris.moon_phase_angle(sunset);
        let moon_phase_fraction = phase_angle / 360.0;
        let conjunction = ephemeris.search_moon_phase(0.0, sunset, -CONJUNCTION_SEARCH_DAYS);
        let moon_age_hours = match conjunction {
            Some(nm) => minutes_between(nm, sunset) / 60.0,
            None => moon_phase_fraction * SYNODIC_MONTH_DAYS * 24.0,
        };

        Some(Self {
            sky: SunsetSky::observe(ephemeris, sunset, location),
            date,
            sunset,
            sunrise,
            moonset,
            moonrise,
            moon_up_at_sunset,
            lag_minutes,
            conjunction,
            moon_age_hours,
            moon_phase_fraction,
        })
    }

    /// Metrics bag pre-filled with the timing facts and the sky at sunset.
    pub fn base_metrics(&self) -> EstimateMetrics {
        let sky = &self.sky;
        EstimateMetrics {
            moon_altitude_deg: Some(sky.moon.altitude_deg),
            moon_azimuth_deg: Some(sky.moon.azimuth_deg),
            sun_altitude_deg: Some(sky.sun.altitude_deg),
            sun_azimuth_deg: Some(sky.sun.azimuth_deg),
            relative_azimuth_deg: Some(sky.relative_azimuth_deg()),
            elongation_deg: Some(sky.elongation_deg),
            illumination_fraction: Some(sky.illumination_fraction),
            sunset_utc: Some(self.sunset),
            sunrise_utc: self.sunrise,
            moonrise_utc: self.moonrise,
            moonset_utc: self.moonset,
            lag_minutes: self.lag_minutes,
            moon_age_hours: Some(self.moon_age_hours),
            moon_phase_fraction: Some(self.moon_phase_fraction),
            ..Default::default()
        }
    }
}

/// Heuristic month-start estimator: evening geometry at sunset fed through
/// a [`VisibilityScoreModel`].
#[derive(Debug, Clone, Default)]
pub struct EveningEstimator<E = MeeusEphemeris> {
    ephemeris: E,
    model: VisibilityScoreModel,
}

impl<E: Ephemeris> EveningEstimator<E> {
    pub fn new(ephemeris: E) -> Self {
        Self { ephemeris, model: VisibilityScoreModel::default() }
    }

    pub fn with_model(mut self, model: VisibilityScoreModel) -> Self {
        self.model = model;
        self
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    pub fn model(&self) -> &VisibilityScoreModel {
        &self.model
    }

    /// Estimates whether the new crescent can be seen after sunset on `date`.
    ///
    /// A date without a sunset yields [`MonthStartEstimate::unknown`].
    pub fn estimate(&self, date: NaiveDate, location: GeoCoordinate) -> MonthStartEstimate {
        let eph = &self.ephemeris;
        let Some(evening) = EveningCircumstances::find(eph, date, location) else {
            warn!(%date, lat = location.lat, lng = location.lng, "no sunset found, likelihood unknown");
            return MonthStartEstimate::unknown();
        };

        let sky = evening.sky;
        let inputs = ScoreInputs {
            moon_altitude_deg: sky.moon.altitude_deg,
            elongation_deg: sky.elongation_deg,
            moon_age_hours: evening.moon_age_hours,
            lag_minutes: evening.lag_minutes,
            moon_phase_fraction: evening.moon_phase_fraction,
        };
        let (likelihood, score) = self.model.classify(&inputs);

        debug!(
            %date,
            %likelihood,
            score,
            moon_alt = sky.moon.altitude_deg,
            elongation = sky.elongation_deg,
            age_h = evening.moon_age_hours,
            lag_min = ?evening.lag_minutes,
            "evening estimate"
        );

        let metrics = EstimateMetrics {
            visibility_score: Some(score),
            visibility_percent: Some(visibility_percent(score)),
            ..evening.base_metrics()
        };

        MonthStartEstimate::new(likelihood, metrics)
    }
}

/// Heuristic estimate with the default ephemeris and score model.
pub fn estimate_month_start_likelihood_at_sunset(date: NaiveDate, location: GeoCoordinate) -> MonthStartEstimate {
    EveningEstimator::new(MeeusEphemeris).estimate(date, location)
}
