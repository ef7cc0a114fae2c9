//! Configuration loading.
//!
//! A [`HilalConfig`] bundles a default observer location, the calendar
//! options and the warm-up length. It can be read from a JSON document or
//! from `HILAL_*` environment variables.

use std::env;
use std::fs;
use std::path::Path;

use hilal_rules::constants::DEFAULT_WARM_UP_DAYS;
use hilal_rules::{CalendarOptions, EstimationMethod, MonthStartRule};
use hilal_types::{GeoCoordinate, HilalError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const ENV_LATITUDE: &str = "HILAL_LATITUDE";
pub const ENV_LONGITUDE: &str = "HILAL_LONGITUDE";
pub const ENV_METHOD: &str = "HILAL_METHOD";
pub const ENV_RULE: &str = "HILAL_RULE";
pub const ENV_WARM_UP_DAYS: &str = "HILAL_WARM_UP_DAYS";

/// Upper bound on the warm-up, about three Hijri years.
pub const MAX_WARM_UP_DAYS: u32 = 1100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HilalConfig {
    /// Default observer; required by [`crate::build_calendar_from_config`].
    pub location: Option<GeoCoordinate>,
    pub calendar: CalendarOptions,
    /// Days simulated before the requested range.
    pub warm_up_days: u32,
}

impl Default for HilalConfig {
    fn default() -> Self {
        Self {
            location: None,
            calendar: CalendarOptions::default(),
            warm_up_days: DEFAULT_WARM_UP_DAYS,
        }
    }
}

impl HilalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: GeoCoordinate) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_calendar(mut self, calendar: CalendarOptions) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_warm_up_days(mut self, days: u32) -> Self {
        self.warm_up_days = days;
        self
    }

    /// Checks the location, the calendar options and the warm-up bound.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), HilalError> {
        if let Some(loc) = self.location {
            GeoCoordinate::new(loc.lat, loc.lng)?;
        }
        self.calendar.validate()?;
        if self.warm_up_days > MAX_WARM_UP_DAYS {
            return Err(HilalError::invalid_config(format!(
                "warmUpDays {} exceeds {}",
                self.warm_up_days, MAX_WARM_UP_DAYS
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON document. Missing fields take defaults.
    #[instrument(skip(json))]
    pub fn from_json_str(json: &str) -> Result<Self, HilalError> {
        let config: HilalConfig =
            serde_json::from_str(json).map_err(|e| HilalError::ConfigError(format!("invalid JSON: {}", e)))?;
        config.validate()?;
        debug!(method = %config.calendar.method, rule = %config.calendar.rule, "configuration parsed");
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    #[instrument(skip(path))]
    pub fn try_from_json(path: impl AsRef<Path>) -> Result<Self, HilalError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| HilalError::ConfigError(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// Loads from `HILAL_*` environment variables; unset variables keep
    /// their defaults.
    #[instrument]
    pub fn from_env() -> Result<Self, HilalError> {
        debug!("loading configuration from environment variables");
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Same as [`HilalConfig::from_env`] with an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, HilalError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let lat = var(ENV_LATITUDE).map(|v| parse_var::<f64>(ENV_LATITUDE, &v)).transpose()?;
        let lng = var(ENV_LONGITUDE).map(|v| parse_var::<f64>(ENV_LONGITUDE, &v)).transpose()?;
        config.location = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(GeoCoordinate::new(lat, lng)?),
            (None, None) => None,
            _ => {
                return Err(HilalError::ConfigError(format!(
                    "{} and {} must be set together",
                    ENV_LATITUDE, ENV_LONGITUDE
                )));
            }
        };

        if let Some(v) = var(ENV_METHOD) {
            config.calendar.method = parse_var::<EstimationMethod>(ENV_METHOD, &v)?;
        }
        if let Some(v) = var(ENV_RULE) {
            config.calendar.rule = parse_var::<MonthStartRule>(ENV_RULE, &v)?;
        }
        if let Some(v) = var(ENV_WARM_UP_DAYS) {
            config.warm_up_days = parse_var::<u32>(ENV_WARM_UP_DAYS, &v)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, HilalError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| HilalError::ConfigError(format!("{} has invalid value '{}'", name, value)))
}
