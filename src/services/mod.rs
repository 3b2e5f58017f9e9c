use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

pub mod geocoding;
pub mod geolocation;
pub mod proxy;
pub mod routing;
#[cfg(test)]
pub(crate) mod testing;

/// A validated WGS84 position.
///
/// Latitude and longitude are always finite and within range, so anything
/// holding a `Coordinates` can hand it to a map or a routing service as is.
#[derive(Debug, Clone, Copy, PartialEq, Display, Serialize, Deserialize)]
#[display(fmt = "{}, {}", lat, lng)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("`{0}` is not a number")]
    NotNumeric(String),
    #[error("coordinate is not finite")]
    NotFinite,
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Parses the decimal strings geocoders tend to return.
    pub fn parse(lat: &str, lng: &str) -> Result<Self, CoordinateError> {
        Coordinates::new(parse_degrees(lat)?, parse_degrees(lng)?)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

fn parse_degrees(text: &str) -> Result<f64, CoordinateError> {
    text.trim()
        .parse()
        .map_err(|_| CoordinateError::NotNumeric(text.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(self) -> Result<f64, CoordinateError> {
        match self {
            Degrees::Number(value) => Ok(value),
            Degrees::Text(text) => parse_degrees(&text),
        }
    }
}

#[derive(Deserialize)]
struct RawCoordinates {
    lat: Degrees,
    lng: Degrees,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.lat.value()?, raw.lng.value()?)
    }
}

/// Builds the HTTP client shared by every outbound service.
///
/// The user agent identifies this application to the upstream services,
/// which the public geocoder's usage policy requires.
pub fn http_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.upstream_timeout)
        .build()
}
