use thiserror::Error;

use crate::services::{geolocation::DeviceError, CoordinateError, Coordinates};

pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum NavMapError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("location not found")]
    LocationNotFound,
    #[error("no route found between the selected locations")]
    RouteNotFound,
    #[error("no place name found for {0}")]
    PlaceNameNotFound(Coordinates),
    #[error("upstream request failed: {0}")]
    Upstream(#[source] GenericError),
    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl From<reqwest::Error> for NavMapError {
    fn from(error: reqwest::Error) -> Self {
        NavMapError::Upstream(Box::new(error))
    }
}

impl From<CoordinateError> for NavMapError {
    fn from(error: CoordinateError) -> Self {
        NavMapError::Upstream(Box::new(error))
    }
}
