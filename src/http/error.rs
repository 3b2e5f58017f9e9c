use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::*;
use serde_json::json;

use crate::NavMapError;

impl IntoResponse for NavMapError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            NavMapError::InvalidInput(message) => (StatusCode::BAD_REQUEST, *message),
            NavMapError::LocationNotFound => {
                debug!("Geocoder found no match.");
                (StatusCode::NOT_FOUND, "Location not found")
            }
            _ => {
                // Only the log gets the cause.
                error!("Error fetching geolocation: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
