use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use log::*;
use serde::Deserialize;

use super::AppState;
use crate::{
    services::{
        geocoding::{resolve_address, MISSING_ADDRESS},
        Coordinates,
    },
    NavMapError,
};

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    address: Option<String>,
}

/// `GET /geocode?address=...`
///
/// A query string that does not deserialize (a repeated `address`, say) is
/// treated like a missing address so the reply stays JSON.
pub async fn geocode(
    State(state): State<AppState>,
    query: Result<Query<GeocodeQuery>, QueryRejection>,
) -> Result<Json<Coordinates>, NavMapError> {
    let Query(query) = query.map_err(|rejection| {
        debug!("Rejected geocode query: {}", rejection.body_text());
        NavMapError::InvalidInput(MISSING_ADDRESS)
    })?;
    let address = query.address.unwrap_or_default();
    trace!("Received geocode request for {:?}.", address);
    let coords = resolve_address(state.geocoder.as_ref(), &address).await?;
    Ok(Json(coords))
}
