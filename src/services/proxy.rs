use async_trait::async_trait;
use derive_more::Constructor;
use log::*;
use reqwest::StatusCode;

use super::{geocoding::GeocodingService, Coordinates};
use crate::{services::geocoding::MISSING_ADDRESS, NavMapError};

/// Forward geocoding through our own `/geocode` endpoint.
#[derive(Debug, Clone, Constructor)]
pub struct ProxyGeocodingClient {
    client: reqwest::Client,
    base_url: String,
}

fn check_status(status: StatusCode) -> Result<(), NavMapError> {
    match status {
        StatusCode::BAD_REQUEST => Err(NavMapError::InvalidInput(MISSING_ADDRESS)),
        StatusCode::NOT_FOUND => Err(NavMapError::LocationNotFound),
        status if !status.is_success() => {
            Err(NavMapError::Upstream(format!("geocode proxy answered {}", status).into()))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl GeocodingService for ProxyGeocodingClient {
    async fn geocode(&self, address: &str) -> Result<Coordinates, NavMapError> {
        let response = self
            .client
            .get(format!("{}/geocode", self.base_url))
            .query(&[("address", address)])
            .send()
            .await?;
        check_status(response.status())?;
        let coords = response.json::<Coordinates>().await?;
        trace!("Proxy resolved {:?} to {}.", address, coords);
        Ok(coords)
    }
}
