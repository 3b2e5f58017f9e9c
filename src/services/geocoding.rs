use super::Coordinates;

use crate::NavMapError;

use async_trait::async_trait;
use derive_more::Constructor;
use log::*;
use serde::Deserialize;

pub const MISSING_ADDRESS: &str = "Address query parameter is required";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeocodingService: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, NavMapError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReverseGeocodingService: Send + Sync {
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<String, NavMapError>;
}

/// Resolves a free-text address to the geocoder's best match.
///
/// Blank input is rejected before anything goes over the wire.
pub async fn resolve_address(
    geocoder: &dyn GeocodingService,
    address: &str,
) -> Result<Coordinates, NavMapError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(NavMapError::InvalidInput(MISSING_ADDRESS));
    }
    geocoder.geocode(address).await
}

/// Client for a Nominatim-compatible search API.
#[derive(Debug, Clone, Constructor)]
pub struct NominatimService {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    #[serde(default)]
    display_name: Option<String>,
}

fn first_match(results: Vec<SearchResult>) -> Result<Coordinates, NavMapError> {
    let best = results
        .into_iter()
        .next()
        .ok_or(NavMapError::LocationNotFound)?;
    Ok(Coordinates::parse(&best.lat, &best.lon)?)
}

fn place_name(result: ReverseResult, coords: Coordinates) -> Result<String, NavMapError> {
    result
        .display_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(NavMapError::PlaceNameNotFound(coords))
}

#[async_trait]
impl GeocodingService for NominatimService {
    async fn geocode(&self, address: &str) -> Result<Coordinates, NavMapError> {
        let results: Vec<SearchResult> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "json"), ("q", address)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        trace!("Received {} matches from geocoder.", results.len());
        first_match(results)
    }
}

#[async_trait]
impl ReverseGeocodingService for NominatimService {
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<String, NavMapError> {
        let lat = coords.lat().to_string();
        let lon = coords.lng().to_string();
        let result: ReverseResult = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        trace!("Received reverse geocoding result for {}.", coords);
        place_name(result, coords)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::services::testing::{self, Upstream};

    fn parse(body: &str) -> Result<Coordinates, NavMapError> {
        first_match(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn takes_first_search_result() {
        let coords = parse(
            r#"[
                {"place_id": 1, "lat": "28.6138954", "lon": "77.2090057", "display_name": "Delhi"},
                {"place_id": 2, "lat": "28.7", "lon": "77.1", "display_name": "Delhi Cantonment"}
            ]"#,
        )
        .unwrap();
        assert_eq!(coords, Coordinates::new(28.6138954, 77.2090057).unwrap());
    }

    #[test]
    fn empty_search_is_not_found() {
        let error = parse("[]").unwrap_err();
        assert!(matches!(error, NavMapError::LocationNotFound));
    }

    #[test]
    fn malformed_coordinates_are_upstream_errors() {
        let error = parse(r#"[{"lat": "", "lon": "77.2"}]"#).unwrap_err();
        assert!(matches!(error, NavMapError::Upstream(_)));

        let error = parse(r#"[{"lat": "95.0", "lon": "77.2"}]"#).unwrap_err();
        assert!(matches!(error, NavMapError::Upstream(_)));
    }

    #[test]
    fn reverse_lookup_requires_display_name() {
        let coords = Coordinates::new(48.8584, 2.2945).unwrap();

        let named: ReverseResult =
            serde_json::from_str(r#"{"display_name": "Tour Eiffel, Paris"}"#).unwrap();
        assert_eq!(place_name(named, coords).unwrap(), "Tour Eiffel, Paris");

        let unnamed: ReverseResult =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(matches!(
            place_name(unnamed, coords),
            Err(NavMapError::PlaceNameNotFound(c)) if c == coords
        ));
    }

    #[tokio::test]
    async fn blank_address_skips_geocoder() {
        let mut geocoder = MockGeocodingService::new();
        geocoder.expect_geocode().never();

        for address in ["", "   "] {
            let error = resolve_address(&geocoder, address).await.unwrap_err();
            assert!(matches!(error, NavMapError::InvalidInput(MISSING_ADDRESS)));
        }
    }

    #[tokio::test]
    async fn forwards_trimmed_address() {
        let mut geocoder = MockGeocodingService::new();
        geocoder
            .expect_geocode()
            .withf(|address| address == "Mumbai")
            .times(1)
            .returning(|_| Ok(Coordinates::new(19.076, 72.8777).unwrap()));

        let coords = resolve_address(&geocoder, "  Mumbai ").await.unwrap();
        assert_eq!(coords, Coordinates::new(19.076, 72.8777).unwrap());
    }

    #[tokio::test]
    async fn search_sends_format_and_query() {
        let upstream = Upstream::spawn(
            StatusCode::OK,
            json!([{"lat": "28.6139", "lon": "77.2090", "display_name": "New Delhi"}]),
        )
        .await;
        let service = NominatimService::new(testing::client(), upstream.base_url.clone());

        let coords = service.geocode("New Delhi").await.unwrap();

        assert_eq!(coords, Coordinates::new(28.6139, 77.209).unwrap());
        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/search");
        assert_eq!(requests[0].query.as_deref(), Some("format=json&q=New+Delhi"));
        assert_eq!(requests[0].user_agent.as_deref(), Some(testing::USER_AGENT));
    }

    #[tokio::test]
    async fn reverse_sends_lat_and_lon() {
        let upstream =
            Upstream::spawn(StatusCode::OK, json!({"display_name": "Tour Eiffel, Paris"})).await;
        let service = NominatimService::new(testing::client(), upstream.base_url.clone());

        let name = service
            .reverse_geocode(Coordinates::new(48.8584, 2.2945).unwrap())
            .await
            .unwrap();

        assert_eq!(name, "Tour Eiffel, Paris");
        let requests = upstream.requests();
        assert_eq!(requests[0].path, "/reverse");
        assert_eq!(requests[0].query.as_deref(), Some("format=json&lat=48.8584&lon=2.2945"));
        assert_eq!(requests[0].user_agent.as_deref(), Some(testing::USER_AGENT));
    }

    #[tokio::test]
    async fn unavailable_geocoder_is_upstream_error() {
        let upstream =
            Upstream::spawn(StatusCode::SERVICE_UNAVAILABLE, json!({"error": "busy"})).await;
        let service = NominatimService::new(testing::client(), upstream.base_url.clone());

        let error = service.geocode("Delhi").await.unwrap_err();
        assert!(matches!(error, NavMapError::Upstream(_)));
    }
}
