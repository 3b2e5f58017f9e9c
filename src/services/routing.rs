use async_trait::async_trait;
use derive_more::Constructor;
use log::*;
use serde::Deserialize;

use super::Coordinates;
use crate::NavMapError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Returns the driving path from `start` to `end` as `(lat, lng)` points.
    async fn route(
        &self,
        start: Coordinates,
        end: Coordinates,
    ) -> Result<Vec<Coordinates>, NavMapError>;
}

/// Client for an OSRM-compatible route API.
#[derive(Debug, Clone, Constructor)]
pub struct OsrmService {
    client: reqwest::Client,
    base_url: String,
}

/// OSRM wants waypoints as `lng,lat` and we ask for the full geometry as
/// GeoJSON.
pub fn route_url(base_url: &str, start: Coordinates, end: Coordinates) -> String {
    format!(
        "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
        base_url,
        start.lng(),
        start.lat(),
        end.lng(),
        end.lat()
    )
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON positions, `[lng, lat]`.
    coordinates: Vec<[f64; 2]>,
}

impl RouteResponse {
    fn into_points(self) -> Result<Vec<Coordinates>, NavMapError> {
        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or(NavMapError::RouteNotFound)?;
        let points = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinates::new(lat, lng))
            .collect::<Result<Vec<_>, _>>()?;
        if points.is_empty() {
            return Err(NavMapError::RouteNotFound);
        }
        Ok(points)
    }
}

#[async_trait]
impl RoutingService for OsrmService {
    async fn route(
        &self,
        start: Coordinates,
        end: Coordinates,
    ) -> Result<Vec<Coordinates>, NavMapError> {
        let url = route_url(&self.base_url, start, end);
        debug!("Requesting route from {}.", url);
        let response: RouteResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        trace!("Received {} candidate routes.", response.routes.len());
        response.into_points()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::services::testing::{self, Upstream};

    fn points(body: &str) -> Result<Vec<Coordinates>, NavMapError> {
        serde_json::from_str::<RouteResponse>(body).unwrap().into_points()
    }

    #[test]
    fn waypoints_are_lng_lat() {
        let delhi = Coordinates::new(28.6139, 77.209).unwrap();
        let mumbai = Coordinates::new(19.076, 72.8777).unwrap();
        assert_eq!(
            route_url("https://router.project-osrm.org", delhi, mumbai),
            "https://router.project-osrm.org/route/v1/driving/77.209,28.6139;72.8777,19.076\
             ?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn converts_first_route_to_lat_lng() {
        let points = points(
            r#"{
                "code": "Ok",
                "routes": [
                    {"geometry": {"type": "LineString", "coordinates": [[77.209, 28.6139], [75.78, 26.91], [72.8777, 19.076]]}},
                    {"geometry": {"type": "LineString", "coordinates": [[0.0, 0.0]]}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            points,
            vec![
                Coordinates::new(28.6139, 77.209).unwrap(),
                Coordinates::new(26.91, 75.78).unwrap(),
                Coordinates::new(19.076, 72.8777).unwrap(),
            ]
        );
    }

    #[test]
    fn no_candidates_is_route_not_found() {
        assert!(matches!(
            points(r#"{"code": "Ok", "routes": []}"#),
            Err(NavMapError::RouteNotFound)
        ));
        assert!(matches!(
            points(r#"{"code": "NoRoute"}"#),
            Err(NavMapError::RouteNotFound)
        ));
        assert!(matches!(
            points(r#"{"routes": [{"geometry": {"coordinates": []}}]}"#),
            Err(NavMapError::RouteNotFound)
        ));
    }

    #[test]
    fn out_of_range_geometry_is_rejected() {
        let error =
            points(r#"{"routes": [{"geometry": {"coordinates": [[10.0, 120.0]]}}]}"#).unwrap_err();
        assert!(matches!(error, NavMapError::Upstream(_)));
    }

    #[tokio::test]
    async fn requests_full_geojson_route() {
        let upstream = Upstream::spawn(
            StatusCode::OK,
            json!({
                "code": "Ok",
                "routes": [{"geometry": {"coordinates": [[77.209, 28.6139], [72.8777, 19.076]]}}]
            }),
        )
        .await;
        let service = OsrmService::new(testing::client(), upstream.base_url.clone());
        let delhi = Coordinates::new(28.6139, 77.209).unwrap();
        let mumbai = Coordinates::new(19.076, 72.8777).unwrap();

        let points = service.route(delhi, mumbai).await.unwrap();

        assert_eq!(points, vec![delhi, mumbai]);
        let requests = upstream.requests();
        assert_eq!(requests[0].path, "/route/v1/driving/77.209,28.6139;72.8777,19.076");
        assert_eq!(
            requests[0].query.as_deref(),
            Some("overview=full&geometries=geojson")
        );
        assert_eq!(requests[0].user_agent.as_deref(), Some(testing::USER_AGENT));
    }
}
