//! Google Routes API client.
//!
//! Computes a walking route through the generated points with a single
//! `computeRoutes` call. The field mask keeps the reply down to duration,
//! distance and the GeoJSON path.

use crate::models::{PathCoordinate, RouteRequest, RouteResult};
use crate::services::PipelineError;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::error::AppError;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "X-Goog-Api-Key";
pub const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";
pub const ROUTES_FIELD_MASK: &str =
    "routes.duration,routes.distanceMeters,routes.polyline.geoJsonLinestring";

/// Trait for route computation backends.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Compute a route and return the first candidate.
    async fn compute_route(&self, request: &RouteRequest) -> Result<RouteResult, PipelineError>;
}

#[derive(Debug, Clone)]
pub struct GoogleRoutesConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
    pub timeout: Duration,
}

pub struct GoogleRoutesClient {
    config: GoogleRoutesConfig,
    client: Client,
}

impl GoogleRoutesClient {
    pub fn new(config: GoogleRoutesConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl RouteProvider for GoogleRoutesClient {
    async fn compute_route(&self, request: &RouteRequest) -> Result<RouteResult, PipelineError> {
        tracing::debug!(
            waypoints = request.intermediates.len(),
            travel_mode = ?request.travel_mode,
            "Requesting route from Routes API"
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .header(FIELD_MASK_HEADER, ROUTES_FIELD_MASK)
            .json(request)
            .send()
            .await
            .map_err(|e| PipelineError::RoutingFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Routes API request failed");
            return Err(PipelineError::RoutingFailed(format!(
                "API request failed: {}",
                status
            )));
        }

        let parsed: ComputeRoutesResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::RoutingFailed(format!("Failed to parse response: {}", e)))?;

        let route = parsed
            .routes
            .into_iter()
            .next()
            .ok_or(PipelineError::NoRouteFound)?;

        route.try_into()
    }
}

// ============================================================================
// Routes API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoute {
    #[serde(default)]
    distance_meters: Option<u64>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    polyline: Option<ApiPolyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPolyline {
    #[serde(default)]
    geo_json_linestring: Option<GeoJsonLineString>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonLineString {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

impl TryFrom<ApiRoute> for RouteResult {
    type Error = PipelineError;

    fn try_from(route: ApiRoute) -> Result<Self, Self::Error> {
        let coordinates = route
            .polyline
            .and_then(|p| p.geo_json_linestring)
            .map(|l| l.coordinates)
            .unwrap_or_default();

        let path = coordinates
            .into_iter()
            .map(|pair| match pair.as_slice() {
                [x, y, ..] => Ok(PathCoordinate { x: *x, y: *y }),
                _ => Err(PipelineError::RoutingFailed(format!(
                    "line string coordinate has {} values",
                    pair.len()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RouteResult {
            path,
            distance_meters: route.distance_meters,
            duration: route.duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_route_geometry_becomes_the_path() {
        let body = r#"{
            "routes": [
                {
                    "distanceMeters": 1520,
                    "duration": "1200s",
                    "polyline": { "geoJsonLinestring": { "type": "LineString", "coordinates": [[23.7, 37.9], [23.8, 38.0]] } }
                },
                {
                    "polyline": { "geoJsonLinestring": { "coordinates": [[1.0, 2.0]] } }
                }
            ]
        }"#;
        let parsed: ComputeRoutesResponse = serde_json::from_str(body).unwrap();
        let route: RouteResult = parsed.routes.into_iter().next().unwrap().try_into().unwrap();

        assert_eq!(
            route.path,
            vec![
                PathCoordinate { x: 23.7, y: 37.9 },
                PathCoordinate { x: 23.8, y: 38.0 }
            ]
        );
        assert_eq!(route.distance_meters, Some(1520));
        assert_eq!(route.duration.as_deref(), Some("1200s"));
    }

    #[test]
    fn empty_reply_has_no_routes() {
        let parsed: ComputeRoutesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.routes.is_empty());
    }

    #[test]
    fn short_coordinate_is_rejected() {
        let body = r#"{"polyline": {"geoJsonLinestring": {"coordinates": [[23.7]]}}}"#;
        let route: ApiRoute = serde_json::from_str(body).unwrap();
        let err = RouteResult::try_from(route).unwrap_err();
        assert!(matches!(err, PipelineError::RoutingFailed(_)));
    }
}
