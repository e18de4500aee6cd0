//! Request and result types for the Google Routes `computeRoutes` call.

use super::GeoPoint;
use crate::services::PipelineError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Walk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolylineEncoding {
    GeoJsonLinestring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Units {
    Imperial,
    Metric,
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IMPERIAL" => Ok(Units::Imperial),
            "METRIC" => Ok(Units::Metric),
            _ => Err(format!("Invalid route units: {}", s)),
        }
    }
}

/// Per-deployment routing preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOptions {
    pub language_code: String,
    pub units: Units,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            language_code: "en-US".to_string(),
            units: Units::Imperial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub lat_lng: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub location: Location,
}

impl From<GeoPoint> for Waypoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            location: Location { lat_lng: point },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteModifiers {
    pub avoid_tolls: bool,
    pub avoid_highways: bool,
    pub avoid_ferries: bool,
}

/// Body of a `computeRoutes` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,
    pub intermediates: Vec<Waypoint>,
    pub travel_mode: TravelMode,
    pub polyline_encoding: PolylineEncoding,
    pub compute_alternative_routes: bool,
    pub route_modifiers: RouteModifiers,
    pub language_code: String,
    pub units: Units,
}

impl RouteRequest {
    /// Build a walking route through `points` in order.
    ///
    /// The first point is the origin, the last the destination and every
    /// point in between becomes an intermediate waypoint.
    pub fn walking(points: &[GeoPoint], options: &RouteOptions) -> Result<Self, PipelineError> {
        let (origin, rest) = points
            .split_first()
            .ok_or(PipelineError::InsufficientPlacemarks { found: 0 })?;
        let (destination, middle) = rest
            .split_last()
            .ok_or(PipelineError::InsufficientPlacemarks { found: 1 })?;

        Ok(Self {
            origin: (*origin).into(),
            destination: (*destination).into(),
            intermediates: middle.iter().copied().map(Waypoint::from).collect(),
            travel_mode: TravelMode::Walk,
            polyline_encoding: PolylineEncoding::GeoJsonLinestring,
            compute_alternative_routes: false,
            route_modifiers: RouteModifiers::default(),
            language_code: options.language_code.clone(),
            units: options.units,
        })
    }

    pub fn origin_point(&self) -> GeoPoint {
        self.origin.location.lat_lng
    }

    pub fn destination_point(&self) -> GeoPoint {
        self.destination.location.lat_lng
    }

    pub fn waypoints(&self) -> Vec<GeoPoint> {
        self.intermediates
            .iter()
            .map(|w| w.location.lat_lng)
            .collect()
    }
}

/// One vertex of a GeoJSON line string: `x` is longitude, `y` latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathCoordinate {
    pub x: f64,
    pub y: f64,
}

/// First candidate route returned by the routing API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteResult {
    pub path: Vec<PathCoordinate>,
    pub distance_meters: Option<u64>,
    /// Duration as reported by the API, e.g. `"1873s"`.
    pub duration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint::new(37.9 + i as f64 * 0.01, 23.7 + i as f64 * 0.01))
            .collect()
    }

    #[test]
    fn two_points_give_no_waypoints() {
        let pts = points(2);
        let request = RouteRequest::walking(&pts, &RouteOptions::default()).unwrap();

        assert!(request.intermediates.is_empty());
        assert_eq!(request.origin_point(), pts[0]);
        assert_eq!(request.destination_point(), pts[1]);
        assert_ne!(request.origin_point(), request.destination_point());
    }

    #[test]
    fn middle_points_become_ordered_waypoints() {
        let pts = points(6);
        let request = RouteRequest::walking(&pts, &RouteOptions::default()).unwrap();

        assert_eq!(request.waypoints().len(), 4);
        assert_eq!(request.waypoints(), pts[1..5].to_vec());
    }

    #[test]
    fn fewer_than_two_points_is_rejected() {
        let err = RouteRequest::walking(&points(1), &RouteOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InsufficientPlacemarks { found: 1 }
        ));
    }

    #[test]
    fn serializes_in_routes_api_shape() {
        let request = RouteRequest::walking(&points(3), &RouteOptions::default()).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["travelMode"], "WALK");
        assert_eq!(json["polylineEncoding"], "GEO_JSON_LINESTRING");
        assert_eq!(json["units"], "IMPERIAL");
        assert_eq!(json["languageCode"], "en-US");
        assert_eq!(json["computeAlternativeRoutes"], false);
        assert_eq!(json["routeModifiers"]["avoidFerries"], false);
        assert_eq!(json["origin"]["location"]["latLng"]["latitude"], 37.9);
        assert_eq!(json["origin"]["location"]["latLng"]["longitude"], 23.7);
        assert_eq!(json["intermediates"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn units_parse_from_config_strings() {
        assert_eq!("metric".parse::<Units>(), Ok(Units::Metric));
        assert!("nautical".parse::<Units>().is_err());
    }
}
