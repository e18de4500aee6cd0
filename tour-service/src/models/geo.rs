//! Geographic primitives.

use serde::{Deserialize, Serialize};

/// A WGS84 position. Fields are named so that longitude/latitude ordering
/// differences between KML and the routing API can never be swapped silently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Arithmetic mean of latitudes and of longitudes.
    ///
    /// Returns `None` for an empty slice.
    pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
        if points.is_empty() {
            return None;
        }

        let count = points.len() as f64;
        let (lat_sum, lng_sum) = points.iter().fold((0.0, 0.0), |(lat, lng), p| {
            (lat + p.latitude, lng + p.longitude)
        });

        Some(GeoPoint::new(lat_sum / count, lng_sum / count))
    }
}
