use super::GeoPoint;

/// A named point of interest read from a `<Placemark>` with a `<Point>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    pub name: String,
    pub point: GeoPoint,
}

/// The parts of a generated KML document the pipeline understands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacemarkDocument {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Point placemarks in document order.
    pub placemarks: Vec<Placemark>,
}

impl PlacemarkDocument {
    pub fn points(&self) -> Vec<GeoPoint> {
        self.placemarks.iter().map(|p| p.point).collect()
    }

    pub fn centroid(&self) -> Option<GeoPoint> {
        GeoPoint::centroid(&self.points())
    }
}
