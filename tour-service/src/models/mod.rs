//! Domain models for the tour service.

pub mod artifact;
pub mod geo;
pub mod placemark;
pub mod route;

pub use artifact::StoredArtifact;
pub use geo::GeoPoint;
pub use placemark::{Placemark, PlacemarkDocument};
pub use route::{PathCoordinate, RouteOptions, RouteRequest, RouteResult, TravelMode, Units};
