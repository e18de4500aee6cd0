//! HTTP handlers for the tour service.

pub mod health;
pub mod tours;

pub use health::{health_check, metrics, readiness_check};
pub use tours::{generate_kml, upload_kml};
