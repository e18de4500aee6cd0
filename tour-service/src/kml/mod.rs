//! KML handling: reading generated placemarks, rendering the walking route
//! and splicing it back into the generated text.
//!
//! Everything here is pure string/tree work with no I/O.

pub mod document;
pub mod extract;
pub mod merge;
pub mod render;
pub mod template;

pub use document::extract_document;
pub use extract::extract_placemarks;
pub use merge::merge_route;
pub use render::render_route_placemark;
pub use template::TEMPLATE_KML;
