//! Placemark extraction from generated KML.

use super::document::locate_document;
use crate::models::{GeoPoint, Placemark, PlacemarkDocument};
use crate::services::PipelineError;
use quick_xml::events::Event;
use quick_xml::Reader;

const DOCUMENT_PATH: &[&str] = &["kml", "Document"];
const DOCUMENT_NAME_PATH: &[&str] = &["kml", "Document", "name"];
const DOCUMENT_DESCRIPTION_PATH: &[&str] = &["kml", "Document", "description"];
const PLACEMARK_NAME_PATH: &[&str] = &["kml", "Document", "Placemark", "name"];
const POINT_COORDINATES_PATH: &[&str] = &["kml", "Document", "Placemark", "Point", "coordinates"];

/// Minimum number of point placemarks needed to request a route.
pub const MIN_PLACEMARKS: usize = 2;

#[derive(Default)]
struct PendingPlacemark {
    name: String,
    coordinates: Option<String>,
}

impl PendingPlacemark {
    /// Placemarks without a `<Point>` (paths, polygons) are skipped.
    fn finish(self) -> Result<Option<Placemark>, PipelineError> {
        let Some(coordinates) = self.coordinates else {
            return Ok(None);
        };
        let point = parse_coordinates(&coordinates).map_err(|reason| {
            PipelineError::ParseFailure(format!(
                "placemark '{}' has invalid coordinates '{}': {}",
                self.name,
                coordinates.trim(),
                reason
            ))
        })?;
        Ok(Some(Placemark {
            name: self.name,
            point,
        }))
    }
}

/// Parse generated KML into its ordered point placemarks.
///
/// Only `Placemark` elements directly under `kml/Document` that carry a
/// `Point/coordinates` value are collected. The document must contain at
/// least [`MIN_PLACEMARKS`] of them.
pub fn extract_placemarks(raw: &str) -> Result<PlacemarkDocument, PipelineError> {
    let source = locate_document(raw).unwrap_or_else(|| raw.trim());

    let mut reader = Reader::from_str(source);
    reader.trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut document = PlacemarkDocument::default();
    let mut saw_document = false;
    let mut pending: Option<PendingPlacemark> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if at(&path, &DOCUMENT_PATH[..1]) && name == "Document" {
                    saw_document = true;
                }
                if at(&path, DOCUMENT_PATH) && name == "Placemark" {
                    pending = Some(PendingPlacemark::default());
                }
                path.push(name);
            }
            Ok(Event::End(_)) => {
                let closed = path.pop();
                if closed.as_deref() == Some("Placemark") && at(&path, DOCUMENT_PATH) {
                    if let Some(placemark) = pending.take() {
                        if let Some(placemark) = placemark.finish()? {
                            document.placemarks.push(placemark);
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                // Models emit bare ampersands in names; keep the raw text then.
                let text = t
                    .unescape()
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                record_text(&path, &text, &mut document, pending.as_mut());
            }
            Ok(Event::CData(c)) => {
                let raw = c.into_inner();
                let text = String::from_utf8_lossy(&raw);
                record_text(&path, text.trim(), &mut document, pending.as_mut());
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PipelineError::ParseFailure(format!(
                    "invalid XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if !path.is_empty() {
        return Err(PipelineError::ParseFailure(format!(
            "document ended inside <{}>",
            path.join("/")
        )));
    }

    if !saw_document {
        return Err(PipelineError::ParseFailure(
            "missing <kml><Document> structure".to_string(),
        ));
    }

    if document.placemarks.len() < MIN_PLACEMARKS {
        return Err(PipelineError::InsufficientPlacemarks {
            found: document.placemarks.len(),
        });
    }

    Ok(document)
}

fn record_text(
    path: &[String],
    text: &str,
    document: &mut PlacemarkDocument,
    pending: Option<&mut PendingPlacemark>,
) {
    if at(path, DOCUMENT_NAME_PATH) {
        document.name = Some(text.to_string());
    } else if at(path, DOCUMENT_DESCRIPTION_PATH) {
        document.description = Some(text.to_string());
    } else if let Some(pending) = pending {
        if at(path, PLACEMARK_NAME_PATH) {
            pending.name.push_str(text);
        } else if at(path, POINT_COORDINATES_PATH) {
            pending
                .coordinates
                .get_or_insert_with(String::new)
                .push_str(text);
        }
    }
}

fn at(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a == b)
}

/// Parse KML `lon,lat[,alt]` into a point.
fn parse_coordinates(text: &str) -> Result<GeoPoint, String> {
    let mut fields = text.trim().split(',').map(str::trim);

    let longitude = parse_axis(fields.next(), "longitude")?;
    let latitude = parse_axis(fields.next(), "latitude")?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude {} out of range", latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("longitude {} out of range", longitude));
    }

    Ok(GeoPoint::new(latitude, longitude))
}

fn parse_axis(field: Option<&str>, axis: &str) -> Result<f64, String> {
    let field = field.filter(|f| !f.is_empty()).ok_or_else(|| format!("missing {}", axis))?;
    field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{} '{}' is not a number", axis, field))
}
