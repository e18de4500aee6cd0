use crate::services::PipelineError;

const PLACEMARK_CLOSE: &str = "</Placemark>";

/// Insert `fragment` right after the last `</Placemark>` of `original`.
///
/// The insertion is textual: the generated document is never re-serialized,
/// so styles, comments and attribute order survive byte for byte. Calling it
/// twice inserts the fragment twice.
pub fn merge_route(original: &str, fragment: &str) -> Result<String, PipelineError> {
    let insert_at = original
        .rfind(PLACEMARK_CLOSE)
        .ok_or(PipelineError::NoInsertionPoint)?
        + PLACEMARK_CLOSE.len();

    let mut merged = String::with_capacity(original.len() + fragment.len());
    merged.push_str(&original[..insert_at]);
    merged.push_str(fragment);
    merged.push_str(&original[insert_at..]);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kml::{extract_placemarks, render_route_placemark, TEMPLATE_KML};
    use crate::models::{PathCoordinate, RouteResult};

    const FRAGMENT: &str = "\n    <Placemark><name>Route</name></Placemark>";

    fn end_of_last_placemark(text: &str) -> usize {
        text.rfind(PLACEMARK_CLOSE).unwrap() + PLACEMARK_CLOSE.len()
    }

    #[test]
    fn grows_by_exactly_one_fragment_per_call() {
        let once = merge_route(TEMPLATE_KML, FRAGMENT).unwrap();
        let twice = merge_route(&once, FRAGMENT).unwrap();

        assert_eq!(once.len(), TEMPLATE_KML.len() + FRAGMENT.len());
        assert_eq!(twice.len(), TEMPLATE_KML.len() + 2 * FRAGMENT.len());
        assert_eq!(twice.matches("<name>Route</name>").count(), 2);
    }

    #[test]
    fn text_outside_the_insertion_point_is_untouched() {
        let split = end_of_last_placemark(TEMPLATE_KML);
        let merged = merge_route(TEMPLATE_KML, FRAGMENT).unwrap();

        assert!(merged.starts_with(&TEMPLATE_KML[..split]));
        assert!(merged.ends_with(&TEMPLATE_KML[split..]));
        assert!(merged.ends_with("</Document>\n</kml>"));
        assert_eq!(&merged[split..split + FRAGMENT.len()], FRAGMENT);
    }

    #[test]
    fn document_without_placemarks_has_no_insertion_point() {
        let original = "<kml><Document></Document></kml>";
        let err = merge_route(original, FRAGMENT).unwrap_err();
        assert!(matches!(err, PipelineError::NoInsertionPoint));
    }

    #[test]
    fn route_lands_after_last_point_and_before_document_close() {
        let route = RouteResult {
            path: vec![
                PathCoordinate { x: 23.7, y: 37.9 },
                PathCoordinate { x: 23.8, y: 38.0 },
            ],
            ..Default::default()
        };
        let fragment = render_route_placemark(&route);
        let merged = merge_route(TEMPLATE_KML, &fragment).unwrap();

        assert_eq!(merged.matches("<Placemark>").count(), 4);

        let route_at = merged.find("Walking Route Segment").unwrap();
        let last_point_at = merged.find("National Archaeological Museum").unwrap();
        let document_close_at = merged.find("</Document>").unwrap();
        assert!(last_point_at < route_at);
        assert!(route_at < document_close_at);

        // The route is a LineString, so the point list is unchanged.
        let reparsed = extract_placemarks(&merged).unwrap();
        assert_eq!(reparsed.placemarks.len(), 3);
    }
}
