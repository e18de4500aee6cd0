use crate::models::RouteResult;

const COORDINATE_INDENT: &str = "\n          ";

/// Render the walking route as a KML `<Placemark>` with a `<LineString>`.
///
/// The fragment starts with a line break so it can be spliced directly after
/// an existing `</Placemark>`. An empty path renders an empty coordinate list.
pub fn render_route_placemark(route: &RouteResult) -> String {
    let coordinates = route
        .path
        .iter()
        .map(|c| format!("{},{},0", format_axis(c.x), format_axis(c.y)))
        .collect::<Vec<_>>()
        .join(COORDINATE_INDENT);

    format!(
        r#"
    <Placemark>
      <name>Walking Route Segment</name>
      <description>Generated walking route.</description>
      <styleUrl>#route</styleUrl>
      <LineString>
        <tessellate>1</tessellate>
        <coordinates>
          {coordinates}
        </coordinates>
      </LineString>
    </Placemark>"#
    )
}

/// Whole numbers keep one decimal so `38.0` is not rendered as `38`.
fn format_axis(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
