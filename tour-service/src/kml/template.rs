/// Example document embedded in the system prompt. The model reuses its
/// styles and emits placemarks in the same shape.
pub const TEMPLATE_KML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Walking Tour of Athens</name>
    <description>Explore Athens through a walking route featuring key landmarks.</description>

    <!-- Styles -->
    <Style id="poi-normal">
      <IconStyle>
        <Icon>
          <href>http://maps.google.com/mapfiles/kml/paddle/blu-circle.png</href>
        </Icon>
      </IconStyle>
    </Style>
    <Style id="poi-highlight">
      <IconStyle>
        <scale>1.2</scale>
        <Icon>
          <href>http://maps.google.com/mapfiles/kml/paddle/ylw-circle.png</href>
        </Icon>
      </IconStyle>
    </Style>
    <StyleMap id="poi-style">
      <Pair>
        <key>normal</key>
        <styleUrl>#poi-normal</styleUrl>
      </Pair>
      <Pair>
        <key>highlight</key>
        <styleUrl>#poi-highlight</styleUrl>
      </Pair>
    </StyleMap>
    <Style id="route">
      <LineStyle>
        <color>ff0000ff</color>
        <width>3</width>
      </LineStyle>
    </Style>

    <!-- Points of Interest -->
    <Placemark>
      <name>Acropolis</name>
      <description>The ancient citadel with iconic landmarks.</description>
      <styleUrl>#poi-style</styleUrl>
      <Point>
        <coordinates>23.726058,37.971532,0</coordinates>
      </Point>
    </Placemark>
    <Placemark>
      <name>Syntagma Square</name>
      <description>The central square of Athens, near the Parliament.</description>
      <styleUrl>#poi-style</styleUrl>
      <Point>
        <coordinates>23.734721,37.975492,0</coordinates>
      </Point>
    </Placemark>
    <Placemark>
      <name>National Archaeological Museum</name>
      <description>One of the most important museums of ancient Greek art.</description>
      <styleUrl>#poi-style</styleUrl>
      <Point>
        <coordinates>23.733846,37.990528,0</coordinates>
      </Point>
    </Placemark>
  </Document>
</kml>"##;
