use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ImportError, TrackError};
use crate::import::TrackImporter;
use crate::track::{summarize_with, ElevationPolicy, TrackSummary, Trackpoint};

/// Parse every `<trkpt>` of a GPX document, in document order.
///
/// Route points and waypoints are ignored. An `<ele>` child that is missing or
/// not a number leaves the point without elevation. Fails when the XML is
/// broken, a coordinate is missing or unparseable, or fewer than two
/// trackpoints are present.
pub fn parse_gpx(xml: &str) -> Result<Vec<Trackpoint>, TrackError> {
    let mut reader = Reader::from_str(xml);
    let mut points = Vec::new();
    let mut current: Option<Trackpoint> = None;
    // Open elements; `read_text` consumes an `<ele>` through its end tag
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => {
                    depth += 1;
                    current = Some(parse_coordinates(&e, points.len())?);
                }
                b"ele" if current.is_some() => {
                    let text = reader
                        .read_text(e.name())
                        .map_err(|err| xml_error(&reader, err))?;
                    let elevation = text.trim().parse::<f64>().ok();
                    if elevation.is_none() {
                        warn!(index = points.len(), value = %text, "Ignoring non-numeric elevation");
                    }
                    if let Some(point) = current.as_mut() {
                        point.elevation = elevation;
                    }
                }
                _ => depth += 1,
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"trkpt" {
                    points.push(parse_coordinates(&e, points.len())?);
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                if e.local_name().as_ref() == b"trkpt" {
                    if let Some(point) = current.take() {
                        points.push(point);
                    }
                }
            }
            Ok(Event::Eof) => {
                if depth > 0 || current.is_some() {
                    return Err(TrackError::malformed(format!(
                        "unexpected end of document with {} unclosed element(s)",
                        depth
                    )));
                }
                break;
            }
            Err(err) => return Err(xml_error(&reader, err)),
            _ => {}
        }
    }

    if points.len() < 2 {
        return Err(TrackError::malformed(format!(
            "expected at least 2 <trkpt> elements, found {}",
            points.len()
        )));
    }

    debug!(points = points.len(), "Parsed GPX trackpoints");
    Ok(points)
}

/// Parse a GPX document and summarize its track
pub fn summarize_gpx(xml: &str, policy: ElevationPolicy) -> Result<TrackSummary, TrackError> {
    let points = parse_gpx(xml)?;
    summarize_with(&points, policy)
}

fn xml_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> TrackError {
    TrackError::malformed(format!(
        "invalid XML at byte {}: {}",
        reader.buffer_position(),
        err
    ))
}

fn parse_coordinates(e: &BytesStart<'_>, index: usize) -> Result<Trackpoint, TrackError> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            TrackError::malformed(format!("bad attribute on trkpt #{}: {}", index, err))
        })?;
        let value = std::str::from_utf8(&attr.value).unwrap_or_default();
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(parse_degrees(value, "lat", 90.0, index)?),
            b"lon" => lon = Some(parse_degrees(value, "lon", 180.0, index)?),
            _ => {}
        }
    }

    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Ok(Trackpoint::new(latitude, longitude)),
        (None, _) => Err(TrackError::malformed(format!(
            "trkpt #{} is missing the lat attribute",
            index
        ))),
        (_, None) => Err(TrackError::malformed(format!(
            "trkpt #{} is missing the lon attribute",
            index
        ))),
    }
}

fn parse_degrees(value: &str, name: &str, limit: f64, index: usize) -> Result<f64, TrackError> {
    let degrees = value.trim().parse::<f64>().map_err(|_| {
        TrackError::malformed(format!(
            "trkpt #{} has an unparseable {} value '{}'",
            index, name, value
        ))
    })?;

    if !degrees.is_finite() || degrees.abs() > limit {
        return Err(TrackError::malformed(format!(
            "trkpt #{} has {} {} outside ±{}",
            index, name, degrees, limit
        )));
    }

    Ok(degrees)
}

/// GPX importer for GPS track data
pub struct GpxImporter;

impl GpxImporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GpxImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackImporter for GpxImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("gpx"))
            .unwrap_or(false)
    }

    fn import_file(&self, file_path: &Path) -> Result<Vec<Trackpoint>, ImportError> {
        let xml = std::fs::read_to_string(file_path).map_err(|source| ImportError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;

        parse_gpx(&xml).map_err(|source| ImportError::Track {
            path: PathBuf::from(file_path),
            source,
        })
    }

    fn format_name(&self) -> &'static str {
        "GPX"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="10.0" lon="10.0"><ele>999</ele></wpt>
  <trk>
    <name>Elephant Mountain</name>
    <trkseg>
      <trkpt lat="25.0330" lon="121.5654"><ele>10</ele><time>2024-03-01T06:00:00Z</time></trkpt>
      <trkpt lat="25.0340" lon="121.5660"><ele>15</ele></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="25.0345" lon="121.5665"><ele> 12 </ele></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_parse_keeps_document_order() {
        let points = parse_gpx(SAMPLE).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Trackpoint::with_elevation(25.0330, 121.5654, 10.0));
        assert_eq!(points[1], Trackpoint::with_elevation(25.0340, 121.5660, 15.0));
        assert_eq!(points[2], Trackpoint::with_elevation(25.0345, 121.5665, 12.0));
    }

    #[test]
    fn test_summarize_gpx() {
        let summary = summarize_gpx(SAMPLE, ElevationPolicy::default()).unwrap();
        assert_eq!(summary.point_count, 3);
        assert!((summary.total_elevation_gain_m - 5.0).abs() < 1e-9);
        assert!((summary.total_elevation_loss_m - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_and_non_numeric_elevation() {
        let xml = r#"<gpx><trk><trkseg>
            <trkpt lat="1.0" lon="2.0"/>
            <trkpt lat="1.1" lon="2.1"><ele>n/a</ele></trkpt>
        </trkseg></trk></gpx>"#;

        let points = parse_gpx(xml).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.elevation.is_none()));
    }

    #[test]
    fn test_missing_latitude_is_malformed() {
        let xml = r#"<gpx><trk><trkseg>
            <trkpt lon="2.0"><ele>1</ele></trkpt>
            <trkpt lat="1.1" lon="2.1"/>
        </trkseg></trk></gpx>"#;

        let err = parse_gpx(xml).unwrap_err();
        assert!(matches!(err, TrackError::MalformedInput { ref reason } if reason.contains("lat")));
    }

    #[test]
    fn test_unparseable_or_out_of_range_coordinate() {
        let bad_number = r#"<gpx><trkpt lat="north" lon="2"/><trkpt lat="1" lon="2"/></gpx>"#;
        assert!(matches!(
            parse_gpx(bad_number),
            Err(TrackError::MalformedInput { .. })
        ));

        let out_of_range = r#"<gpx><trkpt lat="91" lon="2"/><trkpt lat="1" lon="2"/></gpx>"#;
        assert!(matches!(
            parse_gpx(out_of_range),
            Err(TrackError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_fewer_than_two_trackpoints() {
        let xml = r#"<gpx><trk><trkseg><trkpt lat="1" lon="2"/></trkseg></trk>
            <rte><rtept lat="1" lon="3"/></rte></gpx>"#;
        let err = parse_gpx(xml).unwrap_err();
        assert!(matches!(err, TrackError::MalformedInput { ref reason } if reason.contains("found 1")));

        assert!(parse_gpx("not xml at all").is_err());
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let truncated = r#"<gpx><trk><trkseg><trkpt lat="0" lon="0"></trkpt><trkpt lat="0" lon="1"></trkpt><trkpt lat="0" lon="2">"#;
        let err = parse_gpx(truncated).unwrap_err();
        assert!(matches!(err, TrackError::MalformedInput { ref reason } if reason.contains("unexpected end")));

        // Cut after the last trackpoint closed, with the track still open
        let unclosed = r#"<gpx><trk><trkseg><trkpt lat="0" lon="0"/><trkpt lat="0" lon="1"/>"#;
        assert!(matches!(
            parse_gpx(unclosed),
            Err(TrackError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_waypoint_elevation_does_not_unbalance_depth() {
        let points = parse_gpx(SAMPLE).unwrap();
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_importer_extension_check() {
        let importer = GpxImporter::new();
        assert!(importer.can_import(Path::new("morning.gpx")));
        assert!(importer.can_import(Path::new("MORNING.GPX")));
        assert!(!importer.can_import(Path::new("morning.fit")));
        assert!(!importer.can_import(Path::new("gpx")));
    }
}
