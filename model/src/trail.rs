use serde::Serialize;

use crate::seam;
use crate::Position;

/// The path drawn behind a competitor, built up one point per tick. Whenever consecutive points
/// straddle the antimeridian, the path is split into a new segment instead of drawing a line
/// across the whole map. Both open ends meet the seam at the same latitude.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrailBuilder {
    // Never empty once the first point arrives; the last one is the segment being extended.
    // Within one segment, consecutive longitudes differ by at most 180.
    segments: Vec<Vec<Position>>,
    last: Option<Position>,
}

impl TrailBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points must be added in the order they happened.
    pub fn add_point(&mut self, pos: Position) {
        match self.last {
            Some(last) => {
                // This checks the last drawn point, not the underlying trace samples
                if (last.lon - pos.lon).abs() > 180.0 {
                    let y = seam::crossing_latitude(last.lon, last.lat, pos.lon, pos.lat);
                    debug!("Trail crosses the antimeridian at latitude {}", y);
                    if !seam::on_seam(last.lon) {
                        self.current().push(Position::new(seam::seam_longitude(last.lon), y));
                    }
                    self.segments.push(Vec::new());
                    if !seam::on_seam(pos.lon) {
                        self.current().push(Position::new(seam::seam_longitude(pos.lon), y));
                    }
                }
            }
            None => {
                self.segments.push(Vec::new());
            }
        }

        self.last = Some(pos);
        self.current().push(pos);
    }

    /// Every segment should be drawn independently.
    pub fn segments(&self) -> &[Vec<Position>] {
        &self.segments
    }

    pub fn last_point(&self) -> Option<Position> {
        self.last
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn num_points(&self) -> usize {
        self.segments.iter().map(|seg| seg.len()).sum()
    }

    pub fn reset(&mut self) {
        self.segments.clear();
        self.last = None;
    }

    /// As a GeoJSON MultiLineString
    pub fn geometry(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::MultiLineString(
            self.segments
                .iter()
                .map(|seg| seg.iter().map(|pos| pos.to_geojson()).collect())
                .collect(),
        ))
    }

    fn current(&mut self) -> &mut Vec<Position> {
        if self.segments.is_empty() {
            self.segments.push(Vec::new());
        }
        self.segments.last_mut().unwrap()
    }
}
