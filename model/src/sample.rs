use serde::{Deserialize, Serialize};

/// One recorded observation of a competitor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since the epoch
    #[serde(alias = "timestamp")]
    pub ts: i64,
    #[serde(alias = "longitude")]
    pub lon: f64,
    #[serde(alias = "latitude")]
    pub lat: f64,
}

impl Sample {
    pub fn new(ts: i64, lon: f64, lat: f64) -> Self {
        Self { ts, lon, lat }
    }

    pub fn pos(&self) -> Position {
        Position::new(self.lon, self.lat)
    }
}

/// A WGS84 point, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// In GeoJSON's `[x, y]` order
    pub fn to_geojson(self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }
}
