use foundation::Aabb2;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STYLE_URL: &str = "https://tile.openstreetmap.jp/styles/osm-bright/style.json";

/// Initial camera of the tile map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapViewConfig {
    pub style_url: String,
    /// `[lon, lat]` in WGS84 degrees.
    pub center: [f64; 2],
    pub zoom: f64,
    pub pitch: f64,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            style_url: DEFAULT_STYLE_URL.to_string(),
            center: [136.2236, 36.0641],
            zoom: 10.0,
            pitch: 30.0,
        }
    }
}

impl MapViewConfig {
    pub fn with_style_url(mut self, url: impl Into<String>) -> Self {
        self.style_url = url.into();
        self
    }

    /// Re-center on the middle of `bounds`, keeping zoom and pitch.
    pub fn centered_on(mut self, bounds: &Aabb2) -> Self {
        self.center = bounds.center();
        self
    }
}
