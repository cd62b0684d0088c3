use serde::{Deserialize, Serialize};

use crate::layer::{Layer, LayerId};
use crate::symbology::LayerStyle;

/// Overlay layer drawing a GeoJSON source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoJsonLayerConfig {
    pub id: LayerId,
    pub source: String,
    #[serde(flatten)]
    pub style: LayerStyle,
    pub pickable: bool,
    /// Draw interleaved with the base map's own layers.
    pub interleaved: bool,
}

impl GeoJsonLayerConfig {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: LayerId::new(id),
            source: source.into(),
            style: LayerStyle::default(),
            pickable: true,
            interleaved: true,
        }
    }

    pub fn with_style(mut self, style: LayerStyle) -> Self {
        self.style = style;
        self
    }
}

impl Layer for GeoJsonLayerConfig {
    fn id(&self) -> &LayerId {
        &self.id
    }

    fn source(&self) -> &str {
        &self.source
    }
}
