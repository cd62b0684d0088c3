use std::collections::BTreeSet;

use formats::GeoJsonDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::layer::Layer;
use crate::vector::GeoJsonLayerConfig;
use crate::view::MapViewConfig;

pub const DEFAULT_SOURCE_ID: &str = "test";
pub const DEFAULT_LAYER_ID: &str = "test-layer";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("duplicate source id `{0}`")]
    DuplicateSource(String),
    #[error("duplicate layer id `{0}`")]
    DuplicateLayer(String),
    #[error("layer `{layer}` references missing source `{source_id}`")]
    MissingSource { layer: String, source_id: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "geojson")]
    GeoJson,
}

/// A GeoJSON document registered with the map under `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonSource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub data: Value,
}

impl GeoJsonSource {
    pub fn new(id: impl Into<String>, document: &GeoJsonDocument) -> Self {
        Self {
            id: id.into(),
            kind: SourceKind::GeoJson,
            data: document.to_value(),
        }
    }
}

/// Everything the renderer needs: camera, sources and overlay layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBundle {
    pub view: MapViewConfig,
    pub sources: Vec<GeoJsonSource>,
    pub layers: Vec<GeoJsonLayerConfig>,
}

impl MapBundle {
    pub fn new(view: MapViewConfig) -> Self {
        Self {
            view,
            sources: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// One source holding `document` and one filled overlay layer drawing it.
    pub fn for_document(view: MapViewConfig, document: &GeoJsonDocument) -> Self {
        Self::new(view)
            .with_source(GeoJsonSource::new(DEFAULT_SOURCE_ID, document))
            .with_layer(GeoJsonLayerConfig::new(DEFAULT_LAYER_ID, DEFAULT_SOURCE_ID))
    }

    pub fn with_source(mut self, source: GeoJsonSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_layer(mut self, layer: GeoJsonLayerConfig) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn validate(&self) -> Result<(), LayerError> {
        let mut source_ids = BTreeSet::new();
        for source in &self.sources {
            if !source_ids.insert(source.id.as_str()) {
                return Err(LayerError::DuplicateSource(source.id.clone()));
            }
        }

        let mut layer_ids = BTreeSet::new();
        for layer in &self.layers {
            if !layer_ids.insert(layer.id()) {
                return Err(LayerError::DuplicateLayer(layer.id().to_string()));
            }
            if !source_ids.contains(layer.source()) {
                return Err(LayerError::MissingSource {
                    layer: layer.id().to_string(),
                    source_id: layer.source().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_LAYER_ID, GeoJsonSource, LayerError, MapBundle};
    use crate::vector::GeoJsonLayerConfig;
    use crate::view::MapViewConfig;
    use formats::GeoJsonDocument;
    use pretty_assertions::assert_eq;
    use projection::{EPSG_4326, EPSG_6668, Reprojector};
    use serde_json::json;

    fn sample() -> GeoJsonDocument {
        GeoJsonDocument::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [136.0, 36.0] } }
            ]
        }))
        .expect("parse")
    }

    #[test]
    fn default_bundle_serializes_for_the_renderer() {
        let bundle = MapBundle::for_document(MapViewConfig::default(), &sample());
        bundle.validate().expect("valid");

        let value = serde_json::to_value(&bundle).expect("serialize");
        assert_eq!(
            value["view"],
            json!({
                "styleUrl": "https://tile.openstreetmap.jp/styles/osm-bright/style.json",
                "center": [136.2236, 36.0641],
                "zoom": 10.0,
                "pitch": 30.0
            })
        );
        assert_eq!(
            value["layers"][0],
            json!({
                "id": "test-layer",
                "source": "test",
                "visible": true,
                "filled": true,
                "fillColor": [30, 100, 220, 150],
                "pickable": true,
                "interleaved": true
            })
        );
        assert_eq!(value["sources"][0]["type"], json!("geojson"));
        assert_eq!(value["sources"][0]["data"]["features"][0]["geometry"]["type"], json!("Point"));
    }

    #[test]
    fn carries_reprojected_data() {
        let mut doc = sample();
        let reprojector = Reprojector::from_global(EPSG_6668, EPSG_4326).expect("resolve");
        doc.reproject_in_place(&reprojector).expect("reproject");

        let bounds = doc.bounds().expect("bounds").expect("non-empty");
        let view = MapViewConfig::default().centered_on(&bounds);
        let bundle = MapBundle::for_document(view, &doc);
        let center = bundle.view.center;
        assert!((center[0] - 136.0).abs() < 1e-6 && (center[1] - 36.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_dangling_and_duplicate_ids() {
        let doc = sample();
        let dangling = MapBundle::new(MapViewConfig::default())
            .with_layer(GeoJsonLayerConfig::new("roads", "missing"));
        assert_eq!(
            dangling.validate(),
            Err(LayerError::MissingSource {
                layer: "roads".to_string(),
                source_id: "missing".to_string(),
            })
        );

        let dup_layer = MapBundle::for_document(MapViewConfig::default(), &doc)
            .with_layer(GeoJsonLayerConfig::new(DEFAULT_LAYER_ID, "test"));
        assert_eq!(
            dup_layer.validate(),
            Err(LayerError::DuplicateLayer(DEFAULT_LAYER_ID.to_string()))
        );

        let dup_source = MapBundle::for_document(MapViewConfig::default(), &doc)
            .with_source(GeoJsonSource::new("test", &doc));
        assert_eq!(
            dup_source.validate(),
            Err(LayerError::DuplicateSource("test".to_string()))
        );
    }
}
