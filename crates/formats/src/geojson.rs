//! GeoJSON FeatureCollections with their coordinates reprojected in place.
//!
//! The document is kept as raw JSON so that properties, ids and foreign
//! members survive untouched; only `geometry.coordinates` arrays are rewritten.

use foundation::Aabb2;
use projection::{CoordinateTree, ProjectionError, Reprojector};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,

    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    #[error("invalid geometry in feature {index}: {source}")]
    InvalidGeometry {
        index: usize,
        #[source]
        source: ProjectionError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonDocument {
    root: Map<String, Value>,
}

impl GeoJsonDocument {
    pub fn from_geojson_str(payload: &str) -> Result<Self, FormatError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(value)
    }

    /// Accepts an object carrying a `features` array. A `type` member, when
    /// present, must be `FeatureCollection`.
    pub fn from_value(value: Value) -> Result<Self, FormatError> {
        let Value::Object(root) = value else {
            return Err(FormatError::NotAFeatureCollection);
        };
        if let Some(ty) = root.get("type")
            && ty.as_str() != Some("FeatureCollection")
        {
            return Err(FormatError::NotAFeatureCollection);
        }
        if !root.get("features").is_some_and(Value::is_array) {
            return Err(FormatError::NotAFeatureCollection);
        }
        Ok(Self { root })
    }

    pub fn features(&self) -> &[Value] {
        self.root
            .get("features")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn feature_count(&self) -> usize {
        self.features().len()
    }

    /// Reproject every feature's coordinates.
    ///
    /// Work happens on a copy of the feature list, so on error the document
    /// is left exactly as it was. A top-level `crs` member is rewritten to
    /// name the target system when it is an `EPSG:<code>` identifier and is
    /// dropped otherwise.
    pub fn reproject_in_place(&mut self, reprojector: &Reprojector) -> Result<(), FormatError> {
        let mut features = self.features().to_vec();
        for (index, feature) in features.iter_mut().enumerate() {
            reproject_feature(index, feature, reprojector)?;
        }
        debug!(
            from = reprojector.from_id(),
            to = reprojector.to_id(),
            features = features.len(),
            "reprojected feature collection"
        );
        self.root
            .insert("features".to_string(), Value::Array(features));
        match named_crs(reprojector.to_id()) {
            Some(crs) => {
                self.root.insert("crs".to_string(), crs);
            }
            None => {
                self.root.remove("crs");
            }
        }
        Ok(())
    }

    /// Reprojected copy of this document.
    pub fn reprojected(&self, reprojector: &Reprojector) -> Result<Self, FormatError> {
        let mut out = self.clone();
        out.reproject_in_place(reprojector)?;
        Ok(out)
    }

    /// Coordinate trees of all features in document order (collections
    /// flattened), skipping null geometries.
    pub fn coordinate_trees(&self) -> Result<Vec<CoordinateTree>, FormatError> {
        let mut out = Vec::new();
        for (index, feature) in self.features().iter().enumerate() {
            let geometry = feature_geometry(index, feature)?;
            collect_trees(index, geometry, &mut out)?;
        }
        Ok(out)
    }

    /// Bounding box over every coordinate, `None` for an empty collection.
    pub fn bounds(&self) -> Result<Option<Aabb2>, FormatError> {
        let mut bounds: Option<Aabb2> = None;
        for tree in self.coordinate_trees()? {
            tree.for_each_leaf(&mut |c| {
                let p = [c.x, c.y];
                bounds = Some(match bounds {
                    Some(mut b) => {
                        b.expand(p);
                        b
                    }
                    None => Aabb2::from_point(p),
                });
            });
        }
        Ok(bounds)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    pub fn to_geojson_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.root)
    }

    pub fn to_geojson_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.root)
    }
}

/// Legacy GeoJSON `crs` member for an `EPSG:<code>` identifier.
fn named_crs(id: &str) -> Option<Value> {
    let (authority, code) = id.trim().split_once(':')?;
    if !authority.eq_ignore_ascii_case("EPSG") || !code.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(json!({
        "type": "name",
        "properties": { "name": format!("urn:ogc:def:crs:EPSG::{code}") }
    }))
}

fn is_collection(geometry: &Map<String, Value>) -> bool {
    geometry.get("type").and_then(Value::as_str) == Some("GeometryCollection")
}

fn missing_members(index: usize) -> FormatError {
    FormatError::InvalidFeature {
        index,
        reason: "GeometryCollection missing geometries".to_string(),
    }
}

fn feature_geometry(index: usize, feature: &Value) -> Result<&Value, FormatError> {
    let obj = feature.as_object().ok_or(FormatError::InvalidFeature {
        index,
        reason: "feature must be an object".to_string(),
    })?;
    obj.get("geometry").ok_or(FormatError::InvalidFeature {
        index,
        reason: "feature missing geometry".to_string(),
    })
}

fn reproject_feature(
    index: usize,
    feature: &mut Value,
    reprojector: &Reprojector,
) -> Result<(), FormatError> {
    feature_geometry(index, feature)?;
    if let Some(geometry) = feature.get_mut("geometry") {
        reproject_geometry(index, geometry, reprojector)?;
    }
    Ok(())
}

fn reproject_geometry(
    index: usize,
    geometry: &mut Value,
    reprojector: &Reprojector,
) -> Result<(), FormatError> {
    let obj = match geometry {
        Value::Null => return Ok(()),
        Value::Object(obj) => obj,
        _ => {
            return Err(FormatError::InvalidFeature {
                index,
                reason: "geometry must be an object or null".to_string(),
            });
        }
    };

    if is_collection(obj) {
        let members = obj
            .get_mut("geometries")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| missing_members(index))?;
        for member in members {
            reproject_geometry(index, member, reprojector)?;
        }
        return Ok(());
    }

    let coords = obj.get_mut("coordinates").ok_or(FormatError::InvalidFeature {
        index,
        reason: "geometry missing coordinates".to_string(),
    })?;
    let tree = CoordinateTree::from_json(coords)
        .map_err(|source| FormatError::InvalidGeometry { index, source })?;
    *coords = reprojector
        .apply(&tree)
        .map_err(|source| FormatError::InvalidGeometry { index, source })?
        .to_json();
    Ok(())
}

fn collect_trees(
    index: usize,
    geometry: &Value,
    out: &mut Vec<CoordinateTree>,
) -> Result<(), FormatError> {
    let obj = match geometry {
        Value::Null => return Ok(()),
        Value::Object(obj) => obj,
        _ => {
            return Err(FormatError::InvalidFeature {
                index,
                reason: "geometry must be an object or null".to_string(),
            });
        }
    };

    if is_collection(obj) {
        let members = obj
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| missing_members(index))?;
        for member in members {
            collect_trees(index, member, out)?;
        }
        return Ok(());
    }

    let coords = obj.get("coordinates").ok_or(FormatError::InvalidFeature {
        index,
        reason: "geometry missing coordinates".to_string(),
    })?;
    let tree = CoordinateTree::from_json(coords)
        .map_err(|source| FormatError::InvalidGeometry { index, source })?;
    out.push(tree);
    Ok(())
}
