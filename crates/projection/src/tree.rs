use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

use crate::error::ProjectionError;

/// A position `(x, y)` in some spatial reference system.
///
/// For geographic systems `x` is longitude and `y` latitude, both in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.x, c.y]
    }
}

/// Nested coordinate arrays as found in GeoJSON geometries.
///
/// A `Point` is a single leaf, a `LineString` a branch of leaves, a `Polygon`
/// a branch of rings and so on. Transformations keep the nesting intact and
/// only touch leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateTree {
    Leaf(Coordinate),
    Branch(Vec<CoordinateTree>),
}

/// Nesting structure of a [`CoordinateTree`] with the values erased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf,
    Branch(Vec<Shape>),
}

impl CoordinateTree {
    pub fn leaf(x: f64, y: f64) -> Self {
        CoordinateTree::Leaf(Coordinate::new(x, y))
    }

    /// A branch of leaves, e.g. a `LineString` or a polygon ring.
    pub fn line<I: IntoIterator<Item = [f64; 2]>>(points: I) -> Self {
        CoordinateTree::Branch(
            points
                .into_iter()
                .map(|p| CoordinateTree::Leaf(p.into()))
                .collect(),
        )
    }

    pub fn shape(&self) -> Shape {
        match self {
            CoordinateTree::Leaf(_) => Shape::Leaf,
            CoordinateTree::Branch(children) => {
                Shape::Branch(children.iter().map(CoordinateTree::shape).collect())
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            CoordinateTree::Leaf(_) => 1,
            CoordinateTree::Branch(children) => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Visit every leaf in document order.
    pub fn for_each_leaf<F: FnMut(&Coordinate)>(&self, f: &mut F) {
        match self {
            CoordinateTree::Leaf(c) => f(c),
            CoordinateTree::Branch(children) => {
                for child in children {
                    child.for_each_leaf(f);
                }
            }
        }
    }

    /// Build a new tree of the same shape with every leaf mapped through `f`.
    /// Stops at the first leaf `f` rejects.
    pub fn try_map_leaves<E, F>(&self, f: &mut F) -> Result<CoordinateTree, E>
    where
        F: FnMut(Coordinate) -> Result<Coordinate, E>,
    {
        match self {
            CoordinateTree::Leaf(c) => f(*c).map(CoordinateTree::Leaf),
            CoordinateTree::Branch(children) => children
                .iter()
                .map(|child| child.try_map_leaves(f))
                .collect::<Result<Vec<_>, E>>()
                .map(CoordinateTree::Branch),
        }
    }

    /// Parse nested JSON arrays.
    ///
    /// A level whose elements are numbers is a leaf and must hold exactly two
    /// of them; any other level must consist of arrays only.
    pub fn from_json(value: &Value) -> Result<Self, ProjectionError> {
        let mut path = String::new();
        parse_node(value, &mut path)
    }

    pub fn to_json(&self) -> Value {
        match self {
            CoordinateTree::Leaf(c) => Value::Array(vec![Value::from(c.x), Value::from(c.y)]),
            CoordinateTree::Branch(children) => {
                Value::Array(children.iter().map(CoordinateTree::to_json).collect())
            }
        }
    }
}

impl TryFrom<&Value> for CoordinateTree {
    type Error = ProjectionError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        CoordinateTree::from_json(value)
    }
}

impl Serialize for CoordinateTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CoordinateTree::Leaf(c) => [c.x, c.y].serialize(serializer),
            CoordinateTree::Branch(children) => {
                let mut seq = serializer.serialize_seq(Some(children.len()))?;
                for child in children {
                    seq.serialize_element(child)?;
                }
                seq.end()
            }
        }
    }
}

fn parse_node(value: &Value, path: &mut String) -> Result<CoordinateTree, ProjectionError> {
    let invalid = |path: &str, reason: &str| ProjectionError::InvalidGeometry {
        path: if path.is_empty() { "$".to_string() } else { format!("${path}") },
        reason: reason.to_string(),
    };

    let items = value
        .as_array()
        .ok_or_else(|| invalid(path.as_str(), "expected an array"))?;

    let numbers = items.iter().filter(|v| v.is_number()).count();
    if numbers > 0 {
        if numbers != items.len() {
            return Err(invalid(path.as_str(), "mixes numbers and nested arrays"));
        }
        if items.len() != 2 {
            return Err(invalid(path.as_str(), "coordinate must have exactly 2 values"));
        }
        let x = items[0]
            .as_f64()
            .ok_or_else(|| invalid(path.as_str(), "x is not representable as f64"))?;
        let y = items[1]
            .as_f64()
            .ok_or_else(|| invalid(path.as_str(), "y is not representable as f64"))?;
        return Ok(CoordinateTree::leaf(x, y));
    }

    let mut children = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let len = path.len();
        path.push_str(&format!("[{i}]"));
        children.push(parse_node(item, path)?);
        path.truncate(len);
    }
    Ok(CoordinateTree::Branch(children))
}

#[cfg(test)]
mod tests {
    use super::{CoordinateTree, Shape};
    use crate::error::ProjectionError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn try_map_stops_at_first_rejected_leaf() {
        let tree = CoordinateTree::Branch(vec![
            CoordinateTree::line([[0.0, 0.0], [1.0, 1.0]]),
            CoordinateTree::line([[2.0, 2.0], [3.0, 3.0]]),
        ]);
        let mut visited = 0;
        let out: Result<CoordinateTree, f64> = tree.try_map_leaves(&mut |c| {
            visited += 1;
            if c.x >= 2.0 { Err(c.x) } else { Ok(c) }
        });
        assert_eq!(out, Err(2.0));
        assert_eq!(visited, 3);

        let doubled: Result<CoordinateTree, ()> =
            tree.try_map_leaves(&mut |c| Ok(super::Coordinate::new(c.x * 2.0, c.y)));
        let doubled = doubled.expect("map");
        assert_eq!(doubled.shape(), tree.shape());
        assert_eq!(doubled.to_json(), json!([[[0.0, 0.0], [2.0, 1.0]], [[4.0, 2.0], [6.0, 3.0]]]));
    }

    #[test]
    fn parses_polygon_rings() {
        let value = json!([
            [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
            [[0.2, 0.2], [0.4, 0.2], [0.2, 0.2]]
        ]);
        let tree = CoordinateTree::from_json(&value).expect("parse");
        assert_eq!(tree.leaf_count(), 7);
        assert_eq!(
            tree.shape(),
            Shape::Branch(vec![
                Shape::Branch(vec![Shape::Leaf; 4]),
                Shape::Branch(vec![Shape::Leaf; 3]),
            ])
        );
        assert_eq!(tree.to_json(), value);
    }

    #[test]
    fn integers_are_accepted_as_coordinates() {
        let tree = CoordinateTree::from_json(&json!([136, 36])).expect("parse");
        assert_eq!(tree, CoordinateTree::leaf(136.0, 36.0));
    }

    #[test]
    fn empty_array_is_an_empty_branch() {
        let tree = CoordinateTree::from_json(&json!([])).expect("parse");
        assert_eq!(tree, CoordinateTree::Branch(Vec::new()));
        assert_eq!(tree.leaf_count(), 0);
    }

    #[test]
    fn rejects_malformed_leaves() {
        let cases = [
            (json!([1.0]), "$"),
            (json!([1.0, 2.0, 3.0]), "$"),
            (json!([[1.0, 2.0], [3.0, "x"]]), "$[1]"),
            (json!([[1.0, 2.0], [3.0, [4.0, 5.0]]]), "$[1]"),
            (json!([[[0.0, 0.0]], [null]]), "$[1][0]"),
            (json!("not coordinates"), "$"),
        ];
        for (value, expected_path) in cases {
            match CoordinateTree::from_json(&value) {
                Err(ProjectionError::InvalidGeometry { path, .. }) => {
                    assert_eq!(path, expected_path, "for {value}");
                }
                other => panic!("expected InvalidGeometry for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn serializes_as_nested_arrays() {
        let tree = CoordinateTree::line([[1.0, 2.0], [3.0, 4.0]]);
        let encoded = serde_json::to_string(&tree).expect("serialize");
        assert_eq!(encoded, "[[1.0,2.0],[3.0,4.0]]");
    }
}
