use tracing::trace;

use crate::definition::SrsDefinition;
use crate::error::ProjectionError;
use crate::registry::{self, SrsRegistry};
use crate::transform::transform_point;
use crate::tree::{Coordinate, CoordinateTree};

/// Reproject `tree` from `from` to `to` using the process-wide registry.
pub fn reproject(
    tree: &CoordinateTree,
    from: &str,
    to: &str,
) -> Result<CoordinateTree, ProjectionError> {
    reproject_with(registry::global(), tree, from, to)
}

/// Reproject `tree` against an explicit registry.
pub fn reproject_with(
    registry: &SrsRegistry,
    tree: &CoordinateTree,
    from: &str,
    to: &str,
) -> Result<CoordinateTree, ProjectionError> {
    Reprojector::new(registry, from, to)?.apply(tree)
}

/// A resolved `(from, to)` pair, reusable across many trees.
#[derive(Debug, Clone, PartialEq)]
pub struct Reprojector {
    from_id: String,
    to_id: String,
    from: SrsDefinition,
    to: SrsDefinition,
}

impl Reprojector {
    pub fn new(registry: &SrsRegistry, from: &str, to: &str) -> Result<Self, ProjectionError> {
        Ok(Self {
            from_id: from.to_string(),
            to_id: to.to_string(),
            from: registry.get(from)?.clone(),
            to: registry.get(to)?.clone(),
        })
    }

    /// Resolve against the process-wide registry.
    pub fn from_global(from: &str, to: &str) -> Result<Self, ProjectionError> {
        Self::new(registry::global(), from, to)
    }

    pub fn from_id(&self) -> &str {
        &self.from_id
    }

    pub fn to_id(&self) -> &str {
        &self.to_id
    }

    /// The reverse direction.
    pub fn inverse(&self) -> Self {
        Self {
            from_id: self.to_id.clone(),
            to_id: self.from_id.clone(),
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    pub fn point(&self, c: Coordinate) -> Result<Coordinate, ProjectionError> {
        transform_point(&self.from, &self.to, c)
    }

    /// New tree with identical nesting; every leaf transformed. Fails on the
    /// first leaf outside the valid domain.
    pub fn apply(&self, tree: &CoordinateTree) -> Result<CoordinateTree, ProjectionError> {
        trace!(from = %self.from_id, to = %self.to_id, leaves = tree.leaf_count(), "reprojecting");
        tree.try_map_leaves(&mut |c| self.point(c))
    }
}
