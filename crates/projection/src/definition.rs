use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use proj4rs::proj::Proj;

use crate::error::ProjectionError;

/// A parsed spatial reference system.
///
/// Only geographic (longitude/latitude) systems are accepted, since
/// coordinate trees carry degrees on both sides of a transform. Two
/// definitions are equal when they were built from the same string.
#[derive(Clone)]
pub struct SrsDefinition {
    source: String,
    proj: Arc<Proj>,
}

impl SrsDefinition {
    /// Parse a PROJ.4-style definition such as
    /// `+proj=longlat +ellps=GRS80 +no_defs`.
    pub fn parse(definition: &str) -> Result<Self, ProjectionError> {
        let source = definition.trim();
        let invalid = |reason: String| ProjectionError::InvalidDefinition {
            definition: source.to_string(),
            reason,
        };

        let proj = Proj::from_proj_string(source).map_err(|e| invalid(e.to_string()))?;
        if !proj.is_latlong() {
            return Err(invalid("not a longitude/latitude system".to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            proj: Arc::new(proj),
        })
    }

    pub(crate) fn proj(&self) -> &Proj {
        &self.proj
    }

    /// The definition string this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for SrsDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for SrsDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SrsDefinition").field(&self.source).finish()
    }
}

impl FromStr for SrsDefinition {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SrsDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
