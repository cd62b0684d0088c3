//! Named spatial reference systems.
//!
//! The process-wide registry is installed once, either explicitly through
//! [`init`] before the first lookup or implicitly with the defaults on first
//! use of [`global`]. It is never mutated afterwards.

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use tracing::{debug, error};

use crate::definition::SrsDefinition;
use crate::error::ProjectionError;

/// JGD2011 geographic (GRS80, no datum shift).
pub const EPSG_6668: &str = "EPSG:6668";
/// WGS84 geographic.
pub const EPSG_4326: &str = "EPSG:4326";

const DEFAULTS: [(&str, &str); 3] = [
    (EPSG_6668, "+proj=longlat +ellps=GRS80 +no_defs"),
    (EPSG_4326, "+proj=longlat +datum=WGS84 +no_defs"),
    ("WGS84", "+proj=longlat +datum=WGS84 +no_defs"),
];

static GLOBAL: OnceCell<SrsRegistry> = OnceCell::new();

#[derive(Debug, Clone, Default)]
pub struct SrsRegistry {
    entries: BTreeMap<String, SrsDefinition>,
}

impl SrsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `EPSG:6668` and `EPSG:4326` (alias `WGS84`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (id, definition) in DEFAULTS {
            if let Err(e) = registry.register(id, definition) {
                error!(id, "built-in SRS rejected: {e}");
            }
        }
        registry
    }

    /// Parse and register a PROJ.4-style definition under `id`.
    ///
    /// Re-registering an id replaces the previous definition.
    pub fn register(&mut self, id: &str, definition: &str) -> Result<(), ProjectionError> {
        let parsed = SrsDefinition::parse(definition)?;
        self.insert(id, parsed);
        Ok(())
    }

    pub fn insert(&mut self, id: &str, definition: SrsDefinition) {
        debug!(id, definition = %definition, "registering SRS");
        self.entries.insert(normalize_id(id), definition);
    }

    /// Identifiers are matched case-insensitively (`epsg:4326` == `EPSG:4326`).
    pub fn get(&self, id: &str) -> Result<&SrsDefinition, ProjectionError> {
        self.entries
            .get(&normalize_id(id))
            .ok_or_else(|| ProjectionError::UnknownSrs(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(&normalize_id(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by normalized identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SrsDefinition)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_uppercase()
}

/// Install the process-wide registry. Must happen before the first call to
/// [`global`]; fails once a registry is in place.
pub fn init(registry: SrsRegistry) -> Result<(), ProjectionError> {
    GLOBAL
        .set(registry)
        .map_err(|_| ProjectionError::AlreadyInitialized)
}

/// The process-wide registry, defaulting to [`SrsRegistry::with_defaults`].
pub fn global() -> &'static SrsRegistry {
    GLOBAL.get_or_init(SrsRegistry::with_defaults)
}
