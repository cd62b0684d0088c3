use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// A coordinate leaf is not a pair of numbers, or a level mixes numbers
    /// and nested arrays.
    #[error("invalid geometry at {path}: {reason}")]
    InvalidGeometry { path: String, reason: String },

    #[error("unknown spatial reference system: {0}")]
    UnknownSrs(String),

    /// The definition string was rejected by the projection library, or
    /// describes a projected system.
    #[error("invalid SRS definition `{definition}`: {reason}")]
    InvalidDefinition { definition: String, reason: String },

    /// Non-finite input, a latitude beyond +-90 degrees, or a position the
    /// transform itself could not handle.
    #[error("cannot transform ({x}, {y}): {reason}")]
    OutOfDomain { x: f64, y: f64, reason: String },

    #[error("SRS registry already initialized")]
    AlreadyInitialized,
}
