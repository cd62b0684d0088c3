//! Spatial reference systems and coordinate-tree reprojection.
//!
//! Definitions are registered once per process (see [`registry`]) and looked
//! up by identifier when reprojecting. Parsing and datum conversion are done
//! by `proj4rs`; this crate walks coordinate trees and converts between the
//! degrees they carry and the radians `proj4rs` expects.

pub mod definition;
pub mod error;
pub mod registry;
pub mod reproject;
pub mod transform;
pub mod tree;

pub use definition::*;
pub use error::*;
pub use registry::{SrsRegistry, EPSG_4326, EPSG_6668};
pub use reproject::*;
pub use transform::*;
pub use tree::*;
