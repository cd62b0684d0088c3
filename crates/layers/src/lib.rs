//! Declarative map configuration handed to the rendering collaborator.
//!
//! Nothing here renders; a [`MapBundle`] is plain data that serializes to the
//! JSON the map library and its overlay consume.

pub mod bundle;
pub mod layer;
pub mod symbology;
pub mod vector;
pub mod view;

pub use bundle::*;
pub use layer::*;
pub use symbology::*;
pub use vector::*;
pub use view::*;
