//! Chat conversation assembled from a chunked response stream.
//!
//! [`ChatSession`] is the pure state machine (`Idle -> Sending -> Streaming
//! -> Idle`); [`Assembler`] drives it against a [`ChatTransport`], reading
//! one chunk at a time.

pub mod assembler;
pub mod decode;
pub mod http;
pub mod message;
pub mod protocol;
pub mod session;
pub mod transport;

pub use assembler::*;
pub use decode::*;
pub use http::*;
pub use message::*;
pub use protocol::*;
pub use session::*;
pub use transport::*;
