use std::future::Future;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::protocol::ChatRequest;

/// Response body as it arrives, one chunk per item.
pub type ChunkStream = BoxStream<'static, Result<Bytes, TransportFailure>>;

/// Anything that keeps a request from completing. The session treats every
/// variant the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(String),
    #[error("response has no readable body")]
    NoBody,
    #[error("response stream interrupted: {0}")]
    Stream(String),
}

/// Network collaborator of the assembler.
pub trait ChatTransport {
    /// Send `request`; on a successful status, hand back the body stream.
    ///
    /// The caller owns the stream and drops it when done, which releases the
    /// underlying connection.
    fn open(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChunkStream, TransportFailure>> + Send;
}
