use std::future::Future;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tracing::debug;

use crate::protocol::{ChatRequest, DEFAULT_ENDPOINT};
use crate::transport::{ChatTransport, ChunkStream, TransportFailure};

/// `POST`s the request as JSON and streams the response body back.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl HttpTransport {
    /// No request timeout: a stalled server keeps the session waiting.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Bound the whole request, body included. Expiry is reported as a
    /// transport failure like any other.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for HttpTransport {
    fn open(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChunkStream, TransportFailure>> + Send {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let request = request.clone();
        async move {
            debug!(%endpoint, "sending chat request");
            let resp = client
                .post(&endpoint)
                .json(&request)
                .send()
                .await
                .map_err(|e| TransportFailure::Request(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(TransportFailure::Status(status.as_u16()));
            }

            let stream = resp
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| TransportFailure::Stream(e.to_string())));
            Ok(stream.boxed())
        }
    }
}
