//! Wire types of the chat endpoint.
//!
//! Requests are a small JSON object; responses are raw text streamed in
//! arbitrary chunks with no framing of their own.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/chat";

/// Assistant text shown when a request could not be completed.
pub const FALLBACK_TEXT: &str = "Error: Could not reach server.";

/// Body of `POST <endpoint>`: `{"query": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

impl ChatRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}
