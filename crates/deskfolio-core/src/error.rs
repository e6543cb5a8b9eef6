//! Error types for the library seams.
//!
//! Application edges (binaries, config, upstream clients) use `anyhow`; the
//! boundaries other code branches on get typed variants here.

use thiserror::Error;

/// Failure talking to the chat gateway, from either side of the wire.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced an HTTP response
    #[error("Gateway unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-200 status
    #[error("Gateway returned {status}: {}", .error.as_deref().unwrap_or("no error body"))]
    Status { status: u16, error: Option<String> },

    /// The response body wasn't the JSON we expected
    #[error("Malformed gateway response: {0}")]
    Decode(String),

    /// The upstream model failed behind the gateway
    #[error("Upstream model failed: {0}")]
    Upstream(String),

    #[error("Conversation has no messages")]
    EmptyConversation,
}

/// Failure writing the notes slot
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
