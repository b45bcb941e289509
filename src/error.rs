//! Error types for schema interpretation and transport.

use thiserror::Error;

/// Errors raised while interpreting a schema document.
///
/// Most schema problems degrade locally (an invalid field renders as an
/// inline placeholder, an unresolved reference resolves to nothing); only
/// a document that cannot host a form at all is an error.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The fetched document is not a JSON object at the top level.
    #[error("schema root must be a JSON object, got {actual}")]
    RootNotObject {
        /// JSON kind of the offending document ("array", "string", ...).
        actual: &'static str,
    },
}

/// Errors crossing the request/response boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("request failed with status {0}")]
    Status(u16),

    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not the expected JSON.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local file transport I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
