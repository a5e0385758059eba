//! Error types for feed operations.

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Feed error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed endpoint returned a non-success status.
    #[error("Feed returned HTTP status {0}")]
    Status(u16),

    /// The response body is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(String),
}
