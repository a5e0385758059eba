//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur during a monitor run. Every variant is fatal;
/// the external scheduler provides the retry cadence.
#[derive(Debug, Error)]
pub enum Error {
    /// Secret store access failed or a secret is missing.
    #[error("Credential error: {0}")]
    Credential(#[from] crate::secrets::SecretError),

    /// Feed fetch or parse failed.
    #[error("Feed error: {0}")]
    Feed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Email delivery failed.
    #[error("Mail error: {0}")]
    Mail(#[from] crate::mailer::MailError),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Known-set snapshot could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
