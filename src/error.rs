use thiserror::Error;

/// Errors returned by preview-generation operations.
#[derive(Error, Debug)]
pub enum PreviewError {
    /// The Horde returned a non-success HTTP status.
    #[error("AI Horde returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response from the Horde was missing expected fields.
    #[error("{0}")]
    InvalidResponse(String),

    /// A style references a model that is not in the model reference.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PreviewError>;
