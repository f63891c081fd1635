//! Muninn error types

/// Muninn error types
#[derive(Debug, thiserror::Error)]
pub enum MuninnError {
    // Resolution errors
    /// The cluster manager produced no usable tracking URL for this
    /// application id. Terminal for the attempt; never retried.
    #[error("application not locatable: {0}")]
    NotLocatable(String),

    #[error("redirect limit of {max} exceeded at {url}")]
    RedirectLimitExceeded { url: String, max: usize },

    #[error("protocol error: {0}")]
    Protocol(String),

    // Transport/data errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote service reports an API version the conversion layer
    /// cannot translate into the native dialect.
    #[error("incompatible service version: {0}")]
    IncompatibleVersion(String),

    // Configuration errors
    #[error("no cluster client configured")]
    NoCluster,

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for Muninn operations
pub type Result<T> = std::result::Result<T, MuninnError>;
