//! Error types for the intent router

use thiserror::Error;

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Error, Debug)]
pub enum RouterError {

    // =============================
    // Startup Errors (fatal)
    // =============================

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =============================
    // Per-Request Errors (recovered into an envelope)
    // =============================

    #[error("Classification format error: {0}")]
    ClassificationFormat(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Downstream agent returned HTTP {status}")]
    DownstreamHttp { status: u16 },

    #[error("Downstream agent did not respond within the timeout")]
    DownstreamTimeout,

    #[error("Downstream agent unreachable: {0}")]
    DownstreamUnreachable(String),

    #[error("Downstream agent returned a non-JSON body: {0}")]
    DownstreamFormat(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
