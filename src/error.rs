use thiserror::Error;

/// Errors surfaced by the shim at the process boundary
#[derive(Debug, Error)]
pub enum ShimError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShimError {
    /// Category string written to the `error` field of the error envelope
    pub fn category(&self) -> &'static str {
        match self {
            // A body that is not valid JSON is the caller's fault
            ShimError::InvalidRequest(_) | ShimError::Json(_) => "InvalidRequest",
            ShimError::Generation(_) => "GenerationError",
            ShimError::Parse(_) => "ParseError",
            ShimError::Io(_) | ShimError::Internal(_) => "InternalError",
        }
    }
}

pub type Result<T> = std::result::Result<T, ShimError>;
