//! Error type shared by the document engine crates.

/// Error type for document tree operations
#[derive(Debug, thiserror::Error)]
pub enum AdfError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Tree exceeds maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdfError>;
