//! Error types for pagekv
//!
//! Provides a unified error type for all store operations.

use thiserror::Error;

/// Result type alias using PageStoreError
pub type Result<T> = std::result::Result<T, PageStoreError>;

/// Unified error type for pagekv operations
#[derive(Debug, Error)]
pub enum PageStoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page file not found: {0}")]
    PageNotFound(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Compression error: {0}")]
    Compression(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Migration Errors
    // -------------------------------------------------------------------------
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<bincode::Error> for PageStoreError {
    fn from(err: bincode::Error) -> Self {
        PageStoreError::Serialization(err.to_string())
    }
}
