//! Error types for card_scanner

use thiserror::Error;

/// Unified error type for scan and inventory operations
#[derive(Debug, Error)]
pub enum ScanError {
    /// Request carried neither a (set, collector number) pair nor a card name
    #[error("insufficient scan data")]
    InsufficientScanData,
    /// Card could not be resolved locally or externally
    #[error("card not found: {0}")]
    CardNotFound(String),
    /// Scryfall transport failure, timeout, or non-404 error status
    #[error("scryfall error: {detail}")]
    ExternalService {
        /// HTTP status, absent for transport-level failures
        status: Option<u16>,
        detail: String,
    },
    /// Local persistence failure
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Removal of a card the user does not own
    #[error("card not found in inventory: {0}")]
    NotInInventory(String),
    /// Bulk scan called with an empty request list
    #[error("scan batch is empty")]
    EmptyBatch,
    /// Bearer token missing, unknown, or expired
    #[error("invalid or expired token")]
    InvalidToken,
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        ScanError::ExternalService {
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
        }
    }
}

/// Result alias for card_scanner operations
pub type Result<T> = std::result::Result<T, ScanError>;
