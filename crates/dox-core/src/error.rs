//! Error types for document text extraction

use std::io;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Document extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Wrong file type handed to an extraction entry point.
    /// Raised before any file I/O is attempted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A parser failed while pulling embedded text from a document.
    /// Fatal for the document; no partial text is returned.
    #[error("Failed to extract text: {0}")]
    Extraction(String),

    /// The OCR service rejected the configured credentials
    #[error("OCR authentication failed: {0}")]
    Auth(String),

    /// Transport or protocol failure talking to the OCR service
    #[error("OCR service error: {0}")]
    Ocr(String),

    /// The OCR poll budget was exhausted before the job reached a
    /// terminal status. Only possible when `PollPolicy::max_attempts`
    /// is set; the default policy waits without bound.
    #[error("OCR job did not complete within the poll budget")]
    Timeout,
}
