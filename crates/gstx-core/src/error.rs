//! Error types for the gstx-core library.

use thiserror::Error;

/// Main error type for the gstx library.
#[derive(Error, Debug)]
pub enum GstxError {
    /// OCR payload error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the incoming OCR payload.
///
/// These are the fatal, whole-parse failures: a payload with no usable text
/// or geometry cannot produce any result. Individual field non-matches are
/// `None` values, never errors.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The payload carries neither text nor geometry.
    #[error("OCR payload has no text")]
    MissingText,

    /// Geometry is required for this operation but absent.
    #[error("OCR payload has no page geometry")]
    MissingGeometry,

    /// The payload could not be interpreted.
    #[error("invalid OCR payload: {0}")]
    InvalidPayload(String),
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },

    /// No invoice data could be extracted.
    #[error("no invoice data found")]
    NoData,
}

/// Result type for the gstx library.
pub type Result<T> = std::result::Result<T, GstxError>;
