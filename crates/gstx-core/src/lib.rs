//! Core library for Indian GST invoice OCR processing.
//!
//! This crate provides:
//! - OCR payload parsing and geometry flattening
//! - GST invoice field extraction (invoice number, dates, GSTINs, amounts)
//! - Line item extraction from tables or raw text
//! - Training label generation with BIO tagging for layout models

pub mod error;
pub mod invoice;
pub mod labels;
pub mod models;
pub mod ocr;

pub use error::{ExtractionError, GstxError, OcrError, Result};
pub use invoice::InvoiceFieldParser;
pub use labels::{generate_labels, Region, TrainingManifest};
pub use models::config::{ExtractionConfig, ExtraPatterns, GstxConfig, SpatialConfig};
pub use models::invoice::{InvoiceFields, LineItem};
pub use ocr::{flatten_pages, FlattenedDocument, OcrPayload, Word};
