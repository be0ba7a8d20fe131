//! Data models for extracted invoice fields and configuration.

pub mod config;
pub mod invoice;

pub use config::{ExtraPatterns, ExtractionConfig, GstxConfig, SpatialConfig};
pub use invoice::{InvoiceFields, LineItem};
