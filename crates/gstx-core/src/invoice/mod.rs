//! GST invoice field extraction.

pub mod parser;
pub mod rules;

pub use parser::InvoiceFieldParser;
