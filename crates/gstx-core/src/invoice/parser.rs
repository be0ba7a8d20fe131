//! Invoice field parser: ordered regex cascades over OCR text, with
//! geometry-assisted line item extraction when tables are available.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{GstxError, OcrError, Result};
use crate::models::config::{ExtraPatterns, ExtractionConfig};
use crate::models::invoice::{InvoiceFields, LineItem};
use crate::ocr::tree::Page;
use crate::ocr::OcrPayload;

use super::rules::{
    self,
    patterns::{BUYER_NAME, BUYER_NAME_GENERAL, STATE_CODE_SUFFIX},
};

/// Field parser over one immutable OCR payload.
///
/// Construction is the only fallible step (a payload with no text at all is
/// the fatal upstream-failure case). Every `parse_*` method is independently
/// fault-isolating: a non-match or conversion failure in one field never
/// affects any other, and the same input always yields the same output.
pub struct InvoiceFieldParser {
    /// Upper-cased document text.
    text: String,
    /// Text split on newlines; most cascades match within a single line.
    lines: Vec<String>,
    /// Page geometry, empty when the provider returned text only.
    pages: Vec<Page>,
    config: ExtractionConfig,
    /// Configured template patterns, compiled once at construction.
    extras: CompiledExtras,
}

/// Compiled form of [`ExtraPatterns`]. Each list is tried before the
/// corresponding built-in cascade.
struct CompiledExtras {
    invoice_number: Vec<Regex>,
    invoice_date: Vec<Regex>,
    buyer_name: Vec<Regex>,
    total_tax: Vec<Regex>,
    grand_total: Vec<Regex>,
}

impl CompiledExtras {
    fn compile(patterns: &ExtraPatterns) -> Result<Self> {
        let compile = |list: &[String]| -> Result<Vec<Regex>> {
            list.iter()
                .map(|p| {
                    Regex::new(p).map_err(|e| {
                        GstxError::Config(format!("invalid extraction pattern {p:?}: {e}"))
                    })
                })
                .collect()
        };

        Ok(Self {
            invoice_number: compile(&patterns.invoice_number)?,
            invoice_date: compile(&patterns.invoice_date)?,
            buyer_name: compile(&patterns.buyer_name)?,
            total_tax: compile(&patterns.total_tax)?,
            grand_total: compile(&patterns.grand_total)?,
        })
    }
}

impl InvoiceFieldParser {
    /// Build a parser from an OCR payload.
    ///
    /// Errors with [`OcrError::MissingText`] when the payload has neither
    /// text nor geometry to reconstruct it from.
    pub fn new(payload: &OcrPayload) -> Result<Self> {
        Self::with_config(payload, ExtractionConfig::default())
    }

    /// Build a parser with explicit extraction configuration.
    ///
    /// Also fails with [`GstxError::Config`] when a configured extra
    /// pattern does not compile.
    pub fn with_config(payload: &OcrPayload, config: ExtractionConfig) -> Result<Self> {
        let full_text = payload.full_text();
        if full_text.trim().is_empty() {
            return Err(OcrError::MissingText.into());
        }

        let extras = CompiledExtras::compile(&config.extra_patterns)?;
        let text = full_text.to_uppercase();
        let lines = text.split('\n').map(|l| l.to_string()).collect();

        info!(
            "initialized field parser: {} bytes of text, geometry: {}",
            text.len(),
            if payload.has_geometry() { "yes" } else { "no" }
        );

        Ok(Self {
            text,
            lines,
            pages: payload.pages.clone(),
            config,
            extras,
        })
    }

    /// Extract every field. Infallible: fields that resolve to nothing are
    /// null, and line items are fully replaced on every call.
    pub fn parse(&self) -> InvoiceFields {
        let seller_gstin = self.parse_seller_gstin();
        let buyer_gstin = self.parse_buyer_gstin(seller_gstin.as_deref());

        let fields = InvoiceFields {
            invoice_number: self.parse_invoice_number(),
            invoice_date: self.parse_invoice_date(),
            buyer_name: self.parse_buyer_name(),
            total_tax: self.parse_total_tax(),
            grand_total: self.parse_grand_total(),
            line_items: self.parse_line_items(),
            seller_gstin,
            buyer_gstin,
        };

        debug!("extraction complete, missing: {:?}", fields.missing_fields());
        fields
    }

    pub fn parse_invoice_number(&self) -> Option<String> {
        rules::find_first_match(&self.lines, &self.extras.invoice_number)
            .or_else(|| rules::find_first_match(&self.lines, &rules::patterns::INVOICE_NUMBER))
    }

    pub fn parse_invoice_date(&self) -> Option<NaiveDate> {
        rules::find_first_match(&self.lines, &self.extras.invoice_date)
            .and_then(|s| rules::parse_date_str(&s))
            .or_else(|| rules::extract_invoice_date(&self.lines))
    }

    pub fn parse_seller_gstin(&self) -> Option<String> {
        rules::extract_seller_gstin(&self.lines)
    }

    pub fn parse_buyer_gstin(&self, seller_gstin: Option<&str>) -> Option<String> {
        rules::extract_buyer_gstin(&self.lines, seller_gstin)
    }

    /// Extract the buyer name via the label cascade, stripping any trailing
    /// "State, CODE: NN" fragment the capture dragged along.
    ///
    /// When labels fail and geometry is present, the paragraph nearest a
    /// buyer GSTIN token would be the natural disambiguator; that positional
    /// pass is an extension point, not implemented. The ATTN:/M/S. cascade
    /// covers the remaining templates.
    pub fn parse_buyer_name(&self) -> Option<String> {
        let clean = |name: String| -> String {
            STATE_CODE_SUFFIX.replace_all(&name, "").trim().to_string()
        };

        if let Some(name) = rules::find_first_match(&self.lines, &self.extras.buyer_name) {
            return Some(clean(name));
        }
        if let Some(name) = rules::find_first_match(&self.lines, &BUYER_NAME) {
            return Some(clean(name));
        }

        rules::find_first_match(&self.lines, &BUYER_NAME_GENERAL).map(clean)
    }

    pub fn parse_total_tax(&self) -> Option<Decimal> {
        rules::find_first_match(&self.lines, &self.extras.total_tax)
            .and_then(|s| rules::parse_amount(&s))
            .or_else(|| rules::extract_total_tax(&self.lines))
    }

    pub fn parse_grand_total(&self) -> Option<Decimal> {
        rules::find_first_match(&self.lines, &self.extras.grand_total)
            .and_then(|s| rules::parse_amount(&s))
            .or_else(|| rules::extract_grand_total(&self.lines))
    }

    /// Extract line items: explicit geometry tables first, per-line regex
    /// otherwise. The two strategies never mix within one call.
    pub fn parse_line_items(&self) -> Vec<LineItem> {
        if self.config.use_geometry_tables {
            let items = rules::extract_from_tables(&self.pages);
            if !items.is_empty() {
                return items;
            }
            debug!("no geometry tables, falling back to per-line regex");
        }

        rules::extract_from_lines(&self.lines)
    }

    /// The upper-cased text the cascades run against.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    use super::*;

    fn parser(text: &str) -> InvoiceFieldParser {
        InvoiceFieldParser::new(&OcrPayload::from_text(text)).unwrap()
    }

    #[test]
    fn test_empty_payload_is_fatal() {
        let result = InvoiceFieldParser::new(&OcrPayload::from_text("   "));
        assert!(result.is_err());
    }

    #[test]
    fn test_real_template_scenario() {
        let p = parser(
            "TAX INVOICE\n\
             Invoice No. SHB/456/20\n\
             Dated 20-Dec-20\n\
             GSTIN/UIN: 29AACCT3705E1ZT\n\
             CGST| 315.00\n\
             SGST| 315.00\n\
             GRAND TOTAL ₹ 4,130.00",
        );

        assert_eq!(p.parse_invoice_number(), Some("SHB/456/20".to_string()));
        // Month-name dates are outside the numeric format cascade.
        assert_eq!(p.parse_invoice_date(), None);
        assert_eq!(
            p.parse_seller_gstin(),
            Some("29AACCT3705E1ZT".to_string())
        );
        assert_eq!(
            p.parse_total_tax(),
            Some(Decimal::from_str("630.00").unwrap())
        );
        assert_eq!(
            p.parse_grand_total(),
            Some(Decimal::from_str("4130.00").unwrap())
        );
    }

    #[test]
    fn test_buyer_name_state_code_stripped() {
        let p = parser("BILL TO: ACME TRADERS, KARNATAKA, CODE: 29");
        assert_eq!(p.parse_buyer_name(), Some("ACME TRADERS".to_string()));
    }

    #[test]
    fn test_buyer_name_general_fallback() {
        let p = parser("M/S. SHARMA AND SONS\nGSTIN: 07ABCDE1234F9Z0");
        assert_eq!(p.parse_buyer_name(), Some("SHARMA AND SONS".to_string()));
    }

    #[test]
    fn test_field_isolation() {
        // A document with a malformed date and garbage amounts still yields
        // the extractable fields.
        let p = parser("INVOICE NO: A-1\nDATE: 99/99/9999\nTOTAL TAX: XYZ");
        assert_eq!(p.parse_invoice_number(), Some("A-1".to_string()));
        assert_eq!(p.parse_invoice_date(), None);
        assert_eq!(p.parse_total_tax(), None);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let p = parser(
            "INVOICE NO: A-1\nDATE: 20/12/2020\nGSTIN: 29AACCT3705E1ZT\n\
             1 STEEL ROD 7306 7.0 500.00 3500.00 18.0 4130.00\n\
             GRAND TOTAL RS. 4,130.00",
        );
        let first = p.parse();
        let second = p.parse();
        assert_eq!(first, second);
        assert_eq!(first.line_items.len(), 1);
    }

    #[test]
    fn test_buyer_gstin_distinct_from_seller() {
        let p = parser(
            "GSTIN/UIN: 29AACCT3705E1ZT\n\
             BUYER (BILL TO)\n\
             GSTIN/UIN: 07ABCDE1234F9Z0",
        );
        let fields = p.parse();
        assert_eq!(fields.seller_gstin, Some("29AACCT3705E1ZT".to_string()));
        assert_eq!(fields.buyer_gstin, Some("07ABCDE1234F9Z0".to_string()));
        assert_ne!(fields.seller_gstin, fields.buyer_gstin);
    }

    #[test]
    fn test_extra_pattern_covers_unknown_template() {
        // A label no built-in cascade knows, supplied via configuration.
        let mut config = ExtractionConfig::default();
        config.extra_patterns.invoice_number =
            vec![r"VOUCHER\s*REF\s*[:#]?\s*([A-Z0-9\-/]+)".to_string()];

        let payload = OcrPayload::from_text("VOUCHER REF: VR-99/21");
        let p = InvoiceFieldParser::with_config(&payload, config).unwrap();

        assert_eq!(p.parse_invoice_number(), Some("VR-99/21".to_string()));
    }

    #[test]
    fn test_extra_pattern_tried_before_builtin_cascade() {
        let mut config = ExtractionConfig::default();
        config.extra_patterns.grand_total =
            vec![r"NET\s*PAYABLE\s*[:.]?\s*([0-9,]+\.[0-9]{2})".to_string()];

        // The built-in cascade would settle for the bare "TOTAL" line.
        let payload = OcrPayload::from_text("TOTAL 100.00\nNET PAYABLE: 250.00");
        let p = InvoiceFieldParser::with_config(&payload, config).unwrap();

        assert_eq!(
            p.parse_grand_total(),
            Some(Decimal::from_str("250.00").unwrap())
        );
    }

    #[test]
    fn test_invalid_extra_pattern_is_a_config_error() {
        let mut config = ExtractionConfig::default();
        config.extra_patterns.invoice_number = vec!["(unclosed".to_string()];

        let payload = OcrPayload::from_text("INVOICE NO: A-1");
        assert!(InvoiceFieldParser::with_config(&payload, config).is_err());
    }
}
