//! Training label generation: locate annotation regions in OCR geometry
//! and emit BIO-tagged token manifests for layout-model training.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{OcrError, Result};
use crate::models::config::SpatialConfig;
use crate::ocr::{flatten_pages, OcrPayload, Word};

pub mod bio;
pub mod matcher;
pub mod spatial;

pub use bio::{RegionAnnotation, Token, TrainingManifest};
pub use matcher::RegionMatcher;

/// Half-open byte range into the flattened document text.
pub type Span = (usize, usize);

/// Annotation region classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    SellerInfo,
    BillTo,
    ShipTo,
    InvoiceNo,
    InvoiceDate,
    LineItemTable,
    TotalTax,
    GrandTotal,
}

impl Region {
    /// Every region, in the order manifests list them.
    pub const ALL: [Region; 8] = [
        Region::SellerInfo,
        Region::BillTo,
        Region::ShipTo,
        Region::InvoiceNo,
        Region::InvoiceDate,
        Region::LineItemTable,
        Region::TotalTax,
        Region::GrandTotal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::SellerInfo => "SELLER_INFO",
            Region::BillTo => "BILL_TO",
            Region::ShipTo => "SHIP_TO",
            Region::InvoiceNo => "INVOICE_NO",
            Region::InvoiceDate => "INVOICE_DATE",
            Region::LineItemTable => "LINE_ITEM_TABLE",
            Region::TotalTax => "TOTAL_TAX",
            Region::GrandTotal => "GRAND_TOTAL",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate the training manifest for one OCR document.
///
/// Requires page geometry; a text-only payload cannot be annotated and
/// errors with [`OcrError::MissingGeometry`].
pub fn generate_labels(
    payload: &OcrPayload,
    file_name: &str,
    config: &SpatialConfig,
) -> Result<TrainingManifest> {
    if !payload.has_geometry() {
        return Err(OcrError::MissingGeometry.into());
    }

    let doc = flatten_pages(&payload.pages);
    let spans = RegionMatcher::new(config).find_matches(&doc.words, &doc.text);

    for region in Region::ALL {
        match spans.get(&region) {
            Some(&(start, end)) => {
                debug!("{region}: ({start}, {end}) -> {:?}", &doc.text[start..end])
            }
            None => debug!("{region}: no match"),
        }
    }

    let region_words = align_spans_to_words(&doc.words, &spans);
    let manifest = bio::generate_manifest(file_name, &region_words, &doc.words);

    info!(
        "{file_name}: {} regions, {} tokens",
        manifest.regions.len(),
        manifest.tokens.len()
    );
    Ok(manifest)
}

/// Resolve each region span to the words it overlaps, in reading order.
fn align_spans_to_words<'a>(
    words: &'a [Word],
    spans: &HashMap<Region, Span>,
) -> HashMap<Region, Vec<&'a Word>> {
    spans
        .iter()
        .map(|(&region, &(start, end))| {
            let members = words
                .iter()
                .filter(|w| w.start_char_idx < end && w.end_char_idx > start)
                .collect();
            (region, members)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_region_serde_names() {
        let json = serde_json::to_string(&Region::LineItemTable).unwrap();
        assert_eq!(json, "\"LINE_ITEM_TABLE\"");
        let back: Region = serde_json::from_str("\"SELLER_INFO\"").unwrap();
        assert_eq!(back, Region::SellerInfo);
    }

    #[test]
    fn test_align_partial_overlap_includes_word() {
        let words = vec![
            Word {
                text: "Invoice".to_string(),
                bbox: [0, 0, 60, 10],
                start_char_idx: 0,
                end_char_idx: 7,
            },
            Word {
                text: "No.".to_string(),
                bbox: [65, 0, 85, 10],
                start_char_idx: 8,
                end_char_idx: 11,
            },
        ];
        // Span cuts into the middle of the second word; it still counts.
        let spans = HashMap::from([(Region::InvoiceNo, (0usize, 9usize))]);

        let aligned = align_spans_to_words(&words, &spans);
        let texts: Vec<&str> = aligned[&Region::InvoiceNo]
            .iter()
            .map(|w| w.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Invoice", "No."]);
    }

    #[test]
    fn test_text_only_payload_rejected() {
        let payload = OcrPayload::from_text("Invoice No. 1");
        assert!(generate_labels(&payload, "a.json", &SpatialConfig::default()).is_err());
    }
}
