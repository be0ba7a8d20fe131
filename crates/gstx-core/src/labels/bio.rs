//! Training manifest generation with BIO token tagging.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Region;
use crate::ocr::Word;

/// Label for tokens outside every region.
pub const OUTSIDE_LABEL: &str = "O";

/// Per-document training annotation: region boxes plus one BIO-labeled
/// token per OCR word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingManifest {
    pub file_name: String,
    pub regions: Vec<RegionAnnotation>,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAnnotation {
    pub class: Region,
    /// Union of the member word boxes, normalized to the 0..=1000 grid.
    #[serde(rename = "box")]
    pub bbox: [i32; 4],
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(rename = "box")]
    pub bbox: [i32; 4],
    pub label: String,
}

/// Build the manifest for one document.
///
/// Every word starts as `O`. For each matched region, in reading order,
/// the first member word becomes `B-<REGION>` and the rest `I-<REGION>`;
/// tokens are located by their byte offset in the flattened text, so even
/// duplicate words with identical text and geometry each claim their own
/// token.
pub fn generate_manifest(
    file_name: &str,
    region_words: &HashMap<Region, Vec<&Word>>,
    all_words: &[Word],
) -> TrainingManifest {
    let mut tokens: Vec<Token> = all_words
        .iter()
        .map(|w| Token {
            text: w.text.clone(),
            bbox: w.bbox,
            label: OUTSIDE_LABEL.to_string(),
        })
        .collect();

    let mut regions = Vec::new();

    for region in Region::ALL {
        let Some(members) = region_words.get(&region) else {
            continue;
        };
        if members.is_empty() {
            debug!("region {region} matched a span containing no words, skipping");
            continue;
        }

        let mut members = members.clone();
        members.sort_by_key(|w| w.start_char_idx);

        let mut first = true;
        for word in &members {
            let hit = all_words
                .iter()
                .position(|w| w.start_char_idx == word.start_char_idx);
            if let Some(idx) = hit {
                tokens[idx].label = if first {
                    format!("B-{region}")
                } else {
                    format!("I-{region}")
                };
                first = false;
            }
        }

        regions.push(RegionAnnotation {
            class: region,
            bbox: union_box(&members),
            words: members.iter().map(|w| w.text.clone()).collect(),
        });
    }

    TrainingManifest {
        file_name: file_name.to_string(),
        regions,
        tokens,
    }
}

fn union_box(words: &[&Word]) -> [i32; 4] {
    let mut bbox = words[0].bbox;
    for w in &words[1..] {
        bbox[0] = bbox[0].min(w.bbox[0]);
        bbox[1] = bbox[1].min(w.bbox[1]);
        bbox[2] = bbox[2].max(w.bbox[2]);
        bbox[3] = bbox[3].max(w.bbox[3]);
    }
    bbox
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn word(text: &str, bbox: [i32; 4], start: usize) -> Word {
        Word {
            text: text.to_string(),
            bbox,
            start_char_idx: start,
            end_char_idx: start + text.len(),
        }
    }

    #[test]
    fn test_bio_sequence_per_region() {
        let words = vec![
            word("Invoice", [0, 0, 60, 10], 0),
            word("No.", [65, 0, 85, 10], 8),
            word("SHB/456/20", [90, 0, 170, 10], 12),
            word("Declaration", [0, 500, 80, 510], 23),
        ];
        let members: Vec<&Word> = words[..3].iter().collect();
        let region_words = HashMap::from([(Region::InvoiceNo, members)]);

        let manifest = generate_manifest("inv.json", &region_words, &words);

        let labels: Vec<&str> = manifest.tokens.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["B-INVOICE_NO", "I-INVOICE_NO", "I-INVOICE_NO", "O"]
        );
    }

    #[test]
    fn test_region_union_box_and_words() {
        let words = vec![
            word("Dated", [500, 100, 540, 110], 0),
            word("20-Dec-20", [550, 95, 620, 112], 6),
        ];
        let members: Vec<&Word> = words.iter().collect();
        let region_words = HashMap::from([(Region::InvoiceDate, members)]);

        let manifest = generate_manifest("inv.json", &region_words, &words);

        assert_eq!(manifest.regions.len(), 1);
        let region = &manifest.regions[0];
        assert_eq!(region.class, Region::InvoiceDate);
        assert_eq!(region.bbox, [500, 95, 620, 112]);
        assert_eq!(region.words, vec!["Dated", "20-Dec-20"]);
    }

    #[test]
    fn test_repeated_word_text_claims_own_geometry() {
        // "Total" appears twice; only the occurrence inside the region gets
        // a label, identified by its offset.
        let words = vec![
            word("Total", [0, 100, 40, 110], 0),
            word("Total", [0, 400, 40, 410], 6),
            word("630.00", [50, 400, 100, 410], 12),
        ];
        let members: Vec<&Word> = words[1..].iter().collect();
        let region_words = HashMap::from([(Region::TotalTax, members)]);

        let manifest = generate_manifest("inv.json", &region_words, &words);

        assert_eq!(manifest.tokens[0].label, "O");
        assert_eq!(manifest.tokens[1].label, "B-TOTAL_TAX");
        assert_eq!(manifest.tokens[2].label, "I-TOTAL_TAX");
    }

    #[test]
    fn test_duplicate_words_with_identical_box_keep_distinct_tags() {
        // OCR occasionally emits the same text with the same rounded box
        // twice in one region. Each occurrence owns its token, so the
        // region keeps exactly one B- tag.
        let words = vec![
            word("315.00", [50, 400, 100, 410], 0),
            word("315.00", [50, 400, 100, 410], 7),
        ];
        let members: Vec<&Word> = words.iter().collect();
        let region_words = HashMap::from([(Region::TotalTax, members)]);

        let manifest = generate_manifest("inv.json", &region_words, &words);

        assert_eq!(manifest.tokens[0].label, "B-TOTAL_TAX");
        assert_eq!(manifest.tokens[1].label, "I-TOTAL_TAX");
    }

    #[test]
    fn test_manifest_serializes_box_key() {
        let words = vec![word("GSTIN", [0, 0, 40, 10], 0)];
        let members: Vec<&Word> = words.iter().collect();
        let region_words = HashMap::from([(Region::SellerInfo, members)]);

        let manifest = generate_manifest("inv.json", &region_words, &words);
        let json = serde_json::to_value(&manifest).unwrap();

        assert_eq!(json["regions"][0]["class"], "SELLER_INFO");
        assert!(json["regions"][0]["box"].is_array());
        assert!(json["tokens"][0]["box"].is_array());
    }
}
