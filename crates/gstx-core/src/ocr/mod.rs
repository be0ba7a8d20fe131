//! OCR payload types and geometry flattening.

mod flatten;
pub mod tree;

pub use flatten::{flatten_pages, FlattenedDocument};
pub use tree::Page;

use serde::{Deserialize, Serialize};

use crate::error::{OcrError, Result};

/// A flat OCR word: text, normalized bounding box, and byte span into the
/// reconstructed document text.
///
/// Boxes are `[x0, y0, x1, y1]` scaled to a fixed 1000x1000 reference frame
/// so documents of any resolution are comparable. Invariants:
/// `start_char_idx < end_char_idx`, `x0 <= x1`, `y0 <= y1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,

    #[serde(rename = "box")]
    pub bbox: [i32; 4],

    pub start_char_idx: usize,
    pub end_char_idx: usize,
}

impl Word {
    /// Center of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        box_center(&self.bbox)
    }
}

/// Center point of a `[x0, y0, x1, y1]` box.
pub fn box_center(bbox: &[i32; 4]) -> (f64, f64) {
    (
        f64::from(bbox[0] + bbox[2]) / 2.0,
        f64::from(bbox[1] + bbox[3]) / 2.0,
    )
}

/// The complete, immutable OCR payload delivered by the upstream provider.
///
/// Two representations: the flat full-text string, and (optionally) the page
/// geometry tree. The field parser degrades to regex-only operation when
/// geometry is absent; label generation requires it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrPayload {
    /// Provider-supplied full text. May be empty when only geometry is given.
    pub text: String,

    /// Page geometry tree. Empty when the provider returned text only.
    pub pages: Vec<Page>,
}

impl OcrPayload {
    /// Build a payload from plain text only (no geometry).
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pages: Vec::new(),
        }
    }

    /// Parse a payload from provider JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let payload: OcrPayload = serde_json::from_str(json)
            .map_err(|e| OcrError::InvalidPayload(e.to_string()))?;
        Ok(payload)
    }

    /// Whether the payload carries page geometry.
    pub fn has_geometry(&self) -> bool {
        !self.pages.is_empty()
    }

    /// The document text: the provider string if present, otherwise the text
    /// reconstructed from geometry.
    pub fn full_text(&self) -> String {
        if !self.text.is_empty() {
            self.text.clone()
        } else {
            flatten_pages(&self.pages).text
        }
    }
}
