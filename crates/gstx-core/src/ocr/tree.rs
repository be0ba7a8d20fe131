//! Typed OCR response tree.
//!
//! Vision-style OCR responses arrive as deeply nested JSON
//! (pages -> blocks -> paragraphs -> words -> symbols). The tree is
//! deserialized once at the ingestion boundary; the rest of the engine only
//! ever sees the flat [`Word`](super::Word) sequence plus the reconstructed
//! full text.

use serde::{Deserialize, Serialize};

/// A single OCR'd page with pixel dimensions and nested structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    /// Page width in pixels.
    pub width: u32,
    /// Page height in pixels.
    pub height: u32,
    /// Text blocks on the page.
    pub blocks: Vec<Block>,
    /// Table structures, when the OCR provider detected any.
    pub tables: Vec<Table>,
}

/// A block of paragraphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Block {
    pub paragraphs: Vec<Paragraph>,
}

/// A paragraph of words.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paragraph {
    pub words: Vec<WordNode>,
}

/// A word in the OCR tree: symbols plus a bounding polygon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordNode {
    pub symbols: Vec<Symbol>,
    pub bounding_box: BoundingPoly,
}

impl WordNode {
    /// Concatenated symbol texts.
    pub fn text(&self) -> String {
        self.symbols.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A single recognized symbol (character).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Symbol {
    pub text: String,
}

/// Bounding polygon in absolute pixel coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundingPoly {
    pub vertices: Vec<Vertex>,
}

/// Polygon vertex. Providers omit zero coordinates, hence the defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: i64,
    pub y: i64,
}

/// A detected table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// A table row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A table cell; cell contents nest blocks again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableCell {
    pub blocks: Vec<Block>,
}

impl TableCell {
    /// All word texts in the cell, joined with single spaces.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        for block in &self.blocks {
            for paragraph in &block.paragraphs {
                for word in &paragraph.words {
                    let text = word.text();
                    if !text.is_empty() {
                        parts.push(text);
                    }
                }
            }
        }
        parts.join(" ").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> WordNode {
        WordNode {
            symbols: text
                .chars()
                .map(|c| Symbol {
                    text: c.to_string(),
                })
                .collect(),
            bounding_box: BoundingPoly::default(),
        }
    }

    #[test]
    fn test_word_text_concatenates_symbols() {
        assert_eq!(word("GSTIN").text(), "GSTIN");
    }

    #[test]
    fn test_cell_text_joins_words() {
        let cell = TableCell {
            blocks: vec![Block {
                paragraphs: vec![Paragraph {
                    words: vec![word("STEEL"), word("ROD")],
                }],
            }],
        };
        assert_eq!(cell.text(), "STEEL ROD");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "width": 2480,
            "height": 3508,
            "blocks": [{
                "paragraphs": [{
                    "words": [{
                        "symbols": [{"text": "A"}],
                        "boundingBox": {"vertices": [{"x": 10, "y": 20}, {"x": 30, "y": 40}]}
                    }]
                }]
            }]
        }"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.width, 2480);
        assert_eq!(page.blocks[0].paragraphs[0].words[0].text(), "A");
        assert_eq!(
            page.blocks[0].paragraphs[0].words[0].bounding_box.vertices[1].y,
            40
        );
    }

    #[test]
    fn test_missing_vertex_coordinates_default_to_zero() {
        let v: Vertex = serde_json::from_str(r#"{"y": 5}"#).unwrap();
        assert_eq!(v.x, 0);
        assert_eq!(v.y, 5);
    }
}
