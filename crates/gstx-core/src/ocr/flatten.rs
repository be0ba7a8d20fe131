//! Geometry flattening: nested OCR tree to word sequence plus full text.

use tracing::debug;

use super::tree::{BoundingPoly, Page};
use super::Word;

/// Flattened view of an OCR tree: the reconstructed document text and every
/// word with its byte span into that text.
#[derive(Debug, Clone, Default)]
pub struct FlattenedDocument {
    pub text: String,
    pub words: Vec<Word>,
}

/// Flatten an OCR page tree into `(full_text, words)`.
///
/// Separator contract (load-bearing for all span arithmetic downstream, do
/// not change): words within a paragraph are joined by single spaces; one
/// newline is appended per paragraph, one more per block, one more per page.
/// Consecutive paragraphs are therefore 1 newline apart, blocks 2, pages 3.
/// A paragraph that emitted at least one word retracts its final trailing
/// space before the paragraph newline. Empty paragraphs/blocks/pages still
/// emit their separators. Whitespace-only words are skipped entirely and
/// advance no offsets.
///
/// Spans are byte offsets; `text[start_char_idx..end_char_idx]` is exactly
/// the word text.
pub fn flatten_pages(pages: &[Page]) -> FlattenedDocument {
    let mut text = String::new();
    let mut words = Vec::new();
    let mut cursor = 0usize;

    for page in pages {
        // Degenerate pages normalize against 1 to avoid division by zero.
        let page_width = page.width.max(1);
        let page_height = page.height.max(1);

        for block in &page.blocks {
            for paragraph in &block.paragraphs {
                let mut emitted = false;
                for word_node in &paragraph.words {
                    let word_text = word_node.text();
                    if word_text.trim().is_empty() {
                        continue;
                    }

                    let bbox =
                        normalized_box(&word_node.bounding_box, page_width, page_height);
                    words.push(Word {
                        text: word_text.clone(),
                        bbox,
                        start_char_idx: cursor,
                        end_char_idx: cursor + word_text.len(),
                    });

                    text.push_str(&word_text);
                    text.push(' ');
                    cursor += word_text.len() + 1;
                    emitted = true;
                }

                if emitted {
                    // Retract the trailing space before the paragraph break.
                    text.pop();
                    cursor -= 1;
                }
                text.push('\n');
                cursor += 1;
            }
            text.push('\n');
            cursor += 1;
        }
        text.push('\n');
        cursor += 1;
    }

    debug!(
        "flattened {} pages into {} words, {} bytes of text",
        pages.len(),
        words.len(),
        text.len()
    );

    FlattenedDocument { text, words }
}

/// Axis-aligned box over the polygon vertices, scaled to the 0-1000 frame.
fn normalized_box(poly: &BoundingPoly, page_width: u32, page_height: u32) -> [i32; 4] {
    if poly.vertices.is_empty() {
        return [0, 0, 0, 0];
    }

    let min_x = poly.vertices.iter().map(|v| v.x).min().unwrap_or(0);
    let min_y = poly.vertices.iter().map(|v| v.y).min().unwrap_or(0);
    let max_x = poly.vertices.iter().map(|v| v.x).max().unwrap_or(0);
    let max_y = poly.vertices.iter().map(|v| v.y).max().unwrap_or(0);

    let scale = |value: i64, dim: u32| -> i32 {
        (value as f64 / f64::from(dim) * 1000.0).floor() as i32
    };

    [
        scale(min_x, page_width),
        scale(min_y, page_height),
        scale(max_x, page_width),
        scale(max_y, page_height),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ocr::tree::{Block, BoundingPoly, Paragraph, Symbol, Vertex, WordNode};

    fn word_node(text: &str, x0: i64, y0: i64, x1: i64, y1: i64) -> WordNode {
        WordNode {
            symbols: text
                .chars()
                .map(|c| Symbol {
                    text: c.to_string(),
                })
                .collect(),
            bounding_box: BoundingPoly {
                vertices: vec![
                    Vertex { x: x0, y: y0 },
                    Vertex { x: x1, y: y0 },
                    Vertex { x: x1, y: y1 },
                    Vertex { x: x0, y: y1 },
                ],
            },
        }
    }

    fn page(width: u32, height: u32, paragraphs: Vec<Vec<WordNode>>) -> Page {
        Page {
            width,
            height,
            blocks: vec![Block {
                paragraphs: paragraphs
                    .into_iter()
                    .map(|words| Paragraph { words })
                    .collect(),
            }],
            tables: Vec::new(),
        }
    }

    #[test]
    fn test_words_joined_by_single_space() {
        let pages = vec![page(
            1000,
            1000,
            vec![vec![
                word_node("INVOICE", 0, 0, 100, 20),
                word_node("NO", 110, 0, 140, 20),
            ]],
        )];

        let doc = flatten_pages(&pages);
        assert_eq!(doc.text, "INVOICE NO\n\n\n");
        assert_eq!(doc.words.len(), 2);
    }

    #[test]
    fn test_spans_index_back_into_text() {
        let pages = vec![page(
            1000,
            1000,
            vec![
                vec![word_node("GSTIN", 0, 0, 50, 10)],
                vec![
                    word_node("29AACCT3705E1ZT", 0, 20, 150, 30),
                    word_node("DATED", 200, 20, 250, 30),
                ],
            ],
        )];

        let doc = flatten_pages(&pages);
        for word in &doc.words {
            assert_eq!(
                &doc.text[word.start_char_idx..word.end_char_idx],
                word.text
            );
            assert!(word.start_char_idx < word.end_char_idx);
        }
    }

    #[test]
    fn test_paragraph_block_page_separators() {
        let mut p1 = page(1000, 1000, vec![vec![word_node("A", 0, 0, 10, 10)]]);
        p1.blocks.push(Block {
            paragraphs: vec![Paragraph {
                words: vec![word_node("B", 0, 20, 10, 30)],
            }],
        });
        let p2 = page(1000, 1000, vec![vec![word_node("C", 0, 0, 10, 10)]]);

        let doc = flatten_pages(&[p1, p2]);
        // Paragraphs within a block: 1 newline; blocks: 2; pages: 3.
        assert_eq!(doc.text, "A\n\nB\n\n\nC\n\n\n");
    }

    #[test]
    fn test_whitespace_words_skipped_without_corrupting_offsets() {
        let pages = vec![page(
            1000,
            1000,
            vec![vec![
                word_node("A", 0, 0, 10, 10),
                word_node("  ", 20, 0, 30, 10),
                word_node("B", 40, 0, 50, 10),
            ]],
        )];

        let doc = flatten_pages(&pages);
        assert_eq!(doc.words.len(), 2);
        assert_eq!(doc.text, "A B\n\n\n");
        assert_eq!(&doc.text[doc.words[1].start_char_idx..doc.words[1].end_char_idx], "B");
    }

    #[test]
    fn test_zero_dimension_page_does_not_panic() {
        let pages = vec![page(0, 0, vec![vec![word_node("A", 5, 5, 10, 10)]])];
        let doc = flatten_pages(&pages);
        // Degenerate normalization, but no crash and spans stay valid.
        assert_eq!(doc.words.len(), 1);
        assert_eq!(doc.words[0].bbox, [5000, 5000, 10000, 10000]);
    }

    #[test]
    fn test_box_normalization_floors_to_reference_frame() {
        let pages = vec![page(2480, 3508, vec![vec![word_node("A", 124, 350, 248, 701)]])];
        let doc = flatten_pages(&pages);
        assert_eq!(doc.words[0].bbox, [50, 99, 100, 199]);
    }

    #[test]
    fn test_empty_paragraph_still_emits_separator() {
        let pages = vec![page(
            1000,
            1000,
            vec![vec![word_node("A", 0, 0, 10, 10)], vec![]],
        )];
        let doc = flatten_pages(&pages);
        assert_eq!(doc.text, "A\n\n\n\n");
    }

    #[test]
    fn test_deterministic() {
        let pages = vec![page(
            1000,
            1000,
            vec![vec![
                word_node("INVOICE", 0, 0, 100, 20),
                word_node("NO", 110, 0, 140, 20),
            ]],
        )];
        let a = flatten_pages(&pages);
        let b = flatten_pages(&pages);
        assert_eq!(a.text, b.text);
        assert_eq!(a.words, b.words);
    }
}
