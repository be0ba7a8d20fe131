//! Region matching over flattened OCR words.
//!
//! Each region is located spatially first (label word paired with its
//! nearest value word, GSTIN blocks classified by the header above them)
//! and only falls back to whole-document regexes when the spatial pass
//! finds nothing. The first match for a region wins; later candidates
//! never displace it.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::spatial::{match_label_to_value, nearest};
use super::{Region, Span};
use crate::models::config::SpatialConfig;
use crate::ocr::Word;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid built-in pattern")
}

lazy_static! {
    // Word-shape patterns for the spatial pass. Label and value patterns
    // that classify a whole word are anchored; the rest match substrings.
    static ref GSTIN_LABEL: Regex = re(r"\A(?i:GSTIN(?:/UIN)?)\z");
    static ref DATE_LABEL: Regex = re(r"\A(?i:DATED|DATE)\z");
    static ref TOTAL_TAX_LABEL: Regex = re(r"\A(?i:TOTAL\s*TAX\s*AMOUNT|TOTAL\s*TAX)\z");
    static ref GRAND_TOTAL_LABEL: Regex =
        re(r"\A(?i:AMOUNT\s*CHARGEABLE\s*\(\s*IN\s*WORDS\s*\)|GRAND\s*TOTAL|TOTAL\s*AMOUNT)\z");
    static ref INVOICE_NO_LABEL: Regex = re(r"(?i)INVOICE\s*NO\.?|INVOICE");
    static ref TABLE_HEADER_KEYWORD: Regex =
        re(r"(?i)SI\s*NO\.|DESCRIPTION|HSN|SAC|QUANTITY|RATE|AMOUNT|CGST|SGST|TOTAL");

    static ref GSTIN_VALUE: Regex = re(r"\A[0-9A-Z]{15}\z");
    // Anchored with a length floor. Not sufficient on its own: upper-case
    // label words like "INVOICE" fit this shape, so the candidate filter
    // also excludes anything matching the label pattern.
    static ref INVOICE_NO_VALUE: Regex = re(r"\A[A-Z0-9/.\-]{5,20}\z");
    static ref DATE_VALUE: Regex = re(r"\A\d{1,2}\s*-\s*[A-Za-z]+\s*-\s*\d{2}\z");
    static ref AMOUNT_VALUE: Regex = re(r"\A[\d,]+\.\d{2}\z");

    // Header classification for text above a GSTIN value.
    static ref BUYER_HEADER: Regex = re(r"(?i)BUYER|BILL\s*TO");
    static ref SHIP_HEADER: Regex = re(r"(?i)CONSIGNEE|SHIP\s*TO");
    static ref SELLER_HEADER: Regex =
        re(r"(?i)HARDWARES|TRADERS|ENTERPRISES|SELLER|OUR\s*GSTIN");

    // Span refinement once a GSTIN block is classified: tighten the raw
    // header-to-value span around the party name and address.
    static ref SELLER_NAME_REFINE: Regex = re(
        r"(?i)([^\n]+(?:HARDWARES|TRADERS|ENTERPRISES|PVT\.?\s*LTD\.?)[^\n]*)\s*\n{1,2}(?:[^\n]*\n){0,3}GSTIN"
    );
    static ref BILL_TO_REFINE: Regex =
        re(r"(?is)(BUYER\s*\(\s*BILL\s*TO\s*\):?\s*.*?)\s*GSTIN");
    static ref SHIP_TO_REFINE: Regex =
        re(r"(?is)(CONSIGNEE\s*\(\s*SHIP\s*TO\s*\):?\s*.*?)\s*GSTIN");

    // Whole-document fallbacks for regions the spatial pass missed.
    static ref INVOICE_NO_FALLBACK: Regex = re(
        r"(?i)(?:INVOICE\s*NO\.?|INVOICE\s*#|INV\.?\s*NO\.?|BILL\s*NO\.?)\s*([A-Z0-9/.\-]{5,20})"
    );
    static ref INVOICE_DATE_FALLBACK: Regex =
        re(r"(?i)DATED\s+(\d{1,2}\s*-\s*[A-Za-z]+\s*-\s*\d{2})");
    static ref SELLER_INFO_FALLBACK: Regex = re(
        r"(?i)([^\n]+(?:HARDWARES|TRADERS|ENTERPRISES|PVT\.?\s*LTD\.?)[^\n]*)\s*\n{1,2}(?:[^\n]*\n){0,3}GSTIN\s*/\s*UIN\s*:\s*[A-Z0-9]{15}"
    );
    static ref BILL_TO_FALLBACK: Regex =
        re(r"(?is)BUYER\s*\(\s*BILL\s*TO\s*\):?\s*(.*?)\s*GSTIN\s*/\s*UIN\s*:\s*[A-Z0-9]{15}");
    static ref SHIP_TO_FALLBACK: Regex = re(
        r"(?is)CONSIGNEE\s*\(\s*SHIP\s*TO\s*\):?\s*(.*?)\s*GSTIN\s*/\s*UIN\s*:\s*[A-Z0-9]{15}"
    );
    static ref TOTAL_TAX_FALLBACK: Regex =
        re(r"(?i)TOTAL\s+TAX\s*AMOUNT\s+([\d,]+\.\d{2})");
    static ref GRAND_TOTAL_FALLBACK: Regex = re(
        r"(?i)AMOUNT\s*CHARGEABLE\s*\(\s*IN\s*WORDS\s*\)\s+INDIAN\s*RUPEE\s*([A-Za-z\s]+)\s*ONLY"
    );

    // A line item table ends where the summary section begins.
    static ref SUMMARY_MARKERS: Vec<Regex> = vec![
        re(r"(?i)TOTAL\s*TAXABLE\s*VALUE"),
        re(r"(?i)TOTAL\s*TAX\s*AMOUNT"),
        re(r"(?i)AMOUNT\s*CHARGEABLE\s*\(\s*IN\s*WORDS\s*\)"),
        re(r"(?i)GRAND\s*TOTAL"),
        re(r"(?i)DECLARATION"),
        re(r"(?i)E\.\s*&\s*O\.\s*E"),
    ];
}

/// Spatial region matcher parameterized by distance thresholds.
pub struct RegionMatcher<'a> {
    config: &'a SpatialConfig,
}

impl<'a> RegionMatcher<'a> {
    pub fn new(config: &'a SpatialConfig) -> Self {
        Self { config }
    }

    /// Locate one span per region. Unmatched regions are absent from the
    /// result, never present with an empty span.
    pub fn find_matches(&self, words: &[Word], full_text: &str) -> HashMap<Region, Span> {
        let mut matches = HashMap::new();

        self.match_invoice_no(words, &mut matches);
        self.match_labeled_value(words, Region::InvoiceDate, &DATE_LABEL, &DATE_VALUE, &mut matches);
        self.match_labeled_value(words, Region::TotalTax, &TOTAL_TAX_LABEL, &AMOUNT_VALUE, &mut matches);
        self.match_labeled_value(
            words,
            Region::GrandTotal,
            &GRAND_TOTAL_LABEL,
            &AMOUNT_VALUE,
            &mut matches,
        );
        self.match_gstin_blocks(words, full_text, &mut matches);
        self.match_line_item_table(words, full_text, &mut matches);
        self.apply_fallbacks(full_text, &mut matches);

        matches
    }

    /// Invoice number: any word containing an "Invoice" label paired with
    /// the nearest value-shaped word, under the tighter threshold.
    fn match_invoice_no(&self, words: &[Word], matches: &mut HashMap<Region, Span>) {
        let values: Vec<&Word> = words
            .iter()
            .filter(|w| INVOICE_NO_VALUE.is_match(&w.text) && !INVOICE_NO_LABEL.is_match(&w.text))
            .collect();

        for label in words.iter().filter(|w| INVOICE_NO_LABEL.is_match(&w.text)) {
            let Some((value, dist)) = nearest(label.center(), &values) else {
                continue;
            };
            if dist < self.config.invoice_no_max_dist {
                matches.insert(Region::InvoiceNo, combined_span(label, value));
                break;
            }
        }
    }

    fn match_labeled_value(
        &self,
        words: &[Word],
        region: Region,
        label_re: &Regex,
        value_re: &Regex,
        matches: &mut HashMap<Region, Span>,
    ) {
        let pairs = match_label_to_value(words, label_re, value_re, self.config.default_max_dist);
        if let Some(&(label, value)) = pairs.first() {
            matches.insert(region, combined_span(label, value));
        }
    }

    /// GSTIN blocks: pair each GSTIN label with its nearest 15-character
    /// value, then classify the block by the topmost header word sitting
    /// above the value within the horizontal alignment range.
    fn match_gstin_blocks(
        &self,
        words: &[Word],
        full_text: &str,
        matches: &mut HashMap<Region, Span>,
    ) {
        let values: Vec<&Word> = words.iter().filter(|w| GSTIN_VALUE.is_match(&w.text)).collect();

        for label in words.iter().filter(|w| GSTIN_LABEL.is_match(&w.text)) {
            let Some((value, dist)) = nearest(label.center(), &values) else {
                continue;
            };
            if dist >= self.config.gstin_max_dist {
                continue;
            }

            let value_cx = value.center().0;
            let mut headers: Vec<(Region, &Word)> = Vec::new();
            for w in words {
                let above = w.bbox[3] < value.bbox[1];
                let aligned = (w.center().0 - value_cx).abs() < self.config.header_horizontal_range;
                if !(above && aligned) {
                    continue;
                }

                if BUYER_HEADER.is_match(&w.text) && !matches.contains_key(&Region::BillTo) {
                    headers.push((Region::BillTo, w));
                } else if SHIP_HEADER.is_match(&w.text) && !matches.contains_key(&Region::ShipTo) {
                    headers.push((Region::ShipTo, w));
                } else if !matches.contains_key(&Region::SellerInfo)
                    && (SELLER_HEADER.is_match(&w.text) || w.bbox[1] < label.bbox[1])
                {
                    headers.push((Region::SellerInfo, w));
                }
            }

            // Topmost header decides the block.
            headers.sort_by_key(|(_, w)| w.bbox[1]);

            for (region, header) in headers {
                if matches.contains_key(&region) {
                    continue;
                }

                let span = combined_span(header, value);
                let refine_re = match region {
                    Region::SellerInfo => &*SELLER_NAME_REFINE,
                    Region::BillTo => &*BILL_TO_REFINE,
                    Region::ShipTo => &*SHIP_TO_REFINE,
                    _ => unreachable!("only party regions come from GSTIN blocks"),
                };
                let refined = refine(refine_re, full_text, span.0);
                matches.insert(region, refined.unwrap_or(span));
                break;
            }
        }
    }

    /// Line item table: from the topmost header-keyword word down to the
    /// earliest summary marker after it. A table with no summary section
    /// below it stays unmatched.
    fn match_line_item_table(
        &self,
        words: &[Word],
        full_text: &str,
        matches: &mut HashMap<Region, Span>,
    ) {
        let mut header_words: Vec<&Word> = words
            .iter()
            .filter(|w| TABLE_HEADER_KEYWORD.is_match(&w.text))
            .collect();
        if header_words.is_empty() {
            return;
        }

        header_words.sort_by_key(|w| w.bbox[1]);
        let table_start = header_words[0].start_char_idx;

        if let Some(table_end) = summary_section_start(full_text, table_start) {
            matches.insert(Region::LineItemTable, (table_start, table_end));
        } else {
            debug!("table header found but no summary marker below it");
        }
    }

    fn apply_fallbacks(&self, full_text: &str, matches: &mut HashMap<Region, Span>) {
        for region in Region::ALL {
            if matches.contains_key(&region) {
                continue;
            }

            let span = match region {
                // The span ends with the captured number, not the match.
                Region::InvoiceNo => INVOICE_NO_FALLBACK.captures(full_text).and_then(|c| {
                    let number = c.get(1)?;
                    Some((c.get(0)?.start(), number.end()))
                }),
                Region::InvoiceDate => whole_match(&INVOICE_DATE_FALLBACK, full_text),
                Region::SellerInfo => whole_match(&SELLER_INFO_FALLBACK, full_text),
                Region::BillTo => whole_match(&BILL_TO_FALLBACK, full_text),
                Region::ShipTo => whole_match(&SHIP_TO_FALLBACK, full_text),
                Region::TotalTax => whole_match(&TOTAL_TAX_FALLBACK, full_text),
                Region::GrandTotal => whole_match(&GRAND_TOTAL_FALLBACK, full_text),
                Region::LineItemTable => TABLE_HEADER_KEYWORD
                    .find(full_text)
                    .and_then(|m| Some((m.start(), summary_section_start(full_text, m.start())?))),
            };

            if let Some(span) = span {
                debug!("region {region} matched by document-level fallback");
                matches.insert(region, span);
            }
        }
    }
}

/// Span covering two words, whichever order they appear in the text.
fn combined_span(a: &Word, b: &Word) -> Span {
    (
        a.start_char_idx.min(b.start_char_idx),
        a.end_char_idx.max(b.end_char_idx),
    )
}

fn whole_match(re: &Regex, full_text: &str) -> Option<Span> {
    re.find(full_text).map(|m| (m.start(), m.end()))
}

/// Replace a raw span with the capture group of `re` applied from the span
/// start onward.
fn refine(re: &Regex, full_text: &str, base: usize) -> Option<Span> {
    let group = re.captures(&full_text[base..])?.get(1)?;
    Some((base + group.start(), base + group.end()))
}

/// Byte offset of the earliest summary marker strictly after `after`.
fn summary_section_start(full_text: &str, after: usize) -> Option<usize> {
    SUMMARY_MARKERS
        .iter()
        .flat_map(|re| re.find_iter(full_text))
        .map(|m| m.start())
        .filter(|&start| start > after)
        .min()
}
