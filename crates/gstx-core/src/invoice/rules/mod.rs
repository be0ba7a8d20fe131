//! Rule-based field extractors for GST invoices.

pub mod amounts;
pub mod dates;
pub mod gstin;
pub mod line_items;
pub mod patterns;

pub use amounts::{extract_grand_total, extract_total_tax, parse_amount};
pub use dates::{extract_invoice_date, parse_date_str, DATE_FORMATS};
pub use gstin::{extract_buyer_gstin, extract_seller_gstin, is_valid_gstin};
pub use line_items::{extract_from_lines, extract_from_tables};

use regex::Regex;

/// Try every pattern against every line, line-major, and return the first
/// trimmed capture-group hit.
///
/// Line-major order means an early line matching a late pattern beats a late
/// line matching an early pattern; cascades rely on this when invoices put
/// the labeled value near the top of the page.
pub fn find_first_match(lines: &[String], patterns: &[Regex]) -> Option<String> {
    for line in lines {
        for pattern in patterns {
            if let Some(caps) = pattern.captures(line) {
                if let Some(group) = caps.get(1) {
                    return Some(group.as_str().trim().to_string());
                }
            }
        }
    }
    None
}
