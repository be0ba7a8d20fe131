//! GSTIN extraction and shape validation.

use super::find_first_match;
use super::patterns::{BUYER_GSTIN, GSTIN_EXACT, SELLER_GSTIN};

/// Check a candidate against the canonical 15-character GSTIN shape.
pub fn is_valid_gstin(candidate: &str) -> bool {
    GSTIN_EXACT.is_match(candidate)
}

/// Extract the seller GSTIN: labeled variants first, generic label last.
pub fn extract_seller_gstin(lines: &[String]) -> Option<String> {
    find_first_match(lines, &SELLER_GSTIN).filter(|g| is_valid_gstin(g))
}

/// Extract the buyer GSTIN, scanning line by line.
///
/// Buyer-specific labels are tried before the bare GSTIN shape, and any
/// candidate equal to the already-extracted seller GSTIN is skipped so the
/// two fields never collapse onto the same token.
pub fn extract_buyer_gstin(lines: &[String], seller_gstin: Option<&str>) -> Option<String> {
    for line in lines {
        for pattern in BUYER_GSTIN.iter() {
            if let Some(caps) = pattern.captures(line) {
                let candidate = caps[1].trim().to_string();
                if !is_valid_gstin(&candidate) {
                    continue;
                }
                if seller_gstin == Some(candidate.as_str()) {
                    continue;
                }
                return Some(candidate);
            }
        }
    }
    None
}
