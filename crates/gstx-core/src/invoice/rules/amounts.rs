//! Tax and total amount extraction.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use super::find_first_match;
use super::patterns::{
    CGST_AMOUNT, GRAND_TOTAL, GRAND_TOTAL_CURRENCY, IGST_AMOUNT, SGST_AMOUNT, TOTAL_TAX,
};

/// Parse an amount string, stripping thousands-separator commas.
/// Conversion failure degrades to `None`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', "")).ok()
}

/// Extract the total tax amount.
///
/// CGST, SGST, and IGST are matched independently and summed when any of the
/// three is present; only if none matched does the generic "Total Tax"/"Tax
/// Amount" cascade run. Returns `None`, not zero, when nothing matches.
pub fn extract_total_tax(lines: &[String]) -> Option<Decimal> {
    let mut sum: Option<Decimal> = None;

    for component in [&*CGST_AMOUNT, &*SGST_AMOUNT, &*IGST_AMOUNT] {
        let found = find_first_match(lines, std::slice::from_ref(component))
            .and_then(|s| parse_amount(&s));
        if let Some(value) = found {
            sum = Some(sum.unwrap_or(Decimal::ZERO) + value);
        }
    }

    if sum.is_some() {
        return sum;
    }

    debug!("no GST component amounts found, trying generic tax labels");
    find_first_match(lines, &TOTAL_TAX).and_then(|s| parse_amount(&s))
}

/// Extract the grand total.
///
/// Currency-qualified matches (rupee sign, "Rs.", "INR") are preferred
/// anywhere in the document before any currency-agnostic "Total" label is
/// considered. The currency pass is pattern-major to keep the strongest
/// marker (the rupee sign itself) ahead of weaker ones.
pub fn extract_grand_total(lines: &[String]) -> Option<Decimal> {
    for pattern in GRAND_TOTAL_CURRENCY.iter() {
        for line in lines {
            if let Some(caps) = pattern.captures(line) {
                if let Some(amount) = parse_amount(caps[1].trim()) {
                    return Some(amount);
                }
            }
        }
    }

    find_first_match(lines, &GRAND_TOTAL).and_then(|s| parse_amount(&s))
}
