//! Invoice date extraction.

use chrono::NaiveDate;
use tracing::debug;

use super::find_first_match;
use super::patterns::INVOICE_DATE;

/// Supported date formats, tried in order. Numeric day/month/year only;
/// month-name dates ("20-Dec-20") are a known gap carried over from the
/// source templates and resolve to null.
pub const DATE_FORMATS: [&str; 6] = [
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
];

/// Parse a matched date string with the format cascade. First success wins;
/// an unparseable string yields `None`, never an error.
pub fn parse_date_str(date_str: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, fmt) {
            return Some(date);
        }
    }
    debug!("could not parse date string: {date_str}");
    None
}

/// Extract the invoice date from text lines via the labeled-date cascade.
pub fn extract_invoice_date(lines: &[String]) -> Option<NaiveDate> {
    find_first_match(lines, &INVOICE_DATE).and_then(|s| parse_date_str(&s))
}
