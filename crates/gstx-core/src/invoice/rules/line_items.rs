//! Line item extraction: geometry tables first, per-line regex fallback.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::parse_amount;
use super::patterns::LINE_ITEM_ROW;
use crate::models::invoice::LineItem;
use crate::ocr::tree::Page;

/// Read line items from explicit table structures in the OCR geometry.
///
/// Columns map positionally: description, quantity, rate, taxable value,
/// total. A row is accepted whenever its description cell is non-empty;
/// numeric cells that fail conversion degrade to zero, matching the
/// tolerant treatment OCR'd table cells need.
pub fn extract_from_tables(pages: &[Page]) -> Vec<LineItem> {
    let mut items = Vec::new();

    let Some(first_page) = pages.first() else {
        return items;
    };

    for table in &first_page.tables {
        for row in &table.rows {
            let cells = &row.cells;
            let description = cells.first().map(|c| c.text()).unwrap_or_default();
            if description.is_empty() {
                continue;
            }

            let cell_amount = |idx: usize| -> Decimal {
                cells
                    .get(idx)
                    .and_then(|c| parse_amount(&c.text()))
                    .unwrap_or(Decimal::ZERO)
            };

            items.push(LineItem {
                description,
                hsn_sac: None,
                quantity: cell_amount(1),
                rate: cell_amount(2),
                taxable_value: cell_amount(3),
                tax_percentage: None,
                tax_amount: None,
                total: cell_amount(4),
            });
        }
    }

    if !items.is_empty() {
        info!("parsed {} line items from geometry tables", items.len());
    }
    items
}

/// Parse line items from text lines with the combined row regex.
///
/// Every numeric group is converted individually; if any required group
/// fails conversion the whole line is skipped, never partially recorded.
pub fn extract_from_lines(lines: &[String]) -> Vec<LineItem> {
    let mut items = Vec::new();

    for line in lines {
        let Some(caps) = LINE_ITEM_ROW.captures(line) else {
            continue;
        };

        let parsed = (|| {
            Some(LineItem {
                description: caps[2].trim().to_string(),
                hsn_sac: caps.get(3).map(|m| m.as_str().trim().to_string()),
                quantity: parse_amount(&caps[4])?,
                rate: parse_amount(&caps[5])?,
                taxable_value: parse_amount(&caps[6])?,
                tax_percentage: caps.get(7).and_then(|m| parse_amount(m.as_str())),
                tax_amount: None,
                total: parse_amount(&caps[8])?,
            })
        })();

        match parsed {
            Some(item) => items.push(item),
            None => debug!("skipping unparseable line item row: {line}"),
        }
    }

    debug!("parsed {} line items via regex fallback", items.len());
    items
}
