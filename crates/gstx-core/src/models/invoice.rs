//! Structured invoice field models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured fields extracted from one invoice.
///
/// Every field is independently nullable. A field that no pattern matched is
/// `None`; this is a normal, frequent outcome and never an error. Fields are
/// derived fresh on every parse call; line items are fully replaced, never
/// merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceFields {
    /// Invoice number/identifier as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Invoice date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,

    /// Seller GSTIN (15-character tax ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_gstin: Option<String>,

    /// Buyer name from the bill-to/consignee section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,

    /// Buyer GSTIN, always distinct from the seller GSTIN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_gstin: Option<String>,

    /// Total tax amount (CGST + SGST + IGST when broken out).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tax: Option<Decimal>,

    /// Grand total payable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grand_total: Option<Decimal>,

    /// Line items in invoice order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,
}

impl InvoiceFields {
    /// Check whether nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.invoice_date.is_none()
            && self.seller_gstin.is_none()
            && self.buyer_name.is_none()
            && self.buyer_gstin.is_none()
            && self.total_tax.is_none()
            && self.grand_total.is_none()
            && self.line_items.is_empty()
    }

    /// Names of scalar fields that resolved to null.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.invoice_number.is_none() {
            missing.push("invoice_number");
        }
        if self.invoice_date.is_none() {
            missing.push("invoice_date");
        }
        if self.seller_gstin.is_none() {
            missing.push("seller_gstin");
        }
        if self.buyer_name.is_none() {
            missing.push("buyer_name");
        }
        if self.buyer_gstin.is_none() {
            missing.push("buyer_gstin");
        }
        if self.total_tax.is_none() {
            missing.push("total_tax");
        }
        if self.grand_total.is_none() {
            missing.push("grand_total");
        }
        missing
    }
}

/// A single line item on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service description.
    pub description: String,

    /// HSN/SAC classification code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsn_sac: Option<String>,

    /// Quantity.
    pub quantity: Decimal,

    /// Unit rate.
    pub rate: Decimal,

    /// Taxable value for this line.
    pub taxable_value: Decimal,

    /// Tax percentage if printed on the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_percentage: Option<Decimal>,

    /// Tax amount if printed on the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,

    /// Line total.
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields() {
        let fields = InvoiceFields::default();
        assert!(fields.is_empty());
        assert_eq!(fields.missing_fields().len(), 7);
    }

    #[test]
    fn test_null_fields_skipped_in_json() {
        let fields = InvoiceFields {
            invoice_number: Some("SHB/456/20".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"invoice_number":"SHB/456/20"}"#);
    }
}
