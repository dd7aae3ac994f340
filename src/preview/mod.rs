//! Printable projection of an invoice draft.
//!
//! [`build_document`] never mutates the draft and never leaves a field
//! blank: every absent value is replaced by a placeholder. Amounts stay as
//! raw numbers until [`render_text`] formats them.

mod render;

use chrono::NaiveDate;

use crate::invoice::{compute_totals, sanitize_amount, InvoiceDraft};

pub use render::{format_money, render_text};

pub const DOCUMENT_TITLE: &str = "INFLUENCER INVOICE";
pub const DATE_FORMAT: &str = "%d %b %Y";

const INVOICE_NUMBER_PLACEHOLDER: &str = "INV-001";
const PAYEE_PLACEHOLDER: &str = "Influencer Name";
const PROFILE_PLACEHOLDER: &str = "https://example.com/profile";
const BRAND_PLACEHOLDER: &str = "Brand Name";
const PRODUCT_PLACEHOLDER: &str = "Product Name";
const DESCRIPTION_PLACEHOLDER: &str = "Campaign description would appear here.";
const HOLDER_PLACEHOLDER: &str = "Account Holder Name";
const ACCOUNT_PLACEHOLDER: &str = "XXXXXXXXXXXX";
const BANK_PLACEHOLDER: &str = "Bank Name";
const BRANCH_PLACEHOLDER: &str = "Branch Name";
const ROUTING_PLACEHOLDER: &str = "IFSC0000000";

pub const TERMS: [&str; 2] = [
    "1. Payment due within 30 days of invoice date.",
    "2. Please include invoice number in payment reference.",
];
pub const FOOTER: &str = "This is a computer-generated invoice and does not require a signature.";

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    pub header: DocumentHeader,
    pub from: Party,
    pub bill_to: Party,
    pub line_items: Vec<LineItem>,
    pub payment: PaymentBlock,
    pub terms: Vec<String>,
    pub footer: String,
}

impl InvoiceDocument {
    pub fn total(&self) -> f64 {
        self.line_items
            .iter()
            .find(|item| item.kind == LineKind::Total)
            .map(|item| item.amount)
            .unwrap_or(0.0)
    }

    pub fn item(&self, kind: LineKind) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    pub invoice_number: String,
    pub title: String,
    /// Generation date, already formatted as `dd Mon yyyy`.
    pub date: String,
    pub payee: String,
}

/// One side of the From / Bill-To block: a heading line plus detail lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub name: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Commercials,
    Reimbursement,
    Tax,
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub kind: LineKind,
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentBlock {
    pub account_holder: String,
    pub account_number: String,
    pub bank_name: String,
    pub branch: String,
    pub routing_code: String,
}

impl PaymentBlock {
    pub fn rows(&self) -> [(&'static str, &str); 5] {
        [
            ("Account Holder", &self.account_holder),
            ("Account Number", &self.account_number),
            ("Bank Name", &self.bank_name),
            ("Branch", &self.branch),
            ("IFSC Code", &self.routing_code),
        ]
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn build_document(draft: &InvoiceDraft, generated_on: NaiveDate) -> InvoiceDocument {
    let influencer = &draft.influencer;
    let campaign = &draft.campaign;
    let financial = &draft.financial;
    let bank = &draft.bank;

    let payee = or_placeholder(&influencer.full_name, PAYEE_PLACEHOLDER);
    let header = DocumentHeader {
        invoice_number: format!(
            "#{}",
            or_placeholder(&financial.invoice_number, INVOICE_NUMBER_PLACEHOLDER)
        ),
        title: DOCUMENT_TITLE.to_string(),
        date: generated_on.format(DATE_FORMAT).to_string(),
        payee: payee.clone(),
    };

    let mut from_lines = vec![format!(
        "Profile: {}",
        or_placeholder(&campaign.profile_link, PROFILE_PLACEHOLDER)
    )];
    if !bank.national_tax_id.trim().is_empty() {
        from_lines.push(format!("PAN: {}", bank.national_tax_id.trim()));
    }
    if financial.is_tax_applicable && !financial.tax_id.trim().is_empty() {
        from_lines.push(format!("GST: {}", financial.tax_id.trim()));
    }
    let from = Party {
        name: payee,
        lines: from_lines,
    };

    let bill_to = Party {
        name: or_placeholder(&campaign.brand_name, BRAND_PLACEHOLDER),
        lines: vec![
            or_placeholder(&campaign.product_name, PRODUCT_PLACEHOLDER),
            or_placeholder(
                campaign.description.as_deref().unwrap_or_default(),
                DESCRIPTION_PLACEHOLDER,
            ),
        ],
    };

    let totals = compute_totals(
        financial.commercials,
        financial.reimbursement,
        financial.is_tax_applicable,
        financial.tax_percentage,
    );
    let mut line_items = vec![LineItem {
        kind: LineKind::Commercials,
        label: "Commercials".into(),
        amount: sanitize_amount(financial.commercials),
    }];
    let reimbursement = sanitize_amount(financial.reimbursement);
    if reimbursement > 0.0 {
        line_items.push(LineItem {
            kind: LineKind::Reimbursement,
            label: "Reimbursement".into(),
            amount: reimbursement,
        });
    }
    if financial.is_tax_applicable {
        line_items.push(LineItem {
            kind: LineKind::Tax,
            label: format!("GST ({}%)", sanitize_amount(financial.tax_percentage)),
            amount: totals.tax_amount,
        });
    }
    line_items.push(LineItem {
        kind: LineKind::Total,
        label: "Total".into(),
        amount: draft.total_amount,
    });

    let payment = PaymentBlock {
        account_holder: or_placeholder(&bank.account_holder_name, HOLDER_PLACEHOLDER),
        account_number: or_placeholder(&bank.account_number, ACCOUNT_PLACEHOLDER),
        bank_name: or_placeholder(&bank.bank_name, BANK_PLACEHOLDER),
        branch: or_placeholder(&bank.branch_name, BRANCH_PLACEHOLDER),
        routing_code: or_placeholder(&bank.routing_code, ROUTING_PLACEHOLDER),
    };

    InvoiceDocument {
        header,
        from,
        bill_to,
        line_items,
        payment,
        terms: TERMS.iter().map(|term| term.to_string()).collect(),
        footer: FOOTER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{BankDetails, FinancialDetails, InfluencerProfile};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()
    }

    #[test]
    fn empty_draft_renders_placeholders() {
        let doc = build_document(&InvoiceDraft::new(), date());
        assert_eq!(doc.header.invoice_number, "#INV-001");
        assert_eq!(doc.header.date, "02 Apr 2025");
        assert_eq!(doc.from.name, "Influencer Name");
        assert_eq!(doc.bill_to.name, "Brand Name");
        assert_eq!(
            doc.bill_to.lines,
            vec![
                "Product Name".to_string(),
                "Campaign description would appear here.".to_string()
            ]
        );
        assert_eq!(doc.payment.account_number, "XXXXXXXXXXXX");
        assert_eq!(doc.payment.routing_code, "IFSC0000000");
        let kinds: Vec<_> = doc.line_items.iter().map(|item| item.kind).collect();
        assert_eq!(kinds, vec![LineKind::Commercials, LineKind::Total]);
    }

    #[test]
    fn taxed_invoice_lists_every_line() {
        let mut draft = InvoiceDraft::new();
        draft.influencer = InfluencerProfile::new("Asha Rao", "12 MG Road", "9876543210");
        draft.financial = FinancialDetails {
            invoice_number: "INV-7".into(),
            commercials: 25000.0,
            reimbursement: 2500.0,
            is_tax_applicable: true,
            tax_id: "27ABCDE1234F1Z5".into(),
            tax_percentage: 18.0,
        };
        draft.bank = BankDetails {
            national_tax_id: "ABCDE1234F".into(),
            ..BankDetails::default()
        };
        draft.refresh_total();

        let doc = build_document(&draft, date());
        assert_eq!(doc.header.invoice_number, "#INV-7");
        assert_eq!(doc.header.payee, "Asha Rao");
        let kinds: Vec<_> = doc.line_items.iter().map(|item| item.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Commercials,
                LineKind::Reimbursement,
                LineKind::Tax,
                LineKind::Total
            ]
        );
        let tax = doc.item(LineKind::Tax).unwrap();
        assert_eq!(tax.label, "GST (18%)");
        assert_eq!(tax.amount, 4500.0);
        assert_eq!(doc.total(), 32000.0);
        assert!(doc.from.lines.contains(&"PAN: ABCDE1234F".to_string()));
        assert!(doc.from.lines.contains(&"GST: 27ABCDE1234F1Z5".to_string()));
    }

    #[test]
    fn non_finite_amounts_render_as_zero() {
        let mut draft = InvoiceDraft::new();
        draft.financial = FinancialDetails {
            commercials: f64::NAN,
            reimbursement: f64::INFINITY,
            is_tax_applicable: true,
            tax_percentage: f64::NAN,
            ..FinancialDetails::default()
        };
        draft.refresh_total();

        let doc = build_document(&draft, date());
        assert_eq!(doc.item(LineKind::Commercials).unwrap().amount, 0.0);
        assert!(doc.item(LineKind::Reimbursement).is_none());
        let tax = doc.item(LineKind::Tax).unwrap();
        assert_eq!(tax.label, "GST (0%)");
        assert_eq!(tax.amount, 0.0);
        assert_eq!(doc.total(), 0.0);
    }

    #[test]
    fn build_leaves_draft_untouched() {
        let mut draft = InvoiceDraft::new();
        draft.financial.commercials = 10.0;
        let before = draft.clone();
        let _ = build_document(&draft, date());
        assert_eq!(draft, before);
    }
}
