use std::fmt::Write;

use super::{InvoiceDocument, LineKind};

const WIDTH: usize = 64;

/// `symbol` followed by the amount with two decimals, e.g. `₹32000.00`.
pub fn format_money(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}

/// Plain-text rendition shared by the terminal preview and the built-in
/// rasterizer.
pub fn render_text(doc: &InvoiceDocument, currency_symbol: &str) -> String {
    let mut out = String::new();
    let rule = "=".repeat(WIDTH);
    let thin = "-".repeat(WIDTH);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "{}",
        spread(&doc.header.invoice_number, &doc.header.title)
    );
    let _ = writeln!(
        out,
        "{}",
        spread(&doc.header.payee, &format!("Date: {}", doc.header.date))
    );
    let _ = writeln!(out, "{}", rule);

    let _ = writeln!(out, "From");
    let _ = writeln!(out, "  {}", doc.from.name);
    for line in &doc.from.lines {
        let _ = writeln!(out, "  {}", line);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "To");
    let _ = writeln!(out, "  {}", doc.bill_to.name);
    for line in &doc.bill_to.lines {
        let _ = writeln!(out, "  {}", line);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Invoice Details");
    let _ = writeln!(out, "{}", spread("Description", "Amount"));
    let _ = writeln!(out, "{}", thin);
    for item in &doc.line_items {
        if item.kind == LineKind::Total {
            let _ = writeln!(out, "{}", thin);
        }
        let _ = writeln!(
            out,
            "{}",
            spread(&item.label, &format_money(currency_symbol, item.amount))
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Payment Details");
    for (label, value) in doc.payment.rows() {
        let _ = writeln!(out, "  {}: {}", label, value);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Terms & Conditions");
    for term in &doc.terms {
        let _ = writeln!(out, "  {}", term);
    }
    let _ = writeln!(out, "{}", thin);
    let _ = writeln!(out, "{}", doc.footer);
    out
}

fn spread(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = WIDTH.saturating_sub(used).max(1);
    format!("{}{}{}", left, " ".repeat(gap), right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{invoice::InvoiceDraft, preview::build_document};
    use chrono::NaiveDate;

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(format_money("₹", 32000.0), "₹32000.00");
        assert_eq!(format_money("$", 1234.5), "$1234.50");
    }

    #[test]
    fn text_contains_every_block() {
        let mut draft = InvoiceDraft::new();
        draft.financial.commercials = 1500.0;
        draft.financial.reimbursement = 250.0;
        draft.refresh_total();
        let doc = build_document(&draft, NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
        let text = render_text(&doc, "₹");

        for needle in [
            "#INV-001",
            "INFLUENCER INVOICE",
            "Date: 09 Jan 2025",
            "From",
            "To",
            "Commercials",
            "₹1500.00",
            "Reimbursement",
            "₹250.00",
            "₹1750.00",
            "Account Number: XXXXXXXXXXXX",
            "1. Payment due within 30 days of invoice date.",
            "does not require a signature.",
        ] {
            assert!(text.contains(needle), "missing {needle:?}");
        }
        assert!(!text.contains("GST"));
    }

    #[test]
    fn spread_keeps_a_gap_for_long_labels() {
        let long = "x".repeat(80);
        assert!(spread(&long, "1").ends_with("x 1"));
    }
}
