use serde::{Deserialize, Serialize};

use crate::validation::has_min_chars;

use super::section::{FieldError, SectionContext, SectionKind, SectionModel};

pub const DEFAULT_TAX_PERCENTAGE: f64 = 18.0;

/// Amounts and tax settings of the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialDetails {
    pub invoice_number: String,
    /// Professional fee.
    pub commercials: f64,
    pub reimbursement: f64,
    pub is_tax_applicable: bool,
    pub tax_id: String,
    pub tax_percentage: f64,
}

impl Default for FinancialDetails {
    fn default() -> Self {
        Self {
            invoice_number: String::new(),
            commercials: 0.0,
            reimbursement: 0.0,
            is_tax_applicable: false,
            tax_id: String::new(),
            tax_percentage: DEFAULT_TAX_PERCENTAGE,
        }
    }
}

impl FinancialDetails {
    pub fn totals(&self) -> Totals {
        compute_totals(
            self.commercials,
            self.reimbursement,
            self.is_tax_applicable,
            self.tax_percentage,
        )
    }

    /// Replaces NaN and infinite amounts with `0` so the record survives a
    /// JSON round trip. Finite values, negative ones included, are kept for
    /// validation to report.
    pub fn with_finite_amounts(mut self) -> Self {
        for value in [
            &mut self.commercials,
            &mut self.reimbursement,
            &mut self.tax_percentage,
        ] {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        self
    }
}

/// Derived amounts; never stored as a source of truth.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub tax_amount: f64,
    pub total_amount: f64,
}

/// Computes the tax line and grand total.
///
/// Tax applies to the professional fee only; reimbursement is passed
/// through untaxed. Inputs are sanitized with [`sanitize_amount`] so a
/// stray negative or NaN never leaks into the total.
pub fn compute_totals(
    commercials: f64,
    reimbursement: f64,
    is_tax_applicable: bool,
    tax_percentage: f64,
) -> Totals {
    let commercials = sanitize_amount(commercials);
    let reimbursement = sanitize_amount(reimbursement);
    let tax_amount = if is_tax_applicable {
        commercials * sanitize_amount(tax_percentage) / 100.0
    } else {
        0.0
    };
    Totals {
        tax_amount,
        total_amount: commercials + reimbursement + tax_amount,
    }
}

/// Coerces raw text-field input into an amount: anything that is not a
/// finite, non-negative number becomes `0`.
pub fn coerce_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map(sanitize_amount)
        .unwrap_or(0.0)
}

/// Clamps an amount for display and arithmetic: non-finite and negative
/// values become `0`.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl SectionModel for FinancialDetails {
    const KIND: SectionKind = SectionKind::Financial;
    const FIELDS: &'static [&'static str] = &[
        "invoiceNumber",
        "commercials",
        "reimbursement",
        "isTaxApplicable",
        "taxId",
        "taxPercentage",
    ];

    fn field_errors(&self, _ctx: &SectionContext<'_>) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !has_min_chars(&self.invoice_number, 1) {
            errors.push(FieldError::new("invoiceNumber", "Invoice number is required"));
        }
        if !(self.commercials.is_finite() && self.commercials > 0.0) {
            errors.push(FieldError::new(
                "commercials",
                "Professional fee must be greater than zero",
            ));
        }
        if !(self.reimbursement.is_finite() && self.reimbursement >= 0.0) {
            errors.push(FieldError::new(
                "reimbursement",
                "Reimbursement must be zero or positive",
            ));
        }
        if self.is_tax_applicable && !has_min_chars(&self.tax_id, 1) {
            errors.push(FieldError::new(
                "taxId",
                "Tax registration number is required when tax applies",
            ));
        }
        if !(self.tax_percentage.is_finite() && self.tax_percentage >= 0.0) {
            errors.push(FieldError::new(
                "taxPercentage",
                "Tax percentage must be zero or positive",
            ));
        }
        errors
    }
}
