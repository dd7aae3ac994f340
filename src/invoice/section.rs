use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BankDetails, CampaignInfo, FinancialDetails, InfluencerProfile};

/// The four ordered data-entry groups of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Influencer,
    Campaign,
    Financial,
    Bank,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Influencer,
        SectionKind::Campaign,
        SectionKind::Financial,
        SectionKind::Bank,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Influencer => "Influencer Details",
            SectionKind::Campaign => "Campaign Details",
            SectionKind::Financial => "Financial Details",
            SectionKind::Bank => "Bank Details",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inline validation failure attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field failures collected for a section on submit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{section} has {} invalid field(s)", .errors.len())]
pub struct SectionErrors {
    pub section: SectionKind,
    pub errors: Vec<FieldError>,
}

impl SectionErrors {
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|err| err.field == field)
    }
}

/// Cross-section knowledge handed to a section by the wizard controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionContext<'a> {
    /// Influencer full name that the bank account holder must match.
    pub payee_name: Option<&'a str>,
}

/// Shared validation contract of the four section records.
pub trait SectionModel {
    const KIND: SectionKind;

    /// Field keys in entry order.
    const FIELDS: &'static [&'static str];

    /// Every failing field, in entry order.
    fn field_errors(&self, ctx: &SectionContext<'_>) -> Vec<FieldError>;

    /// Single-field check performed when the user leaves that field.
    fn check_field(&self, field: &str, ctx: &SectionContext<'_>) -> Option<FieldError> {
        self.field_errors(ctx)
            .into_iter()
            .find(|err| err.field == field)
    }

    fn is_valid(&self, ctx: &SectionContext<'_>) -> bool {
        self.field_errors(ctx).is_empty()
    }

    /// Submit-time gate; failures are returned as data, never raised.
    fn validate(&self, ctx: &SectionContext<'_>) -> Result<(), SectionErrors> {
        let errors = self.field_errors(ctx);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SectionErrors {
                section: Self::KIND,
                errors,
            })
        }
    }
}

/// A finalized section payload handed to the controller on completion.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    Influencer(InfluencerProfile),
    Campaign(CampaignInfo),
    Financial(FinancialDetails),
    Bank(BankDetails),
}

impl SectionData {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionData::Influencer(_) => SectionKind::Influencer,
            SectionData::Campaign(_) => SectionKind::Campaign,
            SectionData::Financial(_) => SectionKind::Financial,
            SectionData::Bank(_) => SectionKind::Bank,
        }
    }

    pub fn validate(&self, ctx: &SectionContext<'_>) -> Result<(), SectionErrors> {
        match self {
            SectionData::Influencer(data) => data.validate(ctx),
            SectionData::Campaign(data) => data.validate(ctx),
            SectionData::Financial(data) => data.validate(ctx),
            SectionData::Bank(data) => data.validate(ctx),
        }
    }
}
