use serde::{Deserialize, Serialize};

use crate::validation::has_min_chars;

use super::section::{FieldError, SectionContext, SectionKind, SectionModel};

/// Identity of the influencer issuing the invoice (the payee).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InfluencerProfile {
    pub full_name: String,
    pub address: String,
    pub contact_number: String,
}

impl InfluencerProfile {
    pub fn new(
        full_name: impl Into<String>,
        address: impl Into<String>,
        contact_number: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            address: address.into(),
            contact_number: contact_number.into(),
        }
    }
}

impl SectionModel for InfluencerProfile {
    const KIND: SectionKind = SectionKind::Influencer;
    const FIELDS: &'static [&'static str] = &["fullName", "address", "contactNumber"];

    fn field_errors(&self, _ctx: &SectionContext<'_>) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !has_min_chars(&self.full_name, 2) {
            errors.push(FieldError::new("fullName", "Full name is required"));
        }
        if !has_min_chars(&self.address, 5) {
            errors.push(FieldError::new("address", "Complete address is required"));
        }
        if !has_min_chars(&self.contact_number, 10) {
            errors.push(FieldError::new(
                "contactNumber",
                "Valid contact number is required",
            ));
        }
        errors
    }
}
