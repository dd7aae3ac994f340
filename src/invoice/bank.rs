use serde::{Deserialize, Serialize};

use crate::validation::{
    has_min_chars, is_valid_account_number, is_valid_national_tax_id, is_valid_routing_code,
};

use super::section::{FieldError, SectionContext, SectionKind, SectionModel};

/// Account the payment is made to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    pub account_holder_name: String,
    pub account_number: String,
    pub confirm_account_number: String,
    pub bank_name: String,
    pub routing_code: String,
    pub national_tax_id: String,
    pub branch_name: String,
}

impl BankDetails {
    /// Byte-for-byte comparison of the holder name against the payee.
    pub fn holder_matches(&self, payee_name: &str) -> bool {
        self.account_holder_name == payee_name
    }
}

impl SectionModel for BankDetails {
    const KIND: SectionKind = SectionKind::Bank;
    const FIELDS: &'static [&'static str] = &[
        "accountHolderName",
        "accountNumber",
        "confirmAccountNumber",
        "bankName",
        "routingCode",
        "nationalTaxId",
        "branchName",
    ];

    fn field_errors(&self, ctx: &SectionContext<'_>) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !has_min_chars(&self.account_holder_name, 2) {
            errors.push(FieldError::new(
                "accountHolderName",
                "Account holder name is required",
            ));
        } else if let Some(payee) = ctx.payee_name {
            if !self.holder_matches(payee) {
                errors.push(FieldError::new(
                    "accountHolderName",
                    "Account holder name must match the influencer's full name",
                ));
            }
        }
        if !is_valid_account_number(&self.account_number) {
            errors.push(FieldError::new(
                "accountNumber",
                "Account number must be 9 to 18 digits",
            ));
        }
        if self.confirm_account_number != self.account_number {
            errors.push(FieldError::new(
                "confirmAccountNumber",
                "Account numbers do not match",
            ));
        }
        if !has_min_chars(&self.bank_name, 2) {
            errors.push(FieldError::new("bankName", "Bank name is required"));
        }
        if !is_valid_routing_code(&self.routing_code) {
            errors.push(FieldError::new("routingCode", "Invalid IFSC code format"));
        }
        if !is_valid_national_tax_id(&self.national_tax_id) {
            errors.push(FieldError::new("nationalTaxId", "Invalid PAN card format"));
        }
        if !has_min_chars(&self.branch_name, 2) {
            errors.push(FieldError::new("branchName", "Branch name is required"));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> BankDetails {
        BankDetails {
            account_holder_name: "Asha Rao".into(),
            account_number: "123456789012".into(),
            confirm_account_number: "123456789012".into(),
            bank_name: "HDFC Bank".into(),
            routing_code: "HDFC0001234".into(),
            national_tax_id: "ABCDE1234F".into(),
            branch_name: "Koregaon Park".into(),
        }
    }

    fn payee(name: &str) -> SectionContext<'_> {
        SectionContext {
            payee_name: Some(name),
        }
    }

    #[test]
    fn matching_holder_passes() {
        assert!(bank().validate(&payee("Asha Rao")).is_ok());
    }

    #[test]
    fn short_account_number_blocks_completion() {
        let mut details = bank();
        details.account_number = "12345".into();
        details.confirm_account_number = "12345".into();
        let errors = details.validate(&payee("Asha Rao")).unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert!(errors.for_field("accountNumber").is_some());
    }

    #[test]
    fn confirmation_must_equal_account_number() {
        let mut details = bank();
        details.confirm_account_number = "123456789013".into();
        let err = details
            .check_field("confirmAccountNumber", &payee("Asha Rao"))
            .unwrap();
        assert_eq!(err.message, "Account numbers do not match");
    }

    #[test]
    fn holder_must_match_payee_exactly() {
        let details = bank();
        for other in ["asha rao", "Asha Rao ", " Asha Rao", "Asha  Rao"] {
            assert!(
                details.check_field("accountHolderName", &payee(other)).is_some(),
                "{other:?} should not match"
            );
        }
    }

    #[test]
    fn without_payee_only_format_rules_apply() {
        let mut details = bank();
        details.account_holder_name = "Someone Else".into();
        assert!(details.validate(&SectionContext::default()).is_ok());
    }
}
