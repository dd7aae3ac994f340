//! One form per invoice section.
//!
//! Field answers are checked with the section's own rules as soon as they
//! are entered; `commit` re-validates the whole record so cross-field rules
//! (matching account numbers, tax id when taxed) are enforced too.

use std::collections::BTreeMap;

use crate::invoice::{
    coerce_amount, BankDetails, CampaignInfo, FinancialDetails, InfluencerProfile, Month,
    SectionContext, SectionErrors, SectionModel,
};

use super::{
    ChoiceMapper, FieldDescriptor, FieldKind, FormDescriptor, FormFlow, Validator,
};

/// Validator that runs `S::check_field` on a scratch record holding only the
/// answer for `field`.
fn field_rule<S, F>(field: &'static str, payee: Option<String>, assign: F) -> Validator
where
    S: SectionModel + Default + 'static,
    F: Fn(&mut S, &str) + Send + Sync + 'static,
{
    Validator::custom(move |input| {
        let value = input.trim();
        let mut scratch = S::default();
        assign(&mut scratch, value);
        let ctx = SectionContext {
            payee_name: payee.as_deref(),
        };
        match scratch.check_field(field, &ctx) {
            Some(err) => Err(err.message),
            None => Ok(value.to_string()),
        }
    })
}

fn text_value(values: &BTreeMap<String, String>, key: &str) -> String {
    values.get(key).cloned().unwrap_or_default()
}

fn insert_non_empty(defaults: &mut BTreeMap<String, String>, key: &str, value: &str) {
    if !value.trim().is_empty() {
        defaults.insert(key.to_string(), value.to_string());
    }
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

pub struct InfluencerForm {
    descriptor: FormDescriptor,
    current: InfluencerProfile,
}

impl InfluencerForm {
    pub fn new(current: &InfluencerProfile) -> Self {
        let descriptor = FormDescriptor::new(
            "influencer",
            vec![
                FieldDescriptor::new(
                    "fullName",
                    "Full name",
                    FieldKind::Text,
                    field_rule::<InfluencerProfile, _>("fullName", None, |p, v| {
                        p.full_name = v.into()
                    }),
                )
                .with_help("Must match the bank account holder name exactly."),
                FieldDescriptor::new(
                    "address",
                    "Address",
                    FieldKind::Text,
                    field_rule::<InfluencerProfile, _>("address", None, |p, v| {
                        p.address = v.into()
                    }),
                ),
                FieldDescriptor::new(
                    "contactNumber",
                    "Contact number",
                    FieldKind::Text,
                    field_rule::<InfluencerProfile, _>("contactNumber", None, |p, v| {
                        p.contact_number = v.into()
                    }),
                ),
            ],
        );
        Self {
            descriptor,
            current: current.clone(),
        }
    }
}

impl FormFlow for InfluencerForm {
    type Output = InfluencerProfile;
    type Error = SectionErrors;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        let mut defaults = BTreeMap::new();
        insert_non_empty(&mut defaults, "fullName", &self.current.full_name);
        insert_non_empty(&mut defaults, "address", &self.current.address);
        insert_non_empty(&mut defaults, "contactNumber", &self.current.contact_number);
        defaults
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        let profile = InfluencerProfile::new(
            text_value(&values, "fullName"),
            text_value(&values, "address"),
            text_value(&values, "contactNumber"),
        );
        profile.validate(&SectionContext::default())?;
        Ok(profile)
    }
}

pub struct CampaignForm {
    descriptor: FormDescriptor,
    months: ChoiceMapper<Month>,
    current: CampaignInfo,
}

impl CampaignForm {
    pub fn new(current: &CampaignInfo) -> Self {
        let mut months = ChoiceMapper::from_pairs(
            Month::ALL
                .iter()
                .map(|month| (month.name().to_string(), *month))
                .collect(),
        );
        for month in Month::ALL {
            months.alias(&month.name()[..3], &month);
        }
        let descriptor = FormDescriptor::new(
            "campaign",
            vec![
                FieldDescriptor::new(
                    "pocName",
                    "Brand point of contact",
                    FieldKind::Text,
                    field_rule::<CampaignInfo, _>("pocName", None, |c, v| c.poc_name = v.into()),
                ),
                FieldDescriptor::new(
                    "profileLink",
                    "Profile link",
                    FieldKind::Text,
                    field_rule::<CampaignInfo, _>("profileLink", None, |c, v| {
                        c.profile_link = v.into()
                    }),
                )
                .with_help("Full URL of your social profile, e.g. https://instagram.com/handle"),
                FieldDescriptor::new(
                    "brandName",
                    "Brand name",
                    FieldKind::Text,
                    field_rule::<CampaignInfo, _>("brandName", None, |c, v| {
                        c.brand_name = v.into()
                    }),
                ),
                FieldDescriptor::new(
                    "productName",
                    "Product name",
                    FieldKind::Text,
                    field_rule::<CampaignInfo, _>("productName", None, |c, v| {
                        c.product_name = v.into()
                    }),
                ),
                FieldDescriptor::new(
                    "description",
                    "Description",
                    FieldKind::Text,
                    Validator::None,
                )
                .with_optional(),
                FieldDescriptor::new(
                    "month",
                    "Campaign month",
                    FieldKind::Choice(months.options()),
                    months.validator("month"),
                ),
                FieldDescriptor::new(
                    "year",
                    "Campaign year",
                    FieldKind::Text,
                    field_rule::<CampaignInfo, _>("year", None, |c, v| c.year = v.into()),
                ),
            ],
        );
        Self {
            descriptor,
            months,
            current: current.clone(),
        }
    }
}

impl FormFlow for CampaignForm {
    type Output = CampaignInfo;
    type Error = SectionErrors;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        let current = &self.current;
        let mut defaults = BTreeMap::new();
        insert_non_empty(&mut defaults, "pocName", &current.poc_name);
        insert_non_empty(&mut defaults, "profileLink", &current.profile_link);
        insert_non_empty(&mut defaults, "brandName", &current.brand_name);
        insert_non_empty(&mut defaults, "productName", &current.product_name);
        if let Some(description) = &current.description {
            insert_non_empty(&mut defaults, "description", description);
        }
        if let Some(display) = current
            .month
            .and_then(|month| self.months.display_for_value(&month))
        {
            defaults.insert("month".into(), display);
        }
        insert_non_empty(&mut defaults, "year", &current.year);
        defaults
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        let campaign = CampaignInfo {
            poc_name: text_value(&values, "pocName"),
            profile_link: text_value(&values, "profileLink"),
            brand_name: text_value(&values, "brandName"),
            product_name: text_value(&values, "productName"),
            description: values
                .get("description")
                .filter(|text| !text.trim().is_empty())
                .cloned(),
            month: values
                .get("month")
                .and_then(|display| self.months.value_for_display(display))
                .copied(),
            year: text_value(&values, "year"),
            username: self.current.username.clone(),
        };
        campaign.validate(&SectionContext::default())?;
        Ok(campaign)
    }
}

pub struct FinancialForm {
    descriptor: FormDescriptor,
    current: FinancialDetails,
    default_tax_percentage: f64,
}

impl FinancialForm {
    /// `default_tax_percentage` seeds the rate while the section is untouched.
    pub fn new(current: &FinancialDetails, default_tax_percentage: f64) -> Self {
        let descriptor = FormDescriptor::new(
            "financial",
            vec![
                FieldDescriptor::new(
                    "invoiceNumber",
                    "Invoice number",
                    FieldKind::Text,
                    field_rule::<FinancialDetails, _>("invoiceNumber", None, |f, v| {
                        f.invoice_number = v.into()
                    }),
                ),
                FieldDescriptor::new(
                    "commercials",
                    "Professional fee",
                    FieldKind::Decimal,
                    amount_rule("commercials", |f, amount| f.commercials = amount),
                )
                .with_help("Agreed fee before tax."),
                FieldDescriptor::new(
                    "reimbursement",
                    "Reimbursement",
                    FieldKind::Decimal,
                    amount_rule("reimbursement", |f, amount| f.reimbursement = amount),
                )
                .with_help("Expenses billed back to the brand; not taxed."),
                FieldDescriptor::new(
                    "isTaxApplicable",
                    "Tax applicable",
                    FieldKind::Boolean,
                    Validator::None,
                ),
                FieldDescriptor::new("taxId", "Tax registration number", FieldKind::Text, Validator::None)
                    .with_optional()
                    .with_help("Required when tax applies."),
                FieldDescriptor::new(
                    "taxPercentage",
                    "Tax percentage",
                    FieldKind::Decimal,
                    Validator::custom(|input| {
                        let rate = input
                            .trim()
                            .parse::<f64>()
                            .map_err(|_| "Enter a number".to_string())?;
                        let scratch = FinancialDetails {
                            tax_percentage: rate,
                            ..FinancialDetails::default()
                        };
                        match scratch.check_field("taxPercentage", &SectionContext::default()) {
                            Some(err) => Err(err.message),
                            None => Ok(format_amount(rate)),
                        }
                    }),
                ),
            ],
        );
        Self {
            descriptor,
            current: current.clone(),
            default_tax_percentage,
        }
    }
}

/// Amounts are coerced the way live edits are, then checked.
fn amount_rule<F>(field: &'static str, assign: F) -> Validator
where
    F: Fn(&mut FinancialDetails, f64) + Send + Sync + 'static,
{
    Validator::custom(move |input| {
        let amount = coerce_amount(input);
        let mut scratch = FinancialDetails::default();
        assign(&mut scratch, amount);
        match scratch.check_field(field, &SectionContext::default()) {
            Some(err) => Err(err.message),
            None => Ok(format_amount(amount)),
        }
    })
}

impl FormFlow for FinancialForm {
    type Output = FinancialDetails;
    type Error = SectionErrors;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        let current = &self.current;
        let untouched = *current == FinancialDetails::default();
        let mut defaults = BTreeMap::new();
        insert_non_empty(&mut defaults, "invoiceNumber", &current.invoice_number);
        if current.commercials > 0.0 {
            defaults.insert("commercials".into(), format_amount(current.commercials));
        }
        defaults.insert("reimbursement".into(), format_amount(current.reimbursement));
        defaults.insert("isTaxApplicable".into(), current.is_tax_applicable.to_string());
        insert_non_empty(&mut defaults, "taxId", &current.tax_id);
        let rate = if untouched {
            self.default_tax_percentage
        } else {
            current.tax_percentage
        };
        defaults.insert("taxPercentage".into(), format_amount(rate));
        defaults
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        let details = FinancialDetails {
            invoice_number: text_value(&values, "invoiceNumber"),
            commercials: coerce_amount(&text_value(&values, "commercials")),
            reimbursement: coerce_amount(&text_value(&values, "reimbursement")),
            is_tax_applicable: values
                .get("isTaxApplicable")
                .map(|flag| flag == "true")
                .unwrap_or(false),
            tax_id: text_value(&values, "taxId"),
            tax_percentage: values
                .get("taxPercentage")
                .and_then(|rate| rate.parse::<f64>().ok())
                .unwrap_or(self.default_tax_percentage),
        };
        details.validate(&SectionContext::default())?;
        Ok(details)
    }
}

pub struct BankForm {
    descriptor: FormDescriptor,
    current: BankDetails,
    payee: String,
}

impl BankForm {
    /// `payee` is the influencer full name the holder name must equal.
    pub fn new(current: &BankDetails, payee: &str) -> Self {
        let payee_rule = Some(payee.to_string());
        let descriptor = FormDescriptor::new(
            "bank",
            vec![
                FieldDescriptor::new(
                    "accountHolderName",
                    "Account holder name",
                    FieldKind::Text,
                    field_rule::<BankDetails, _>("accountHolderName", payee_rule, |b, v| {
                        b.account_holder_name = v.into()
                    }),
                )
                .with_help("Must be identical to the influencer full name."),
                FieldDescriptor::new(
                    "accountNumber",
                    "Account number",
                    FieldKind::Text,
                    field_rule::<BankDetails, _>("accountNumber", None, |b, v| {
                        b.account_number = v.into()
                    }),
                ),
                FieldDescriptor::new(
                    "confirmAccountNumber",
                    "Confirm account number",
                    FieldKind::Text,
                    Validator::NonEmpty,
                ),
                FieldDescriptor::new(
                    "bankName",
                    "Bank name",
                    FieldKind::Text,
                    field_rule::<BankDetails, _>("bankName", None, |b, v| b.bank_name = v.into()),
                ),
                FieldDescriptor::new(
                    "routingCode",
                    "IFSC code",
                    FieldKind::Text,
                    field_rule::<BankDetails, _>("routingCode", None, |b, v| {
                        b.routing_code = v.into()
                    }),
                )
                .with_help("Four letters, a zero, then six letters or digits, e.g. HDFC0001234."),
                FieldDescriptor::new(
                    "nationalTaxId",
                    "PAN",
                    FieldKind::Text,
                    field_rule::<BankDetails, _>("nationalTaxId", None, |b, v| {
                        b.national_tax_id = v.into()
                    }),
                )
                .with_help("Five letters, four digits and a letter, e.g. ABCDE1234F."),
                FieldDescriptor::new(
                    "branchName",
                    "Branch name",
                    FieldKind::Text,
                    field_rule::<BankDetails, _>("branchName", None, |b, v| {
                        b.branch_name = v.into()
                    }),
                ),
            ],
        );
        Self {
            descriptor,
            current: current.clone(),
            payee: payee.to_string(),
        }
    }
}

impl FormFlow for BankForm {
    type Output = BankDetails;
    type Error = SectionErrors;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        let current = &self.current;
        let mut defaults = BTreeMap::new();
        insert_non_empty(&mut defaults, "accountHolderName", &current.account_holder_name);
        insert_non_empty(&mut defaults, "accountNumber", &current.account_number);
        insert_non_empty(
            &mut defaults,
            "confirmAccountNumber",
            &current.confirm_account_number,
        );
        insert_non_empty(&mut defaults, "bankName", &current.bank_name);
        insert_non_empty(&mut defaults, "routingCode", &current.routing_code);
        insert_non_empty(&mut defaults, "nationalTaxId", &current.national_tax_id);
        insert_non_empty(&mut defaults, "branchName", &current.branch_name);
        defaults
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        let bank = BankDetails {
            account_holder_name: text_value(&values, "accountHolderName"),
            account_number: text_value(&values, "accountNumber"),
            confirm_account_number: text_value(&values, "confirmAccountNumber"),
            bank_name: text_value(&values, "bankName"),
            routing_code: text_value(&values, "routingCode"),
            national_tax_id: text_value(&values, "nationalTaxId"),
            branch_name: text_value(&values, "branchName"),
        };
        let ctx = SectionContext {
            payee_name: Some(&self.payee),
        };
        bank.validate(&ctx)?;
        Ok(bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::forms::tests::MockInteraction;
    use crate::cli::forms::{FormEngine, FormResult};

    fn run<F: FormFlow<Error = SectionErrors>>(
        flow: &F,
        answers: &[&str],
    ) -> Result<FormResult<F::Output>, SectionErrors> {
        FormEngine::new(flow).run(&mut MockInteraction::values(answers))
    }

    #[test]
    fn influencer_form_builds_profile() {
        let form = InfluencerForm::new(&InfluencerProfile::default());
        let result = run(&form, &["Asha Rao", "12 MG Road, Pune", "9876543210"]).unwrap();
        assert_eq!(
            result,
            FormResult::Completed(InfluencerProfile::new(
                "Asha Rao",
                "12 MG Road, Pune",
                "9876543210"
            ))
        );
    }

    #[test]
    fn influencer_form_rejects_short_contact_then_accepts() {
        let form = InfluencerForm::new(&InfluencerProfile::default());
        let result = run(
            &form,
            &["Asha Rao", "12 MG Road, Pune", "98765", "9876543210"],
        )
        .unwrap();
        match result {
            FormResult::Completed(profile) => assert_eq!(profile.contact_number, "9876543210"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn campaign_form_accepts_month_abbreviation() {
        let form = CampaignForm::new(&CampaignInfo::default());
        let result = run(
            &form,
            &[
                "Meera",
                "https://instagram.com/asha.creates",
                "Glow Co",
                "Sunscreen",
                "",
                "mar",
                "2025",
            ],
        )
        .unwrap();
        match result {
            FormResult::Completed(campaign) => {
                assert_eq!(campaign.month, Some(Month::March));
                assert!(campaign.description.is_none());
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn financial_form_seeds_configured_rate() {
        let form = FinancialForm::new(&FinancialDetails::default(), 12.0);
        assert_eq!(form.defaults().get("taxPercentage").unwrap(), "12");
        assert!(form.defaults().get("commercials").is_none());
    }

    #[test]
    fn financial_form_commits_amounts() {
        let form = FinancialForm::new(&FinancialDetails::default(), 18.0);
        let result = run(&form, &["INV-001", "25000", "2500", "yes", "27ABCDE1234F1Z5", "18"])
            .unwrap();
        match result {
            FormResult::Completed(details) => {
                assert_eq!(details.commercials, 25000.0);
                assert_eq!(details.totals().total_amount, 32000.0);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn financial_form_requires_tax_id_when_taxed() {
        let form = FinancialForm::new(&FinancialDetails::default(), 18.0);
        let err = run(&form, &["INV-001", "25000", "0", "yes", "", "18"]).unwrap_err();
        assert!(err.for_field("taxId").is_some());
    }

    #[test]
    fn bank_form_checks_holder_and_confirmation() {
        let form = BankForm::new(&BankDetails::default(), "Asha Rao");
        let err = run(
            &form,
            &[
                "Asha Rao",
                "123456789012",
                "123456789013",
                "HDFC Bank",
                "HDFC0001234",
                "ABCDE1234F",
                "Koregaon Park",
            ],
        )
        .unwrap_err();
        assert_eq!(
            err.for_field("confirmAccountNumber").unwrap().message,
            "Account numbers do not match"
        );
    }

    #[test]
    fn bank_form_rejects_mismatched_holder_at_entry() {
        let form = BankForm::new(&BankDetails::default(), "Asha Rao");
        let result = run(
            &form,
            &[
                "asha rao",
                "Asha Rao",
                "123456789012",
                "123456789012",
                "HDFC Bank",
                "HDFC0001234",
                "ABCDE1234F",
                "Koregaon Park",
            ],
        )
        .unwrap();
        match result {
            FormResult::Completed(bank) => assert_eq!(bank.account_holder_name, "Asha Rao"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
