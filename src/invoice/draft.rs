use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    section::{SectionContext, SectionData, SectionKind},
    BankDetails, CampaignInfo, FinancialDetails, InfluencerProfile,
};

/// The composite record assembled by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDraft {
    pub influencer: InfluencerProfile,
    pub campaign: CampaignInfo,
    pub financial: FinancialDetails,
    pub bank: BankDetails,
    /// Cached grand total. Recomputed from `financial` on every change.
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_total(&mut self) -> f64 {
        self.total_amount = self.financial.totals().total_amount;
        self.total_amount
    }

    /// Stores a completed section in its slot. Username derivation runs
    /// for campaign data.
    pub fn apply(&mut self, data: SectionData) {
        match data {
            SectionData::Influencer(influencer) => self.influencer = influencer,
            SectionData::Campaign(mut campaign) => {
                campaign.derive_username();
                self.campaign = campaign;
            }
            SectionData::Financial(financial) => self.financial = financial,
            SectionData::Bank(bank) => self.bank = bank,
        }
        self.refresh_total();
    }

    /// Context a section is validated against.
    pub fn section_context(&self) -> SectionContext<'_> {
        SectionContext {
            payee_name: Some(self.influencer.full_name.as_str()),
        }
    }

    pub fn payee_name(&self) -> &str {
        &self.influencer.full_name
    }
}

/// Which sections have passed validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionValidityMap {
    pub influencer: bool,
    pub campaign: bool,
    pub financial: bool,
    pub bank: bool,
}

impl SectionValidityMap {
    pub fn get(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Influencer => self.influencer,
            SectionKind::Campaign => self.campaign,
            SectionKind::Financial => self.financial,
            SectionKind::Bank => self.bank,
        }
    }

    pub fn set(&mut self, kind: SectionKind, valid: bool) {
        let slot = match kind {
            SectionKind::Influencer => &mut self.influencer,
            SectionKind::Campaign => &mut self.campaign,
            SectionKind::Financial => &mut self.financial,
            SectionKind::Bank => &mut self.bank,
        };
        *slot = valid;
    }

    pub fn all_valid(&self) -> bool {
        SectionKind::ALL.iter().all(|kind| self.get(*kind))
    }

    pub fn any_valid(&self) -> bool {
        SectionKind::ALL.iter().any(|kind| self.get(*kind))
    }

    /// True when every section strictly before `kind` is valid.
    pub fn all_before(&self, kind: SectionKind) -> bool {
        SectionKind::ALL
            .iter()
            .take_while(|candidate| **candidate != kind)
            .all(|candidate| self.get(*candidate))
    }
}
