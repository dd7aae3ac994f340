use std::fmt;

use crate::invoice::SectionKind;

/// Position of the wizard; one step per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    #[default]
    Influencer,
    Campaign,
    Financial,
    Bank,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::Influencer;
    pub const LAST: WizardStep = WizardStep::Bank;

    pub fn number(self) -> u8 {
        match self {
            WizardStep::Influencer => 1,
            WizardStep::Campaign => 2,
            WizardStep::Financial => 3,
            WizardStep::Bank => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(WizardStep::Influencer),
            2 => Some(WizardStep::Campaign),
            3 => Some(WizardStep::Financial),
            4 => Some(WizardStep::Bank),
            _ => None,
        }
    }

    pub fn section(self) -> SectionKind {
        match self {
            WizardStep::Influencer => SectionKind::Influencer,
            WizardStep::Campaign => SectionKind::Campaign,
            WizardStep::Financial => SectionKind::Financial,
            WizardStep::Bank => SectionKind::Bank,
        }
    }

    pub fn for_section(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Influencer => WizardStep::Influencer,
            SectionKind::Campaign => WizardStep::Campaign,
            SectionKind::Financial => WizardStep::Financial,
            SectionKind::Bank => WizardStep::Bank,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} of 4: {}", self.number(), self.section().label())
    }
}
