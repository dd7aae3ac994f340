//! Section records, financial derivation and the invoice draft aggregate.

pub mod bank;
pub mod campaign;
pub mod draft;
pub mod financial;
pub mod influencer;
pub mod section;

pub use bank::BankDetails;
pub use campaign::{CampaignInfo, Month};
pub use draft::{InvoiceDraft, SectionValidityMap};
pub use financial::{coerce_amount, compute_totals, sanitize_amount, FinancialDetails, Totals};
pub use influencer::InfluencerProfile;
pub use section::{FieldError, SectionContext, SectionData, SectionErrors, SectionKind, SectionModel};
