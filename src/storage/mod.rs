pub mod json_backend;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::{
    errors::Result,
    invoice::{InvoiceDraft, SectionValidityMap},
};

pub use json_backend::JsonDraftStore;
pub use memory::MemoryDraftStore;

/// Fixed key the wizard snapshot lives under.
pub const STORAGE_KEY: &str = "invoice_form_data";

/// Durable string key/value storage, the terminal counterpart of browser
/// local storage.
pub trait DraftStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Snapshot written after every wizard mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedWizard {
    pub form_data: InvoiceDraft,
    pub section_valid: SectionValidityMap,
    pub total_amount: f64,
}

impl PersistedWizard {
    pub fn new(draft: &InvoiceDraft, validity: SectionValidityMap) -> Self {
        Self {
            form_data: draft.clone(),
            section_valid: validity,
            total_amount: draft.total_amount,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
