//! Hand-off of a completed invoice to the backend.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::Result,
    invoice::InvoiceDraft,
    utils::persistence::{ensure_dir, save_json_atomic},
};

/// Payload sent on final submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedInvoice {
    pub invoice: InvoiceDraft,
    pub total_amount: f64,
    pub submitted_at: DateTime<Utc>,
}

impl SubmittedInvoice {
    pub fn new(draft: &InvoiceDraft, submitted_at: DateTime<Utc>) -> Self {
        let mut invoice = draft.clone();
        invoice.submitted_at = Some(submitted_at);
        let total_amount = invoice.refresh_total();
        Self {
            invoice,
            total_amount,
            submitted_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub location: Option<PathBuf>,
}

/// Receives completed invoices. One attempt per call; callers never retry.
pub trait InvoiceSubmitter: Send {
    fn submit(&mut self, invoice: &SubmittedInvoice) -> Result<SubmissionReceipt>;
}

/// Stores each submission as `<uuid>.json` in a directory.
#[derive(Debug, Clone)]
pub struct JsonOutbox {
    dir: PathBuf,
}

impl JsonOutbox {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl InvoiceSubmitter for JsonOutbox {
    fn submit(&mut self, invoice: &SubmittedInvoice) -> Result<SubmissionReceipt> {
        let id = Uuid::new_v4();
        let path = self.dir.join(format!("{}.json", id));
        save_json_atomic(invoice, &path)?;
        debug!(%id, path = %path.display(), "invoice written to outbox");
        Ok(SubmissionReceipt {
            id,
            location: Some(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{invoice::FinancialDetails, utils::persistence::load_json};
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn submission_stamps_draft_and_recomputes_total() {
        let mut draft = InvoiceDraft::new();
        draft.financial = FinancialDetails {
            commercials: 100.0,
            reimbursement: 10.0,
            is_tax_applicable: true,
            tax_percentage: 10.0,
            ..FinancialDetails::default()
        };
        draft.total_amount = 1.0;
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let submitted = SubmittedInvoice::new(&draft, at);
        assert_eq!(submitted.total_amount, 120.0);
        assert_eq!(submitted.invoice.submitted_at, Some(at));
        assert_eq!(draft.submitted_at, None);
    }

    #[test]
    fn outbox_persists_payload() {
        let dir = tempdir().unwrap();
        let mut outbox = JsonOutbox::new(dir.path().join("outbox")).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let submitted = SubmittedInvoice::new(&InvoiceDraft::new(), at);

        let receipt = outbox.submit(&submitted).unwrap();
        let path = receipt.location.unwrap();
        assert!(path.ends_with(format!("{}.json", receipt.id)));
        let stored: SubmittedInvoice = load_json(&path).unwrap();
        assert_eq!(stored, submitted);
    }
}
