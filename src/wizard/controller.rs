use std::{mem, sync::Arc};

use tracing::{debug, error, info, warn};

use crate::{
    core::Clock,
    invoice::{
        FinancialDetails, InvoiceDraft, SectionData, SectionErrors, SectionKind, SectionModel,
        SectionValidityMap,
    },
    storage::{DraftStore, PersistedWizard, STORAGE_KEY},
    submission::{InvoiceSubmitter, SubmissionReceipt, SubmittedInvoice},
};

use super::{notice::Notification, step::WizardStep};

const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Result of a section completion that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Sections 1–3 move the wizard forward.
    Advanced(WizardStep),
    /// The bank section hands off to submission.
    Submitted(SubmitOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one section is not valid yet; nothing happened.
    NotReady,
    Accepted(SubmissionReceipt),
    /// The submitter rejected the invoice. State is untouched.
    Failed,
}

/// Owner of the invoice draft, the validity map, and the step position.
///
/// Every mutating operation ends by persisting a [`PersistedWizard`]
/// snapshot; only a successful submission removes it.
pub struct WizardController {
    store: Box<dyn DraftStore>,
    submitter: Box<dyn InvoiceSubmitter>,
    clock: Arc<dyn Clock>,
    draft: InvoiceDraft,
    validity: SectionValidityMap,
    step: WizardStep,
    preview: bool,
    currency_symbol: String,
    notifications: Vec<Notification>,
}

impl WizardController {
    pub fn new(
        store: Box<dyn DraftStore>,
        submitter: Box<dyn InvoiceSubmitter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            submitter,
            clock,
            draft: InvoiceDraft::new(),
            validity: SectionValidityMap::default(),
            step: WizardStep::FIRST,
            preview: false,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.into(),
            notifications: Vec::new(),
        }
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Loads the persisted snapshot, if any. A missing or unreadable value
    /// leaves the controller in its empty state. Returns whether a draft
    /// was restored.
    pub fn restore(&mut self) -> bool {
        let raw = match self.store.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no saved invoice draft");
                return false;
            }
            Err(err) => {
                warn!(error = %err, "failed to read saved invoice draft");
                return false;
            }
        };
        match PersistedWizard::from_json(&raw) {
            Ok(snapshot) => {
                self.draft = snapshot.form_data;
                self.draft.refresh_total();
                self.validity = snapshot.section_valid;
                self.step = WizardStep::FIRST;
                self.preview = false;
                debug!(total = self.draft.total_amount, "restored invoice draft");
                true
            }
            Err(err) => {
                warn!(error = %err, "discarding unreadable invoice draft");
                self.clear_state();
                false
            }
        }
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn validity(&self) -> SectionValidityMap {
        self.validity
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn total_amount(&self) -> f64 {
        self.draft.total_amount
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Stores a finished section after validating it against the current
    /// draft. Failures change nothing.
    pub fn complete_section(&mut self, data: SectionData) -> Result<Completion, SectionErrors> {
        data.validate(&self.draft.section_context())?;
        let kind = data.kind();
        self.draft.apply(data);
        self.validity.set(kind, true);
        debug!(section = %kind, "section completed");
        if kind == SectionKind::Influencer {
            self.recheck_bank();
        }
        self.persist();

        match WizardStep::for_section(kind).next() {
            Some(next) => {
                self.step = next;
                debug!(step = next.number(), "advanced");
                Ok(Completion::Advanced(next))
            }
            None => Ok(Completion::Submitted(self.submit())),
        }
    }

    /// Live edit of the financial section. The total follows every edit;
    /// an edit that no longer validates clears the section's flag.
    pub fn update_financial(&mut self, details: FinancialDetails) -> f64 {
        let details = details.with_finite_amounts();
        let valid = details.is_valid(&self.draft.section_context());
        self.draft.financial = details;
        let total = self.draft.refresh_total();
        if !valid && self.validity.financial {
            debug!("financial section no longer valid");
            self.validity.set(SectionKind::Financial, false);
        }
        self.persist();
        total
    }

    pub fn go_next(&mut self) -> bool {
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    pub fn go_previous(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Jumps to step `number` (1-based) when it is the current step, the
    /// first step, or every earlier section is valid.
    pub fn jump_to_step(&mut self, number: u8) -> bool {
        let Some(target) = WizardStep::from_number(number) else {
            return false;
        };
        let allowed = target == self.step
            || target == WizardStep::FIRST
            || self.validity.all_before(target.section());
        if allowed {
            self.step = target;
        } else {
            debug!(step = number, "jump refused");
        }
        allowed
    }

    /// Callers disable the control while [`Self::can_preview`] is false.
    pub fn toggle_preview(&mut self) -> bool {
        self.preview = !self.preview;
        self.preview
    }

    pub fn can_preview(&self) -> bool {
        self.validity.any_valid()
    }

    /// Sends the invoice when every section is valid. A single attempt;
    /// failures leave the draft and the stored snapshot in place.
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.validity.all_valid() {
            debug!("submit ignored; not every section is valid");
            return SubmitOutcome::NotReady;
        }
        let submitted_at = self.clock.now();
        let payload = SubmittedInvoice::new(&self.draft, submitted_at);
        match self.submitter.submit(&payload) {
            Ok(receipt) => {
                info!(id = %receipt.id, total = payload.total_amount, "invoice submitted");
                self.draft.submitted_at = Some(submitted_at);
                self.notifications.push(Notification::success(
                    "Invoice Submitted Successfully",
                    format!(
                        "Your invoice for {}{:.2} has been submitted.",
                        self.currency_symbol, payload.total_amount
                    ),
                ));
                if let Err(err) = self.store.remove(STORAGE_KEY) {
                    warn!(error = %err, "failed to clear saved invoice draft");
                }
                SubmitOutcome::Accepted(receipt)
            }
            Err(err) => {
                error!(error = %err, "invoice submission failed");
                self.notifications.push(Notification::error(
                    "Submission Failed",
                    "There was an error submitting your invoice. Please try again.",
                ));
                SubmitOutcome::Failed
            }
        }
    }

    /// Discards the draft and the stored snapshot.
    pub fn reset(&mut self) {
        self.clear_state();
        if let Err(err) = self.store.remove(STORAGE_KEY) {
            warn!(error = %err, "failed to clear saved invoice draft");
        }
        debug!("wizard reset");
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        mem::take(&mut self.notifications)
    }

    /// The holder name must keep matching the payee after an influencer edit.
    fn recheck_bank(&mut self) {
        if self.validity.bank && !self.draft.bank.is_valid(&self.draft.section_context()) {
            debug!("bank section no longer matches the payee");
            self.validity.set(SectionKind::Bank, false);
        }
    }

    fn clear_state(&mut self) {
        self.draft = InvoiceDraft::new();
        self.validity = SectionValidityMap::default();
        self.step = WizardStep::FIRST;
        self.preview = false;
    }

    fn persist(&self) {
        let snapshot = PersistedWizard::new(&self.draft, self.validity);
        let result = snapshot
            .to_json()
            .and_then(|json| self.store.write(STORAGE_KEY, &json));
        if let Err(err) = result {
            warn!(error = %err, "failed to persist invoice draft");
        }
    }
}
