//! Step sequencing, validity tracking and persistence of the invoice draft.

pub mod controller;
pub mod notice;
pub mod step;

pub use controller::{Completion, SubmitOutcome, WizardController};
pub use notice::{NoticeLevel, Notification};
pub use step::WizardStep;
