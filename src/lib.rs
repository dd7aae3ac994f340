#![doc(test(attr(deny(warnings))))]

//! Invoice Core drives a four-step influencer invoice wizard: section
//! validation, running totals, draft persistence, a printable preview,
//! export and submission, plus the CLI shell built on top of them.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod invoice;
pub mod preview;
pub mod storage;
pub mod submission;
pub mod utils;
pub mod validation;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Invoice Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
