use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::CommandError;
use crate::cli::output;
use crate::wizard::{NoticeLevel, Notification};

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

/// Shows a queued wizard or export notice.
pub fn print_notification(notice: &Notification) {
    match notice.level {
        NoticeLevel::Info => print_info(notice),
        NoticeLevel::Success => print_success(notice),
        NoticeLevel::Error => print_error(notice),
    }
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(prompt: &str, default: bool) -> Result<bool, CommandError> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}
