//! Shell context, dispatch and error reporting for the invoice CLI.

use std::{io, path::PathBuf, sync::Arc};

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::debug;

use crate::{
    auth::SessionContext,
    config::{Config, ConfigManager},
    core::{utils::PathResolver, Clock, SystemClock},
    errors::InvoiceError,
    export::{ExportPipeline, PlainTextRasterizer},
    invoice::{SectionErrors, SectionKind},
    storage::json_backend::JsonDraftStore,
    submission::JsonOutbox,
    wizard::WizardController,
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::forms::{FormEngine, FormFlow, FormResult, ScriptInteraction, WizardInteraction};
use super::io as cli_io;
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) wizard: WizardController,
    pub(crate) exporter: ExportPipeline,
    pub(crate) session: SessionContext,
    pub(crate) config_manager: ConfigManager,
    pub(crate) config: Config,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) last_command: Option<String>,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Builds the shell over the data directory `base`, restoring any saved
    /// draft and remembered sign-in.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        if mode == CliMode::Script {
            output::set_plain(true);
        }
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let store = JsonDraftStore::new(PathResolver::storage_dir_in(&base))?;
        let outbox = JsonOutbox::new(PathResolver::outbox_dir_in(&base))?;
        let mut wizard = WizardController::new(Box::new(store), Box::new(outbox), clock.clone())
            .with_currency_symbol(config.currency_symbol.clone());

        let rasterizer =
            PlainTextRasterizer::new(config.export_dir_in(&base), config.currency_symbol.clone());
        let exporter = ExportPipeline::new(Box::new(rasterizer), config.export_options());

        let mut session = SessionContext::new();
        if let Some(stored) = &config.session {
            session.sign_in(stored.to_user());
        }

        if wizard.restore() {
            cli_io::print_info("Restored saved invoice draft.");
        }
        debug!(base = %base.display(), ?mode, "shell ready");

        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            wizard,
            exporter,
            session,
            config_manager,
            config,
            clock,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        let step = self.wizard.current_step();
        let preview = if self.wizard.is_preview() {
            " preview"
        } else {
            ""
        };
        format!("invoice [{}/4{}]> ", step.number(), preview)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    /// Prints everything the wizard and exporter queued since the last call.
    pub(crate) fn flush_notifications(&mut self) {
        let mut notices = self.wizard.drain_notifications();
        notices.extend(self.exporter.drain_notifications());
        for notice in &notices {
            cli_io::print_notification(notice);
        }
    }

    /// Runs a section form. Positional answers (or script mode) bypass the
    /// terminal prompts. `Ok(None)` means the form was cancelled.
    pub(crate) fn collect_form<F>(
        &self,
        flow: &F,
        answers: &[&str],
    ) -> Result<Option<F::Output>, SectionErrors>
    where
        F: FormFlow<Error = SectionErrors>,
    {
        let engine = FormEngine::new(flow);
        let result = if self.mode == CliMode::Script || !answers.is_empty() {
            engine.run(&mut ScriptInteraction::new(answers.iter().copied()))?
        } else {
            engine.run(&mut WizardInteraction::new())?
        };
        Ok(match result {
            FormResult::Completed(output) => Some(output),
            FormResult::Cancelled => None,
        })
    }

    pub(crate) fn print_section_errors(&self, errors: &SectionErrors) {
        cli_io::print_error(format!("{} was not saved.", errors.section));
        for err in &errors.errors {
            println!("  - {}: {}", field_label(errors.section, err.field), err.message);
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        super::shell::handle_line(self, line)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        println!("{}", output::hint(message));
    }
}

/// Human label for a section field key.
pub(crate) fn field_label(section: SectionKind, field: &str) -> &'static str {
    match (section, field) {
        (SectionKind::Influencer, "fullName") => "Full name",
        (SectionKind::Influencer, "address") => "Address",
        (SectionKind::Influencer, "contactNumber") => "Contact number",
        (SectionKind::Campaign, "pocName") => "Brand point of contact",
        (SectionKind::Campaign, "profileLink") => "Profile link",
        (SectionKind::Campaign, "brandName") => "Brand name",
        (SectionKind::Campaign, "productName") => "Product name",
        (SectionKind::Campaign, "month") => "Campaign month",
        (SectionKind::Campaign, "year") => "Campaign year",
        (SectionKind::Financial, "invoiceNumber") => "Invoice number",
        (SectionKind::Financial, "commercials") => "Professional fee",
        (SectionKind::Financial, "reimbursement") => "Reimbursement",
        (SectionKind::Financial, "taxId") => "Tax registration number",
        (SectionKind::Financial, "taxPercentage") => "Tax percentage",
        (SectionKind::Bank, "accountHolderName") => "Account holder name",
        (SectionKind::Bank, "accountNumber") => "Account number",
        (SectionKind::Bank, "confirmAccountNumber") => "Confirm account number",
        (SectionKind::Bank, "bankName") => "Bank name",
        (SectionKind::Bank, "routingCode") => "IFSC code",
        (SectionKind::Bank, "nationalTaxId") => "PAN",
        (SectionKind::Bank, "branchName") => "Branch name",
        _ => "Field",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] InvoiceError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failures that stop the shell itself.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] InvoiceError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("Line editor failed: {0}")]
    Readline(#[from] ReadlineError),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Core(InvoiceError::Io(err))
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base.to_path_buf())?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}
