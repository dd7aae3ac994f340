use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::debug;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::{io as cli_io, output};

/// Set to run commands from stdin without prompts.
pub const SCRIPT_ENV_VAR: &str = "INVOICE_CORE_CLI_SCRIPT";

const SCRIPT_COMMENT: char = '#';

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV_VAR).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, io::stdin().lock()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<InvoiceHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(InvoiceHelper::new(context.registry.iter())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::section("Influencer Invoice");
    cli_io::print_info(context.wizard.current_step());
    context.print_hint("Type `help` for commands. Press Tab or ? to complete.");

    while context.running {
        let line = match editor.readline(&context.prompt()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Err(ReadlineError::Eof) => {
                cli_io::print_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        editor.add_history_entry(trimmed).ok();
        run_line(context, trimmed)?;
    }

    Ok(())
}

/// Reads one command per line. Blank lines and `#` comments are skipped.
fn run_script(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for line in input.lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(SCRIPT_COMMENT) {
            continue;
        }
        run_line(context, trimmed)?;
    }
    Ok(())
}

fn run_line(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    if let Err(err) = handle_line(context, line) {
        context.report_error(err)?;
    }
    Ok(())
}

/// Runs one command line, then prints whatever the wizard and the exporter
/// queued while it ran.
pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not read `{}`: {}", line, err));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());

    let step = context.wizard.current_step();
    let outcome = context.dispatch(&raw.to_lowercase(), raw, &args);
    context.flush_notifications();
    if context.wizard.current_step() != step {
        debug!(from = step.number(), to = context.wizard.current_step().number(), "step changed");
    }

    if matches!(outcome, Ok(LoopControl::Exit)) {
        context.running = false;
    }
    outcome
}

/// Where the cursor sits in a partially typed command line.
#[derive(Debug, PartialEq, Eq)]
struct CursorWord<'a> {
    /// Byte offset where the word under the cursor starts.
    start: usize,
    /// Zero for the command name, then one per argument.
    position: usize,
    command: Option<&'a str>,
    word: &'a str,
}

fn cursor_word(prefix: &str) -> CursorWord<'_> {
    let start = prefix
        .rfind(char::is_whitespace)
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let completed: Vec<&str> = prefix[..start].split_whitespace().collect();
    CursorWord {
        start,
        position: completed.len(),
        command: completed.first().copied(),
        word: &prefix[start..],
    }
}

/// Completion entry for one command: its name plus the choices each
/// argument slot offers, read from the usage line (`fill [influencer|bank]`).
struct CommandEntry {
    name: String,
    arguments: Vec<Vec<String>>,
    usage_tail: String,
}

impl CommandEntry {
    fn from_definition(definition: &CommandDefinition) -> Self {
        let mut words = definition.usage.split_whitespace();
        words.next();
        let tail: Vec<&str> = words.collect();
        let arguments = tail
            .iter()
            .map(|slot| {
                let inner = slot.trim_matches(|c| matches!(c, '[' | ']' | '<' | '>'));
                if inner.contains('|') {
                    inner.split('|').map(str::to_string).collect()
                } else {
                    Vec::new()
                }
            })
            .collect();
        Self {
            name: definition.name.to_ascii_lowercase(),
            arguments,
            usage_tail: tail.join(" "),
        }
    }

    fn choices(&self, position: usize) -> &[String] {
        position
            .checked_sub(1)
            .and_then(|slot| self.arguments.get(slot))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Tab completion for command names and their fixed arguments, usage hints,
/// and multi-line input while a quote is still open.
struct InvoiceHelper {
    entries: Vec<CommandEntry>,
}

impl InvoiceHelper {
    fn new<'a>(definitions: impl Iterator<Item = &'a CommandDefinition>) -> Self {
        let mut entries: Vec<CommandEntry> =
            definitions.map(CommandEntry::from_definition).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries.dedup_by(|a, b| a.name == b.name);
        Self { entries }
    }

    fn entry(&self, name: &str) -> Option<&CommandEntry> {
        let name = name.to_ascii_lowercase();
        self.entries.iter().find(|entry| entry.name == name)
    }

    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let cursor = cursor_word(prefix);
        let needle = cursor.word.to_ascii_lowercase();
        let options: Vec<&String> = match cursor.command {
            None => self.entries.iter().map(|entry| &entry.name).collect(),
            Some(command) => self
                .entry(command)
                .map(|entry| entry.choices(cursor.position).iter().collect())
                .unwrap_or_default(),
        };
        let matches = options
            .into_iter()
            .filter(|option| option.starts_with(&needle))
            .cloned()
            .collect();
        (cursor.start, matches)
    }

    /// Usage of a fully typed command, shown once a space follows its name.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let name = line.strip_suffix(' ')?.trim();
        if name.contains(char::is_whitespace) {
            return None;
        }
        self.entry(name)
            .map(|entry| entry.usage_tail.clone())
            .filter(|tail| !tail.is_empty())
    }
}

impl Helper for InvoiceHelper {}

impl Completer for InvoiceHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for InvoiceHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for InvoiceHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(output::hint(hint))
    }
}

impl Validator for InvoiceHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(match shell_words::split(ctx.input()) {
            Ok(_) => ValidationResult::Valid(None),
            Err(_) => ValidationResult::Incomplete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::all_definitions;
    use crate::wizard::WizardStep;
    use tempfile::tempdir;

    fn helper() -> InvoiceHelper {
        InvoiceHelper::new(all_definitions().iter())
    }

    #[test]
    fn command_names_complete_from_prefix() {
        let (start, names) = helper().candidates("s");
        assert_eq!(start, 0);
        assert_eq!(names, vec!["set-financial", "status", "submit"]);
    }

    #[test]
    fn fill_completes_section_names() {
        let (start, names) = helper().candidates("fill b");
        assert_eq!(start, 5);
        assert_eq!(names, vec!["bank"]);

        let (_, names) = helper().candidates("FILL ");
        assert_eq!(names, vec!["influencer", "campaign", "financial", "bank"]);
    }

    #[test]
    fn argument_slots_follow_usage() {
        let (_, fields) = helper().candidates("set-financial tax");
        assert_eq!(fields, vec!["tax", "tax-id", "tax-percentage"]);

        let (_, roles) = helper().candidates("login asha@example.com c");
        assert_eq!(roles, vec!["client"]);

        let (_, none) = helper().candidates("fill bank Asha ");
        assert!(none.is_empty());
        let (_, none) = helper().candidates("jump ");
        assert!(none.is_empty());
    }

    #[test]
    fn usage_hint_appears_after_command_name() {
        let helper = helper();
        assert_eq!(helper.usage_hint("jump ").as_deref(), Some("<1-4>"));
        assert_eq!(helper.usage_hint("jump"), None);
        assert_eq!(helper.usage_hint("jump 2 "), None);
        assert_eq!(helper.usage_hint("status "), None);
    }

    #[test]
    fn cursor_word_tracks_argument_position() {
        let cursor = cursor_word("login me@example.com ad");
        assert_eq!(cursor.command, Some("login"));
        assert_eq!(cursor.position, 2);
        assert_eq!(cursor.word, "ad");
    }

    #[test]
    fn script_skips_comments_and_blank_lines() {
        let dir = tempdir().unwrap();
        let mut context =
            ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).unwrap();
        let script = concat!(
            "# start at the influencer step\n",
            "\n",
            "fill influencer \"Asha Rao\" \"12 MG Road, Pune\" 9876543210\n",
            "exit\n",
            "status\n",
        );
        run_script(&mut context, script.as_bytes()).unwrap();
        assert!(!context.running);
        assert_eq!(context.wizard.current_step(), WizardStep::Campaign);
        assert_eq!(context.last_command.as_deref(), Some("exit"));
    }

    #[test]
    fn unbalanced_quotes_do_not_dispatch() {
        let dir = tempdir().unwrap();
        let mut context =
            ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).unwrap();
        let control = handle_line(&mut context, r#"fill influencer "Asha"#).unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert!(context.last_command.is_none());
        assert!(!context.wizard.validity().influencer);
    }
}
