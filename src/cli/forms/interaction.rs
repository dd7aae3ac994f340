use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::cli::output;

use super::{
    ConfirmationResponse, FieldKind, FormInteraction, FormSummary, PromptContext,
    PromptResponse,
};

const BACK_KEYWORD: &str = ":back";
const HELP_KEYWORD: &str = ":help";
const CANCEL_KEYWORD: &str = ":cancel";

/// Terminal prompts backed by dialoguer.
///
/// Text fields accept `:back`, `:help` and `:cancel`; an empty answer keeps
/// the current value.
#[derive(Default)]
pub struct WizardInteraction {
    theme: ColorfulTheme,
}

impl WizardInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    fn prompt_text(&self, context: &PromptContext<'_>) -> PromptResponse {
        render_prompt(context);
        let input = Input::<String>::with_theme(&self.theme)
            .with_prompt(context.descriptor.label)
            .allow_empty(true)
            .interact_text();
        match input {
            Ok(raw) => interpret_text(&raw),
            Err(_) => PromptResponse::Cancel,
        }
    }

    fn prompt_select(&self, context: &PromptContext<'_>, options: &[String]) -> PromptResponse {
        let default_index = context
            .default
            .and_then(|current| options.iter().position(|option| option == current))
            .unwrap_or(0);
        let selection = Select::with_theme(&self.theme)
            .with_prompt(format!(
                "[{}/{}] {}",
                context.index + 1,
                context.total,
                context.descriptor.label
            ))
            .items(options)
            .default(default_index)
            .interact_opt();
        match selection {
            Ok(Some(index)) => options
                .get(index)
                .cloned()
                .map(PromptResponse::Value)
                .unwrap_or(PromptResponse::Cancel),
            _ => PromptResponse::Cancel,
        }
    }
}

impl FormInteraction for WizardInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        match &context.descriptor.kind {
            FieldKind::Choice(options) => {
                let options = options.clone();
                self.prompt_select(context, &options)
            }
            FieldKind::Boolean => {
                let options = vec!["true".to_string(), "false".to_string()];
                self.prompt_select(context, &options)
            }
            FieldKind::Text | FieldKind::Decimal => self.prompt_text(context),
        }
    }

    fn confirm(&mut self, _summary: &FormSummary, lines: &[String]) -> ConfirmationResponse {
        for line in lines {
            println!("{}", line);
        }
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Save this section?")
            .items(&["Confirm", "Back", "Cancel"][..])
            .default(0)
            .interact_opt();
        match selection {
            Ok(Some(0)) => ConfirmationResponse::Confirm,
            Ok(Some(1)) => ConfirmationResponse::Back,
            _ => ConfirmationResponse::Cancel,
        }
    }
}

fn render_prompt(context: &PromptContext<'_>) {
    let required = if context.descriptor.required {
        ""
    } else {
        " (optional)"
    };
    println!(
        "{}",
        output::hint(format!(
            "[{}/{}] {}{}",
            context.index + 1,
            context.total,
            context.descriptor.label,
            required
        ))
    );
    if let Some(current) = context.default {
        println!("{}", output::hint(format!("  current: {}", current)));
    }
    println!(
        "{}",
        output::hint("  Enter keeps the current value; :back, :help or :cancel.")
    );
}

fn interpret_text(raw: &str) -> PromptResponse {
    match raw.trim() {
        "" => PromptResponse::Keep,
        BACK_KEYWORD => PromptResponse::Back,
        HELP_KEYWORD => PromptResponse::Help,
        CANCEL_KEYWORD => PromptResponse::Cancel,
        _ => PromptResponse::Value(raw.to_string()),
    }
}

/// Non-interactive answers for script mode.
///
/// Answer `n` fills field `n`; `-` or a missing answer keeps the current
/// value. A field asked twice means its answer was rejected, so the form is
/// cancelled instead of looping.
pub struct ScriptInteraction {
    answers: Vec<String>,
    last_index: Option<usize>,
}

impl ScriptInteraction {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            last_index: None,
        }
    }
}

impl FormInteraction for ScriptInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        if self.last_index == Some(context.index) {
            return PromptResponse::Cancel;
        }
        self.last_index = Some(context.index);
        match self.answers.get(context.index).map(String::as_str) {
            None | Some("-") => PromptResponse::Keep,
            Some(answer) => PromptResponse::Value(answer.to_string()),
        }
    }

    fn confirm(&mut self, _summary: &FormSummary, _lines: &[String]) -> ConfirmationResponse {
        ConfirmationResponse::Confirm
    }
}
