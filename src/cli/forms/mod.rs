//! Field-by-field form engine used to fill the invoice sections.
//!
//! A [`FormFlow`] describes its fields and turns the collected strings into a
//! typed record; [`FormEngine`] drives it through any [`FormInteraction`],
//! validating each answer as the user leaves the field.

mod interaction;
pub mod sections;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::cli::io;

pub use interaction::{ScriptInteraction, WizardInteraction};
pub use sections::{BankForm, CampaignForm, FinancialForm, InfluencerForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Describes how prompts can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Value(String),
    /// Keep the default/current value.
    Keep,
    Cancel,
    /// Return to the previous field.
    Back,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Confirm,
    Back,
    Cancel,
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Decimal,
    Boolean,
    Choice(Vec<String>),
}

type ValidatorCallback = dyn Fn(&str) -> Result<String, String> + Send + Sync;

#[derive(Clone)]
pub enum Validator {
    None,
    NonEmpty,
    Custom(Arc<ValidatorCallback>),
}

impl Validator {
    pub fn custom<F>(callback: F) -> Self
    where
        F: Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    {
        Validator::Custom(Arc::new(callback))
    }

    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        match self {
            Validator::None => Ok(input.trim().to_string()),
            Validator::NonEmpty => {
                if input.trim().is_empty() {
                    Err(ValidationError::new("Value cannot be empty"))
                } else {
                    Ok(input.trim().to_string())
                }
            }
            Validator::Custom(func) => func(input).map_err(ValidationError::new),
        }
    }
}

#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    pub validator: Validator,
}

impl FieldDescriptor {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
        validator: Validator,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
            validator,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

pub struct FormDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }
}

/// Menu-style choices that accept the label, its index, or the
/// `[n] label` display string.
#[derive(Clone)]
pub(crate) struct ChoiceMapper<T: Clone + PartialEq + Send + Sync> {
    display: Vec<String>,
    values: Vec<T>,
    alias_to_index: HashMap<String, usize>,
}

impl<T: Clone + PartialEq + Send + Sync> ChoiceMapper<T> {
    pub(crate) fn from_pairs(pairs: Vec<(String, T)>) -> Self {
        let mut display = Vec::new();
        let mut values = Vec::new();
        let mut alias_to_index = HashMap::new();

        for (idx, (label, value)) in pairs.into_iter().enumerate() {
            let display_label = format!("[{}] {}", idx + 1, label);
            alias_to_index.insert((idx + 1).to_string(), idx);
            alias_to_index.insert(label.to_ascii_lowercase(), idx);
            alias_to_index.insert(display_label.to_ascii_lowercase(), idx);
            display.push(display_label);
            values.push(value);
        }

        Self {
            display,
            values,
            alias_to_index,
        }
    }

    pub(crate) fn options(&self) -> Vec<String> {
        self.display.clone()
    }

    pub(crate) fn alias(&mut self, alias: &str, value: &T) {
        if let Some(index) = self.values.iter().position(|candidate| candidate == value) {
            self.alias_to_index.insert(alias.to_ascii_lowercase(), index);
        }
    }

    fn resolve(&self, input: &str) -> Option<String> {
        let key = input.trim().to_ascii_lowercase();
        self.alias_to_index
            .get(&key)
            .map(|index| self.display[*index].clone())
    }

    pub(crate) fn value_for_display(&self, display: &str) -> Option<&T> {
        self.display
            .iter()
            .position(|candidate| candidate == display)
            .and_then(|index| self.values.get(index))
    }

    pub(crate) fn display_for_value(&self, value: &T) -> Option<String> {
        self.values
            .iter()
            .position(|candidate| candidate == value)
            .map(|index| self.display[index].clone())
    }

    pub(crate) fn validator(&self, field_label: &'static str) -> Validator
    where
        T: 'static,
    {
        let options = self.options();
        let lookup = self.clone();
        Validator::custom(move |input| {
            lookup.resolve(input).ok_or_else(|| {
                format!(
                    "Select a valid {} (options: {})",
                    field_label,
                    options.join(", ")
                )
            })
        })
    }
}

/// Collected data shown before final confirmation.
#[derive(Default)]
pub struct FormSummary {
    pub entries: Vec<(String, String)>,
}

pub struct PromptContext<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub default: Option<&'a str>,
    pub index: usize,
    pub total: usize,
}

/// Interaction surface used by the form engine.
pub trait FormInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;

    fn confirm(&mut self, summary: &FormSummary, lines: &[String]) -> ConfirmationResponse;
}

/// In-progress form. Callers may drive it manually or let
/// [`FormEngine::run`] handle the loop.
pub struct FormSession<'a> {
    descriptor: &'a FormDescriptor,
    values: BTreeMap<String, String>,
    index: usize,
    completed: bool,
    cancelled: bool,
}

impl<'a> FormSession<'a> {
    pub fn new(descriptor: &'a FormDescriptor, defaults: BTreeMap<String, String>) -> Self {
        Self {
            descriptor,
            values: defaults,
            index: 0,
            completed: false,
            cancelled: false,
        }
    }

    pub fn current_field(&self) -> Option<FormStep<'_>> {
        self.descriptor.fields.get(self.index).map(|field| FormStep {
            descriptor: field,
            default: self.values.get(field.key).cloned(),
            index: self.index,
            total: self.descriptor.fields.len(),
        })
    }

    pub fn apply_response(
        &mut self,
        response: PromptResponse,
    ) -> Result<FormSessionEvent, ValidationError> {
        if self.completed || self.cancelled {
            return Ok(FormSessionEvent::NoOp);
        }

        let Some(field) = self.descriptor.fields.get(self.index) else {
            return Ok(FormSessionEvent::NoOp);
        };

        match response {
            PromptResponse::Cancel => {
                self.cancelled = true;
                Ok(FormSessionEvent::Cancelled)
            }
            PromptResponse::Back => {
                if self.index > 0 {
                    self.index -= 1;
                    Ok(FormSessionEvent::Moved)
                } else {
                    io::print_warning("Already at the first field.");
                    Ok(FormSessionEvent::Repeat)
                }
            }
            PromptResponse::Help => {
                io::print_info(
                    field
                        .help
                        .unwrap_or("No additional information available for this field."),
                );
                Ok(FormSessionEvent::Repeat)
            }
            PromptResponse::Keep => {
                if self.values.contains_key(field.key) {
                    self.index += 1;
                    Ok(FormSessionEvent::Moved)
                } else if field.required {
                    io::print_warning(format!("{} is required.", field.label));
                    Ok(FormSessionEvent::Repeat)
                } else {
                    self.index += 1;
                    Ok(FormSessionEvent::Moved)
                }
            }
            PromptResponse::Value(raw) => match validate_field(field, &raw) {
                Ok(value) => {
                    if value.is_empty() && !field.required {
                        self.values.remove(field.key);
                    } else {
                        self.values.insert(field.key.to_string(), value);
                    }
                    self.index += 1;
                    Ok(FormSessionEvent::Moved)
                }
                Err(err) => {
                    io::print_warning(format!("{}: {}", field.label, err.message));
                    Err(err)
                }
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.descriptor.fields.len()
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

fn validate_field(field: &FieldDescriptor, raw: &str) -> Result<String, ValidationError> {
    match (&field.kind, &field.validator) {
        (FieldKind::Boolean, Validator::None) => match raw.trim().to_lowercase().as_str() {
            "y" | "yes" | "true" | "1" => Ok("true".into()),
            "n" | "no" | "false" | "0" => Ok("false".into()),
            _ => Err(ValidationError::new("Answer yes or no")),
        },
        (FieldKind::Choice(options), Validator::None) => {
            let normalized = raw.trim().to_lowercase();
            options
                .iter()
                .find(|candidate| candidate.to_lowercase() == normalized)
                .cloned()
                .ok_or_else(|| {
                    ValidationError::new(format!("Value must be one of: {}", options.join(", ")))
                })
        }
        (_, validator) => validator.validate(raw),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSessionEvent {
    Moved,
    Repeat,
    Cancelled,
    NoOp,
}

/// Data provided to render the current field.
pub struct FormStep<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub default: Option<String>,
    pub index: usize,
    pub total: usize,
}

/// Contract for a concrete form: its fields, the values it starts from, and
/// how collected values become the output record.
pub trait FormFlow {
    type Output;
    type Error;

    fn descriptor(&self) -> &FormDescriptor;

    fn defaults(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error>;
}

/// Drives a [`FormFlow`] using a [`FormInteraction`] implementation.
pub struct FormEngine<'a, F: FormFlow> {
    flow: &'a F,
}

impl<'a, F: FormFlow> FormEngine<'a, F> {
    pub fn new(flow: &'a F) -> Self {
        Self { flow }
    }

    pub fn run<I: FormInteraction>(
        &self,
        interaction: &mut I,
    ) -> Result<FormResult<F::Output>, F::Error> {
        let descriptor = self.flow.descriptor();
        let mut session = FormSession::new(descriptor, self.flow.defaults());

        loop {
            if session.cancelled {
                return Ok(FormResult::Cancelled);
            }

            if session.is_complete() {
                let summary = build_summary(descriptor, session.values());
                let lines = format_summary_lines(&summary);
                match interaction.confirm(&summary, &lines) {
                    ConfirmationResponse::Confirm => {
                        session.completed = true;
                        let output = self.flow.commit(session.values().clone())?;
                        return Ok(FormResult::Completed(output));
                    }
                    ConfirmationResponse::Back => {
                        if descriptor.fields.is_empty() {
                            return Ok(FormResult::Cancelled);
                        }
                        session.index = descriptor.fields.len() - 1;
                        continue;
                    }
                    ConfirmationResponse::Cancel => return Ok(FormResult::Cancelled),
                }
            }

            let Some(step) = session.current_field() else {
                continue;
            };
            let response = {
                let context = PromptContext {
                    descriptor: step.descriptor,
                    default: step.default.as_deref(),
                    index: step.index,
                    total: step.total,
                };
                interaction.prompt_field(&context)
            };
            if response == PromptResponse::Cancel {
                return Ok(FormResult::Cancelled);
            }
            // Invalid answers were reported by the session; ask again.
            let _ = session.apply_response(response);
        }
    }
}

fn format_summary_lines(summary: &FormSummary) -> Vec<String> {
    let mut lines = vec!["Review your entries:".to_string()];
    for (label, value) in &summary.entries {
        lines.push(format!("  {}: {}", label, value));
    }
    lines
}

fn build_summary(descriptor: &FormDescriptor, values: &BTreeMap<String, String>) -> FormSummary {
    let mut summary = FormSummary::default();
    for field in &descriptor.fields {
        let value = values
            .get(field.key)
            .cloned()
            .unwrap_or_else(|| "[unfilled]".to_string());
        summary.entries.push((field.label.to_string(), value));
    }
    summary
}
