//! Rendering fields as input controls
//!
//! [`FieldControl`] holds the input-boundary behaviour shared by every
//! renderer: text is cut to the field's `maxlength` before it is stored, and
//! radio selections store the chosen option verbatim. [`TerminalRenderer`]
//! prompts interactively; [`ScriptedRenderer`] reads an answers document.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::Diagnostic;
use thiserror::Error;

use crate::form::answers::Answers;
use crate::form::state::FormState;
use crate::schema::{ButtonSpec, FieldSpec, FieldType, StepSpec};

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("Prompt failed for field '{field}'")]
    #[diagnostic(code(udyam::render::prompt))]
    Prompt {
        field: String,
        #[source]
        source: dialoguer::Error,
    },

    #[error("Button selection failed on step '{step}'")]
    #[diagnostic(code(udyam::render::button))]
    ButtonPrompt {
        step: String,
        #[source]
        source: dialoguer::Error,
    },

    #[error("'{value}' is not an option for field '{field}'")]
    #[diagnostic(code(udyam::render::unknown_option), help("Valid options: {options}"))]
    UnknownOption {
        field: String,
        value: String,
        options: String,
    },
}

/// The control a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldControl<'a> {
    Text { max_len: Option<usize> },
    Radio { options: &'a [String] },
}

impl<'a> FieldControl<'a> {
    pub fn for_field(field: &'a FieldSpec) -> Self {
        match field.field_type {
            FieldType::Text => FieldControl::Text {
                max_len: field.max_length(),
            },
            FieldType::Radio => FieldControl::Radio {
                options: &field.options,
            },
        }
    }

    /// Apply the input cap to raw text
    pub fn accept_text(&self, raw: &str) -> String {
        match self {
            FieldControl::Text { max_len: Some(max) } => raw.chars().take(*max).collect(),
            _ => raw.to_string(),
        }
    }

    /// Option literal at `index`, for radio controls
    pub fn select(&self, index: usize) -> Option<&'a str> {
        match self {
            FieldControl::Radio { options } => options.get(index).map(String::as_str),
            FieldControl::Text { .. } => None,
        }
    }

    /// Index of an option literal, for radio controls
    pub fn position(&self, value: &str) -> Option<usize> {
        match self {
            FieldControl::Radio { options } => options.iter().position(|o| o == value),
            FieldControl::Text { .. } => None,
        }
    }
}

/// Renders fields and button choices for the active step
pub trait FieldRenderer {
    /// Render one field and write any change into `state`
    fn render_field(
        &mut self,
        step: &StepSpec,
        field: &FieldSpec,
        state: &mut FormState,
    ) -> Result<(), RenderError>;

    /// Choose which of the step's buttons to activate
    fn choose_button<'s>(&mut self, step: &'s StepSpec) -> Result<Option<&'s ButtonSpec>, RenderError>;
}

/// Render every field of a step, in order
pub fn render_step<R: FieldRenderer + ?Sized>(
    renderer: &mut R,
    step: &StepSpec,
    state: &mut FormState,
) -> Result<(), RenderError> {
    step.fields
        .iter()
        .try_for_each(|field| renderer.render_field(step, field, state))
}

/// Interactive terminal prompts
pub struct TerminalRenderer {
    theme: ColorfulTheme,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn format_prompt(field: &FieldSpec) -> String {
        let mut prompt = field.label.clone();
        if field.is_required() {
            prompt.push_str(" *");
        }
        if let Some(ref placeholder) = field.placeholder {
            prompt = format!("{} ({})", prompt, style(placeholder).dim());
        }
        prompt
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRenderer for TerminalRenderer {
    fn render_field(
        &mut self,
        _step: &StepSpec,
        field: &FieldSpec,
        state: &mut FormState,
    ) -> Result<(), RenderError> {
        let control = FieldControl::for_field(field);
        let prompt = Self::format_prompt(field);
        let prompt_err = |source| RenderError::Prompt {
            field: field.name.clone(),
            source,
        };

        // Error from the last validation run, shown until the field is re-entered
        if let Some(error) = state.error(&field.name) {
            println!("  {} {}", style("✗").red(), style(error).red());
        }

        match control {
            FieldControl::Text { max_len } => {
                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .allow_empty(true);
                if let Some(current) = state.value(&field.name) {
                    input = input.with_initial_text(current);
                }
                let raw = input.interact_text().map_err(prompt_err)?;
                let value = control.accept_text(&raw);
                if let Some(max) = max_len {
                    if value.len() < raw.len() {
                        println!("  {}", style(format!("Cut to {} characters", max)).dim());
                    }
                }
                state.set_value(&field.name, value);
            }
            FieldControl::Radio { options } => {
                let default = state
                    .value(&field.name)
                    .and_then(|v| control.position(v))
                    .unwrap_or(0);
                let index = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(options)
                    .default(default)
                    .interact()
                    .map_err(prompt_err)?;
                if let Some(option) = control.select(index) {
                    state.set_value(&field.name, option);
                }
            }
        }

        Ok(())
    }

    fn choose_button<'s>(&mut self, step: &'s StepSpec) -> Result<Option<&'s ButtonSpec>, RenderError> {
        if step.buttons.is_empty() {
            return Ok(None);
        }
        let texts: Vec<&str> = step.buttons.iter().map(|b| b.text.as_str()).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt("Action")
            .items(&texts)
            .default(texts.len() - 1)
            .interact()
            .map_err(|source| RenderError::ButtonPrompt {
                step: step.key.clone(),
                source,
            })?;
        Ok(step.buttons.get(index))
    }
}

/// Fills fields from an answers document and presses each step's
/// validating button
pub struct ScriptedRenderer {
    answers: Answers,
}

impl ScriptedRenderer {
    pub fn new(answers: Answers) -> Self {
        Self { answers }
    }
}

impl FieldRenderer for ScriptedRenderer {
    fn render_field(
        &mut self,
        step: &StepSpec,
        field: &FieldSpec,
        state: &mut FormState,
    ) -> Result<(), RenderError> {
        let Some(raw) = self.answers.value(&step.key, &field.name) else {
            return Ok(());
        };
        let control = FieldControl::for_field(field);
        match control {
            FieldControl::Text { .. } => state.set_value(&field.name, control.accept_text(raw)),
            FieldControl::Radio { options } => {
                let Some(option) = control.position(raw).and_then(|i| control.select(i)) else {
                    return Err(RenderError::UnknownOption {
                        field: field.name.clone(),
                        value: raw.to_string(),
                        options: options.join(", "),
                    });
                };
                state.set_value(&field.name, option);
            }
        }
        Ok(())
    }

    fn choose_button<'s>(&mut self, step: &'s StepSpec) -> Result<Option<&'s ButtonSpec>, RenderError> {
        Ok(step.validating_button())
    }
}
