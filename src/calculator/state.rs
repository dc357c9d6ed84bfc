//! The calculator state machine.
//!
//! [`CalculatorState`] owns the expression buffer, the last committed result
//! and the just-evaluated flag. Every action mutates that triple and returns
//! the text the display layer should show.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::detection;
use super::evaluation::{self, CalcResult};
use super::format::NumberFormat;
use super::input;

/// Default error text shown when a commit fails.
pub const DEFAULT_ERROR_TEXT: &str = "Error";

/// Default expression text for an empty buffer (a non-breaking space, so
/// the expression line keeps its height).
pub const DEFAULT_EMPTY_PLACEHOLDER: &str = "\u{00A0}";

/// The two lines the display layer renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    /// The raw buffer, or the placeholder when it is empty.
    pub expression_text: String,
    /// The preview, committed result or error text.
    pub result_text: String,
}

/// Introspection view of the state triple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub buffer: String,
    pub last_result: Option<f64>,
    pub just_evaluated: bool,
}

/// Presentation settings used when rendering [`Display`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
    pub format: NumberFormat,
    pub error_text: String,
    pub empty_placeholder: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            format: NumberFormat::default(),
            error_text: DEFAULT_ERROR_TEXT.to_string(),
            empty_placeholder: DEFAULT_EMPTY_PLACEHOLDER.to_string(),
        }
    }
}

/// Decide what the result area shows for a buffer that has not been
/// committed.
///
/// Pending buffers (ending in an operator, whitespace, `.` or `(`) are never
/// evaluated. A buffer that fails to evaluate falls back silently. In both
/// cases the fallback is the last committed result, else `"0"`.
pub fn current_display(buffer: &str, last_result: Option<f64>, format: &NumberFormat) -> String {
    if buffer.is_empty() {
        return "0".to_string();
    }

    if detection::is_pending(buffer) {
        return fallback(format, last_result);
    }

    match evaluation::evaluate(buffer) {
        Ok(value) => format.format_display(value),
        Err(_) => fallback(format, last_result),
    }
}

fn fallback(format: &NumberFormat, last_result: Option<f64>) -> String {
    match last_result {
        Some(value) => format.format_display(value),
        None => "0".to_string(),
    }
}

#[derive(Clone, Debug, Default)]
pub struct CalculatorState {
    buffer: String,
    last_result: Option<f64>,
    just_evaluated: bool,
    options: DisplayOptions,
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DisplayOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn last_result(&self) -> Option<f64> {
        self.last_result
    }

    pub fn just_evaluated(&self) -> bool {
        self.just_evaluated
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Apply one action and return the resulting display.
    pub fn apply(&mut self, action: Action) -> Display {
        let result_text = match action {
            Action::Token(token) => {
                let (buffer, just_evaluated) =
                    input::append_token(&self.buffer, self.just_evaluated, token);
                self.buffer = buffer;
                self.just_evaluated = just_evaluated;
                self.preview()
            }
            Action::Percent => {
                let (buffer, just_evaluated) =
                    input::append_percent(&self.buffer, self.just_evaluated);
                self.buffer = buffer;
                self.just_evaluated = just_evaluated;
                self.preview()
            }
            Action::Neg => {
                self.buffer = input::toggle_sign(&self.buffer);
                self.just_evaluated = false;
                self.preview()
            }
            Action::Clear => {
                self.clear();
                self.preview()
            }
            Action::Enter => self.on_evaluate_command(),
        };

        tracing::debug!(
            ?action,
            buffer = %self.buffer,
            just_evaluated = self.just_evaluated,
            result = %result_text,
            "applied action"
        );

        Display {
            expression_text: self.expression_text(),
            result_text,
        }
    }

    /// Reset the buffer, the last result and the just-evaluated flag.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_result = None;
        self.just_evaluated = false;
    }

    /// The live preview for the current buffer.
    pub fn preview(&self) -> String {
        current_display(&self.buffer, self.last_result, &self.options.format)
    }

    /// The display derived from the current state, without applying
    /// anything.
    pub fn display(&self) -> Display {
        Display {
            expression_text: self.expression_text(),
            result_text: self.preview(),
        }
    }

    fn expression_text(&self) -> String {
        if self.buffer.is_empty() {
            self.options.empty_placeholder.clone()
        } else {
            self.buffer.clone()
        }
    }

    /// Evaluate and commit the buffer, returning the result text.
    ///
    /// An empty buffer shows `"0"` and changes nothing. On success the
    /// buffer is replaced by the formatted result, which also becomes the
    /// last result. On failure the buffer is left as it was so it can be
    /// corrected.
    pub fn on_evaluate_command(&mut self) -> String {
        if self.buffer.is_empty() {
            return "0".to_string();
        }

        let result = self.commit();
        result.display().to_string()
    }

    /// Evaluate the buffer and commit it if it computes.
    pub fn commit(&mut self) -> CalcResult {
        let result = evaluation::evaluate_expression(
            &self.buffer,
            &self.options.format,
            &self.options.error_text,
        );

        match &result {
            CalcResult::Success {
                value,
                clipboard_result,
                ..
            } => {
                tracing::info!(expression = %self.buffer, result = %clipboard_result, "committed");
                self.last_result = Some(*value);
                self.buffer = clipboard_result.clone();
                self.just_evaluated = true;
            }
            CalcResult::Error { expression, .. } => {
                tracing::debug!(%expression, "commit failed, keeping buffer");
                self.just_evaluated = false;
            }
        }

        result
    }

    /// Introspection of the state triple.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            buffer: self.buffer.clone(),
            last_result: self.last_result,
            just_evaluated: self.just_evaluated,
        }
    }

    /// Force the buffer, for testing and debugging. The next keystroke
    /// edits the forced text rather than replacing it.
    pub fn set_expr(&mut self, expr: impl Into<String>) -> Display {
        self.buffer = expr.into();
        self.just_evaluated = false;
        self.display()
    }
}
