//! Safe evaluation of the expression buffer.
//!
//! Evaluation always runs the same pipeline: display glyphs are mapped to
//! ASCII operators, `N%` is rewritten to `(N/100)`, the result is checked
//! against the arithmetic character whitelist, and only then is it parsed
//! and computed.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

use super::error::CalcError;
use super::format::NumberFormat;
use super::parser;

lazy_static! {
    /// A simple decimal literal immediately followed by `%`.
    static ref PERCENT_LITERAL: Regex = Regex::new(r"(\d+(?:\.\d*)?|\.\d+)%").unwrap();

    /// Characters allowed after normalization.
    static ref ARITHMETIC_CHARS: Regex = Regex::new(r"^[0-9+\-*/().\s%]+$").unwrap();
}

/// Result of committing an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum CalcResult {
    /// Successful calculation with a finite numeric result.
    Success {
        /// The expression that was evaluated.
        expression: String,
        /// The numeric value.
        value: f64,
        /// Formatted for display (may carry digit grouping).
        display_result: String,
        /// Canonical text; this is what replaces the buffer on commit.
        clipboard_result: String,
    },
    /// The expression could not be computed.
    Error {
        /// The expression that was evaluated.
        expression: String,
        /// Error text to display.
        message: String,
    },
}

impl CalcResult {
    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The numeric value, for successful results.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            Self::Error { .. } => None,
        }
    }

    /// Get the display string (result or error message).
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { message, .. } => message,
        }
    }

    /// Get the clipboard string (only for successful results).
    pub fn clipboard(&self) -> Option<&str> {
        match self {
            Self::Success {
                clipboard_result, ..
            } => Some(clipboard_result),
            Self::Error { .. } => None,
        }
    }
}

/// Map display-only glyphs to the ASCII operators the parser understands.
pub fn normalize_glyphs(raw: &str) -> Cow<'_, str> {
    if raw.is_ascii() {
        return Cow::Borrowed(raw);
    }

    raw.chars()
        .map(|c| match c {
            '×' | '✕' | '✖' | '·' | '∙' | '⋅' => '*',
            '÷' | '∕' | '⁄' => '/',
            '−' | '–' | '—' | '‒' | '‐' | '‑' | '﹣' | '－' => '-',
            '＋' => '+',
            other => other,
        })
        .collect::<String>()
        .into()
}

/// Rewrite every `N%` to `(N/100)`.
pub fn expand_percent(expr: &str) -> Cow<'_, str> {
    PERCENT_LITERAL.replace_all(expr, "($1/100)")
}

/// Evaluate an expression string.
///
/// Empty or whitespace-only input evaluates to `0`. Anything that fails the
/// character whitelist, does not parse, or produces a non-finite value is an
/// [`CalcError::InvalidExpression`].
pub fn evaluate(raw: &str) -> Result<f64, CalcError> {
    if raw.trim().is_empty() {
        return Ok(0.0);
    }

    let normalized = normalize_glyphs(raw);
    let expanded = expand_percent(&normalized);

    if !ARITHMETIC_CHARS.is_match(&expanded) {
        let offending = expanded
            .chars()
            .find(|c| !(c.is_ascii_digit() || c.is_whitespace() || "+-*/().%".contains(*c)))
            .unwrap_or('?');
        tracing::debug!(expression = raw, character = ?offending, "rejected by whitelist");
        return Err(CalcError::disallowed(offending));
    }

    let value = parser::compute(&expanded).inspect_err(|err| {
        tracing::debug!(expression = raw, error = %err, "failed to parse");
    })?;

    if value.is_finite() {
        Ok(value)
    } else {
        tracing::debug!(expression = raw, value, "non-finite result");
        Err(CalcError::non_finite())
    }
}

/// Evaluate an expression for a commit, formatting the outcome.
pub fn evaluate_expression(input: &str, format: &NumberFormat, error_text: &str) -> CalcResult {
    let expression = input.trim().to_string();

    match evaluate(&expression) {
        Ok(value) => CalcResult::Success {
            display_result: format.format_display(value),
            clipboard_result: format.format(Some(value)),
            value,
            expression,
        },
        Err(_) => CalcResult::Error {
            expression,
            message: error_text.to_string(),
        },
    }
}
