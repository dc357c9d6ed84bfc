//! Trailing-token detection for the expression buffer.
//!
//! The token appender and the preview policy only ever look at the end of
//! the buffer: the number being typed, the operator run waiting for its
//! right operand, or the operand whose sign is about to be toggled.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches the numeric literal at the end of the buffer:
    /// `12`, `12.`, `12.5` or `.5`.
    static ref TRAILING_NUMBER: Regex = Regex::new(r"(\d+\.?\d*|\.\d*)$").unwrap();

    /// Matches a trailing run of operators and whitespace.
    static ref TRAILING_OPERATORS: Regex = Regex::new(r"[+\-*/\s]+$").unwrap();

    /// Matches the operand a sign toggle applies to: a plain or negative
    /// literal, bare or wrapped in parentheses.
    static ref TRAILING_OPERAND: Regex =
        Regex::new(r"(-?\d+(\.\d+)?|\(-?\d+(\.\d+)?\))$").unwrap();
}

/// The operand at the end of the buffer, as seen by the sign toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrailingOperand<'a> {
    /// Byte offset where the operand starts (including any sign or paren).
    pub start: usize,
    /// The unsigned digits of the operand, e.g. `12.5` for `(-12.5)`.
    pub magnitude: &'a str,
    /// Whether the operand currently carries a unary minus.
    pub negative: bool,
}

/// Return the numeric literal the buffer ends with, if any.
pub fn trailing_number(buffer: &str) -> Option<&str> {
    TRAILING_NUMBER.find(buffer).map(|m| m.as_str())
}

/// Return the buffer with any trailing operators and whitespace removed.
pub fn strip_trailing_operators(buffer: &str) -> &str {
    match TRAILING_OPERATORS.find(buffer) {
        Some(m) => &buffer[..m.start()],
        None => buffer,
    }
}

/// Locate the operand at the end of the buffer for a sign toggle.
///
/// A bare `-` only counts as the operand's sign when it is unary, i.e. at
/// the start of the buffer or right after an operator or `(`. In `3-5` the
/// minus is a subtraction and the operand is just `5`.
pub fn trailing_operand(buffer: &str) -> Option<TrailingOperand<'_>> {
    let m = TRAILING_OPERAND.find(buffer)?;
    let text = m.as_str();

    if let Some(inner) = text.strip_prefix('(') {
        let inner = inner.strip_suffix(')').unwrap_or(inner);
        let (magnitude, negative) = match inner.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (inner, false),
        };
        return Some(TrailingOperand {
            start: m.start(),
            magnitude,
            negative,
        });
    }

    match text.strip_prefix('-') {
        Some(rest) if is_binary_minus(&buffer[..m.start()]) => Some(TrailingOperand {
            start: m.start() + 1,
            magnitude: rest,
            negative: false,
        }),
        Some(rest) => Some(TrailingOperand {
            start: m.start(),
            magnitude: rest,
            negative: true,
        }),
        None => Some(TrailingOperand {
            start: m.start(),
            magnitude: text,
            negative: false,
        }),
    }
}

/// A minus preceded by something that ends an operand is a subtraction.
fn is_binary_minus(before: &str) -> bool {
    before
        .chars()
        .rev()
        .find(|c| !c.is_whitespace())
        .is_some_and(|prev| prev.is_ascii_digit() || matches!(prev, ')' | '%' | '.'))
}

/// Check whether the buffer is in a pending state: it ends in an operator,
/// whitespace, a decimal point or an open parenthesis and therefore has no
/// value yet.
pub fn is_pending(buffer: &str) -> bool {
    buffer
        .chars()
        .next_back()
        .is_some_and(|c| c.is_whitespace() || matches!(c, '+' | '-' | '*' | '/' | '.' | '('))
}

/// Check whether the buffer ends in an ASCII digit.
pub fn ends_with_digit(buffer: &str) -> bool {
    buffer.chars().next_back().is_some_and(|c| c.is_ascii_digit())
}
