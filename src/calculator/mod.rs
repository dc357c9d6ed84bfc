//! Calculator core: the expression-editing state machine.
//!
//! This module provides functionality to:
//! - Edit an expression buffer one token or command at a time
//! - Decide whether the buffer can be previewed or is still pending
//! - Safely evaluate expressions with a closed arithmetic grammar
//! - Format results and copy them to the clipboard

mod action;
mod clipboard;
mod detection;
mod error;
mod evaluation;
mod format;
mod input;
mod parser;
mod state;

pub use action::{Action, Operator, Token};
pub use clipboard::{ClipboardError, copy_to_clipboard};
pub use detection::is_pending;
pub use error::{CalcError, InvalidReason, ParseActionError};
pub use evaluation::{CalcResult, evaluate, evaluate_expression, expand_percent, normalize_glyphs};
pub use format::{DEFAULT_PRECISION, NumberFormat, format_number};
pub use input::{append_percent, append_token, toggle_sign};
pub use state::{
    CalculatorState, DEFAULT_EMPTY_PLACEHOLDER, DEFAULT_ERROR_TEXT, Display, DisplayOptions,
    StateSnapshot, current_display,
};
