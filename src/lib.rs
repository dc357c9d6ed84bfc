//! A key-driven arithmetic expression editor.
//!
//! The [`calculator`] module holds the state machine that turns typed
//! tokens into an expression buffer and a live result preview. [`keys`]
//! maps keyboard input onto it, [`session`] shares one calculator between
//! threads and [`config`] loads user settings.

pub mod calculator;
pub mod config;
pub mod keys;
pub mod session;

pub use calculator::{Action, CalcError, CalculatorState, Display, StateSnapshot};
pub use config::Config;
pub use session::{Session, SessionHandle};
