//! Keyboard mapping.
//!
//! Hosts translate their platform key events into [`Key`]s; [`action_for_key`]
//! turns those into calculator actions. Keys with no meaning map to `None`
//! and should be ignored.

use crate::calculator::{Action, Operator, Token};

/// A platform-agnostic key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A character key, as produced by the keyboard layout.
    Char(char),
    Enter,
    Escape,
    Delete,
}

/// Map a key press to the action it triggers.
pub fn action_for_key(key: Key) -> Option<Action> {
    match key {
        Key::Enter => Some(Action::Enter),
        Key::Escape | Key::Delete => Some(Action::Clear),
        Key::Char(c) => action_for_char(c),
    }
}

fn action_for_char(c: char) -> Option<Action> {
    let action = match c {
        '=' => Action::Enter,
        '%' => Action::Percent,
        'c' | 'C' => Action::Clear,
        'n' | 'N' | '±' => Action::Neg,
        ',' => Action::Token(Token::Decimal),
        'x' | 'X' | '×' | '·' => Action::Token(Token::Operator(Operator::Mul)),
        '÷' => Action::Token(Token::Operator(Operator::Div)),
        '−' | '–' => Action::Token(Token::Operator(Operator::Sub)),
        c => return Token::from_char(c).map(Action::Token),
    };
    Some(action)
}

/// Map every character of `keys` to an action, skipping unmapped ones.
pub fn actions_for_keys(keys: &str) -> impl Iterator<Item = Action> + '_ {
    keys.chars().filter_map(|c| action_for_key(Key::Char(c)))
}
