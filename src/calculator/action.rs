//! Inputs understood by the calculator state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ParseActionError;

/// A binary (or, for `Sub`, unary) arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// The ASCII character stored in the buffer for this operator.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }
}

/// A single typed unit of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// A decimal digit, `0..=9`.
    Digit(u8),
    /// The decimal point.
    Decimal,
    Operator(Operator),
    OpenParen,
    CloseParen,
}

impl Token {
    /// Parse a raw buffer character into a token.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Self::Digit(c as u8 - b'0')),
            '.' => Some(Self::Decimal),
            '(' => Some(Self::OpenParen),
            ')' => Some(Self::CloseParen),
            _ => Operator::from_char(c).map(Self::Operator),
        }
    }

    /// The character appended to the buffer for this token.
    pub fn as_char(self) -> char {
        match self {
            Self::Digit(d) => char::from(b'0' + d.min(9)),
            Self::Decimal => '.',
            Self::Operator(op) => op.symbol(),
            Self::OpenParen => '(',
            Self::CloseParen => ')',
        }
    }

    /// Tokens that begin a new operand. Typed right after a commit, these
    /// start a fresh expression instead of extending the result.
    pub fn starts_operand(self) -> bool {
        matches!(self, Self::Digit(_) | Self::Decimal | Self::OpenParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A token or a named command fed into the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Token(Token),
    /// Reset buffer, last result and the just-evaluated flag.
    Clear,
    /// Toggle the sign of the trailing operand.
    Neg,
    /// Append `%` to the trailing number.
    Percent,
    /// Evaluate and commit the buffer.
    Enter,
}

impl From<Token> for Action {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clear" => Ok(Self::Clear),
            "neg" => Ok(Self::Neg),
            "percent" => Ok(Self::Percent),
            "enter" => Ok(Self::Enter),
            _ => {
                let mut chars = s.chars();
                match (chars.next().and_then(Token::from_char), chars.next()) {
                    (Some(token), None) => Ok(Self::Token(token)),
                    _ => Err(ParseActionError(s.to_string())),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!("7".parse::<Action>(), Ok(Action::Token(Token::Digit(7))));
        assert_eq!(".".parse::<Action>(), Ok(Action::Token(Token::Decimal)));
        assert_eq!(
            "/".parse::<Action>(),
            Ok(Action::Token(Token::Operator(Operator::Div)))
        );
        assert_eq!("(".parse::<Action>(), Ok(Action::Token(Token::OpenParen)));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("clear".parse::<Action>(), Ok(Action::Clear));
        assert_eq!("neg".parse::<Action>(), Ok(Action::Neg));
        assert_eq!("percent".parse::<Action>(), Ok(Action::Percent));
        assert_eq!("enter".parse::<Action>(), Ok(Action::Enter));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("12".parse::<Action>().is_err());
        assert!("x".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn test_token_chars_round_trip() {
        for c in "0123456789.+-*/()".chars() {
            assert_eq!(Token::from_char(c).map(Token::as_char), Some(c));
        }
    }
}
