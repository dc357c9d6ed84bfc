//! Recursive-descent evaluation of plain arithmetic.
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | '(' expr ')'
//! ```
//!
//! Nothing else is accepted, so there is no way for input to reach anything
//! but `f64` arithmetic.

use std::fmt;

use super::error::CalcError;

/// Parentheses and unary signs deeper than this are rejected.
const MAX_DEPTH: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Lexeme {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "number {n}"),
            Self::Plus => write!(f, "'+'"),
            Self::Minus => write!(f, "'-'"),
            Self::Star => write!(f, "'*'"),
            Self::Slash => write!(f, "'/'"),
            Self::Open => write!(f, "'('"),
            Self::Close => write!(f, "')'"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Lexeme>, CalcError> {
    let mut lexemes = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let lexeme = match c {
            c if c.is_whitespace() => continue,
            '+' => Lexeme::Plus,
            '-' => Lexeme::Minus,
            '*' => Lexeme::Star,
            '/' => Lexeme::Slash,
            '(' => Lexeme::Open,
            ')' => Lexeme::Close,
            '0'..='9' | '.' => {
                let mut end = start + c.len_utf8();
                let mut seen_point = c == '.';
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_ascii_digit() || (next == '.' && !seen_point) {
                        seen_point |= next == '.';
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[start..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::syntax(format!("malformed number {literal:?}")))?;
                Lexeme::Num(value)
            }
            other => return Err(CalcError::disallowed(other)),
        };
        lexemes.push(lexeme);
    }

    Ok(lexemes)
}

struct Parser<'a> {
    lexemes: &'a [Lexeme],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Lexeme> {
        self.lexemes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = self.peek();
        self.pos += 1;
        lexeme
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::syntax("expression nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Lexeme::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Lexeme::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Lexeme::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Lexeme::Slash) => {
                    self.pos += 1;
                    value /= self.unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some(Lexeme::Minus) => {
                self.pos += 1;
                self.descend()?;
                let value = -self.unary()?;
                self.depth -= 1;
                Ok(value)
            }
            Some(Lexeme::Plus) => {
                self.pos += 1;
                self.descend()?;
                let value = self.unary()?;
                self.depth -= 1;
                Ok(value)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.bump() {
            Some(Lexeme::Num(value)) => Ok(value),
            Some(Lexeme::Open) => {
                self.descend()?;
                let value = self.expr()?;
                match self.bump() {
                    Some(Lexeme::Close) => {
                        self.depth -= 1;
                        Ok(value)
                    }
                    Some(other) => Err(CalcError::syntax(format!("expected ')', found {other}"))),
                    None => Err(CalcError::syntax("unclosed '('")),
                }
            }
            Some(other) => Err(CalcError::syntax(format!("unexpected {other}"))),
            None => Err(CalcError::syntax("unexpected end of expression")),
        }
    }
}

/// Parse and compute an arithmetic expression over numbers, `+ - * /`,
/// parentheses and unary signs. The value may be non-finite; callers
/// decide what to do with that.
pub fn compute(input: &str) -> Result<f64, CalcError> {
    let lexemes = tokenize(input)?;
    let mut parser = Parser {
        lexemes: &lexemes,
        pos: 0,
        depth: 0,
    };

    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value),
        Some(extra) => Err(CalcError::syntax(format!("unexpected {extra} after expression"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::error::InvalidReason;

    #[test]
    fn test_precedence() {
        assert_eq!(compute("2+3*4"), Ok(14.0));
        assert_eq!(compute("(2+3)*4"), Ok(20.0));
        assert_eq!(compute("10-4-3"), Ok(3.0));
        assert_eq!(compute("12/3/2"), Ok(2.0));
    }

    #[test]
    fn test_unary() {
        assert_eq!(compute("-5+2"), Ok(-3.0));
        assert_eq!(compute("3*(-5)"), Ok(-15.0));
        assert_eq!(compute("3*-5"), Ok(-15.0));
        assert_eq!(compute("+4"), Ok(4.0));
        assert_eq!(compute("-(2+3)"), Ok(-5.0));
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(compute("0.5"), Ok(0.5));
        assert_eq!(compute(".5"), Ok(0.5));
        assert_eq!(compute("5."), Ok(5.0));
        assert_eq!(compute(" 1 + 2 "), Ok(3.0));
    }

    #[test]
    fn test_syntax_errors() {
        for input in ["", "3/", "3+", "(1+2", "1+2)", "2(3)", "1.2.3", ".", "*3", "()"] {
            let err = compute(input).unwrap_err();
            assert!(
                matches!(err.reason(), InvalidReason::Syntax(_)),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_disallowed_characters() {
        let err = compute("2^3").unwrap_err();
        assert_eq!(err.reason(), &InvalidReason::DisallowedCharacter('^'));
    }

    #[test]
    fn test_division_by_zero_is_not_finite() {
        assert_eq!(compute("1/0"), Ok(f64::INFINITY));
        assert!(compute("0/0").unwrap().is_nan());
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let input = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        assert!(compute(&input).is_err());
        let input = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(compute(&input), Ok(1.0));
    }
}
