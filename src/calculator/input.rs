//! Buffer editing rules for typed tokens and the `percent` / `neg` commands.
//!
//! Every function here is pure: it takes the current buffer (and the
//! just-evaluated flag where it matters) and returns the replacement.
//! Rejected input returns the buffer unchanged.

use super::action::{Operator, Token};
use super::detection;

/// Append one token to the buffer.
///
/// Returns the new buffer and the new just-evaluated flag. Rules, first
/// match wins:
/// 1. Right after a commit, a token that starts an operand discards the
///    committed result; an operator continues from it.
/// 2. A decimal point is ignored if the trailing number already has one and
///    becomes `0.` if there is no trailing number.
/// 3. `+`, `*` and `/` cannot start an empty buffer. `-` can.
/// 4. An operator replaces any trailing run of operators and whitespace.
/// 5. Anything else is appended verbatim.
pub fn append_token(buffer: &str, just_evaluated: bool, token: Token) -> (String, bool) {
    let mut expr = if just_evaluated && token.starts_operand() {
        String::new()
    } else {
        buffer.to_string()
    };

    match token {
        Token::Decimal => match detection::trailing_number(&expr) {
            Some(number) if number.contains('.') => return (expr, just_evaluated),
            Some(_) => expr.push('.'),
            None => expr.push_str("0."),
        },
        Token::Operator(op) => {
            let head = detection::strip_trailing_operators(&expr);
            if head.is_empty() && op != Operator::Sub {
                return (buffer.to_string(), just_evaluated);
            }
            let head_len = head.len();
            expr.truncate(head_len);
            expr.push(op.symbol());
        }
        _ => expr.push(token.as_char()),
    }

    (expr, false)
}

/// Append `%` to the buffer if it ends in a digit.
pub fn append_percent(buffer: &str, just_evaluated: bool) -> (String, bool) {
    if detection::ends_with_digit(buffer) {
        (format!("{buffer}%"), false)
    } else {
        (buffer.to_string(), just_evaluated)
    }
}

/// Flip the sign of the trailing operand.
///
/// A positive operand `N` becomes `(-N)`; a negative one, bare or
/// parenthesized, loses its sign. Without a trailing operand the leading
/// minus of the whole buffer is toggled instead.
pub fn toggle_sign(buffer: &str) -> String {
    match detection::trailing_operand(buffer) {
        Some(operand) => {
            let head = &buffer[..operand.start];
            if operand.negative {
                format!("{head}{}", operand.magnitude)
            } else {
                format!("{head}(-{})", operand.magnitude)
            }
        }
        None => match buffer.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{buffer}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(d: u8) -> Token {
        Token::Digit(d)
    }

    fn op(c: char) -> Token {
        Token::from_char(c).unwrap()
    }

    fn type_all(tokens: &str) -> String {
        tokens.chars().fold(String::new(), |buffer, c| {
            append_token(&buffer, false, Token::from_char(c).unwrap()).0
        })
    }

    #[test]
    fn test_digits_append() {
        assert_eq!(type_all("123"), "123");
        assert_eq!(append_token("12+", false, digit(4)), ("12+4".to_string(), false));
    }

    #[test]
    fn test_fresh_expression_after_commit() {
        assert_eq!(append_token("19", true, digit(5)), ("5".to_string(), false));
        assert_eq!(append_token("19", true, Token::Decimal), ("0.".to_string(), false));
        assert_eq!(append_token("19", true, Token::OpenParen), ("(".to_string(), false));
    }

    #[test]
    fn test_operator_continues_after_commit() {
        assert_eq!(append_token("19", true, op('+')), ("19+".to_string(), false));
        assert_eq!(append_token("-4", true, op('*')), ("-4*".to_string(), false));
    }

    #[test]
    fn test_decimal_guard() {
        assert_eq!(append_token("3.1", false, Token::Decimal), ("3.1".to_string(), false));
        assert_eq!(append_token("3.", false, Token::Decimal), ("3.".to_string(), false));
        assert_eq!(append_token("3", false, Token::Decimal), ("3.".to_string(), false));
        assert_eq!(type_all("1.5+2.5"), "1.5+2.5");
    }

    #[test]
    fn test_decimal_starts_fraction() {
        assert_eq!(append_token("", false, Token::Decimal).0, "0.");
        assert_eq!(append_token("7*", false, Token::Decimal).0, "7*0.");
        assert_eq!(append_token("(", false, Token::Decimal).0, "(0.");
    }

    #[test]
    fn test_leading_operator_guard() {
        assert_eq!(append_token("", false, op('*')), (String::new(), false));
        assert_eq!(append_token("", false, op('+')), (String::new(), false));
        assert_eq!(append_token("", false, op('/')), (String::new(), false));
        assert_eq!(append_token("", false, op('-')), ("-".to_string(), false));
    }

    #[test]
    fn test_leading_minus_not_replaced_by_other_operator() {
        assert_eq!(append_token("-", false, op('*')).0, "-");
        assert_eq!(append_token("-", false, op('-')).0, "-");
    }

    #[test]
    fn test_consecutive_operators_collapse() {
        assert_eq!(type_all("3+*/"), "3/");
        assert_eq!(append_token("3+*", false, op('-')).0, "3-");
        assert_eq!(append_token("3 + ", false, op('*')).0, "3*");
    }

    #[test]
    fn test_parens_pass_through() {
        assert_eq!(type_all("(1+2)*3"), "(1+2)*3");
        assert_eq!(type_all("((2"), "((2");
    }

    #[test]
    fn test_percent() {
        assert_eq!(append_percent("50", false), ("50%".to_string(), false));
        assert_eq!(append_percent("50+", false), ("50+".to_string(), false));
        assert_eq!(append_percent("", false), (String::new(), false));
        assert_eq!(append_percent("50%", false), ("50%".to_string(), false));
        assert_eq!(append_percent("19", true), ("19%".to_string(), false));
    }

    #[test]
    fn test_toggle_sign() {
        assert_eq!(toggle_sign("12"), "(-12)");
        assert_eq!(toggle_sign("(-12)"), "12");
        assert_eq!(toggle_sign(&toggle_sign("12")), "12");
        assert_eq!(toggle_sign("3*4.5"), "3*(-4.5)");
        assert_eq!(toggle_sign("-7"), "7");
        assert_eq!(toggle_sign("3-5"), "3-(-5)");
    }

    #[test]
    fn test_toggle_sign_without_operand() {
        assert_eq!(toggle_sign(""), "-");
        assert_eq!(toggle_sign("-"), "");
        assert_eq!(toggle_sign("3+"), "-3+");
        assert_eq!(toggle_sign("-3+"), "3+");
    }
}
