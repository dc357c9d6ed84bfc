//! Errors raised by the calculator core.

/// Why an expression could not be computed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    /// A character outside the arithmetic whitelist survived normalization.
    #[error("disallowed character {0:?}")]
    DisallowedCharacter(char),
    /// The text is not a well-formed arithmetic expression.
    #[error("{0}")]
    Syntax(String),
    /// The computed value is infinite or not a number.
    #[error("result is not a finite number")]
    NonFinite,
}

/// The single error kind of the safe evaluator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error("invalid expression: {reason}")]
    InvalidExpression { reason: InvalidReason },
}

impl CalcError {
    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::InvalidExpression {
            reason: InvalidReason::Syntax(message.into()),
        }
    }

    pub(crate) fn disallowed(c: char) -> Self {
        Self::InvalidExpression {
            reason: InvalidReason::DisallowedCharacter(c),
        }
    }

    pub(crate) fn non_finite() -> Self {
        Self::InvalidExpression {
            reason: InvalidReason::NonFinite,
        }
    }

    /// The underlying reason.
    pub fn reason(&self) -> &InvalidReason {
        match self {
            Self::InvalidExpression { reason } => reason,
        }
    }
}

/// A textual command name that does not correspond to any action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown action {0:?}")]
pub struct ParseActionError(pub String);
