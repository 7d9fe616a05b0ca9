//! Error types for the logic algebra library
//!
//! Each operation family has its own error enum in [`crate::expression::error`];
//! [`LogicError`] wraps all of them for callers that chain several operations
//! with `?`.

use crate::expression::error::{ArityError, EvaluationError, ExpressionParseError, SimplifyError};
use std::fmt;
use std::io;

/// Any error raised by the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicError {
    /// Parsing a formula failed
    Parse(ExpressionParseError),
    /// A term received more operands than its operator allows
    Arity(ArityError),
    /// Evaluation or truth table generation failed
    Evaluation(EvaluationError),
    /// Simplification failed
    Simplify(SimplifyError),
}

impl fmt::Display for LogicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicError::Parse(err) => write!(f, "{}", err),
            LogicError::Arity(err) => write!(f, "{}", err),
            LogicError::Evaluation(err) => write!(f, "{}", err),
            LogicError::Simplify(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LogicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogicError::Parse(err) => Some(err),
            LogicError::Arity(err) => Some(err),
            LogicError::Evaluation(err) => Some(err),
            LogicError::Simplify(err) => Some(err),
        }
    }
}

impl From<ExpressionParseError> for LogicError {
    fn from(err: ExpressionParseError) -> Self {
        LogicError::Parse(err)
    }
}

impl From<ArityError> for LogicError {
    fn from(err: ArityError) -> Self {
        LogicError::Arity(err)
    }
}

impl From<EvaluationError> for LogicError {
    fn from(err: EvaluationError) -> Self {
        LogicError::Evaluation(err)
    }
}

impl From<SimplifyError> for LogicError {
    fn from(err: SimplifyError) -> Self {
        LogicError::Simplify(err)
    }
}

// Keeps the error kind chosen by each family
impl From<LogicError> for io::Error {
    fn from(err: LogicError) -> Self {
        match err {
            LogicError::Parse(err) => err.into(),
            LogicError::Arity(err) => err.into(),
            LogicError::Evaluation(err) => err.into(),
            LogicError::Simplify(err) => err.into(),
        }
    }
}
