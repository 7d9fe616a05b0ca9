//! Error and warning types for boolean expressions

use super::operators::Operator;
use super::simplify::Change;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Errors related to boolean expression parsing
///
/// These errors occur when parsing a boolean formula string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionParseError {
    /// Failed to parse a boolean formula due to invalid syntax
    InvalidSyntax {
        /// What went wrong
        message: Arc<str>,
        /// The original input string that failed to parse
        input: Arc<str>,
        /// Optional character position in the input where the error occurred
        position: Option<usize>,
    },
    /// Parentheses nest deeper than the supported limit
    TooDeeplyNested {
        /// The original input string
        input: Arc<str>,
        /// Nesting depth reached
        depth: usize,
        /// Maximum supported depth
        limit: usize,
    },
}

impl fmt::Display for ExpressionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionParseError::InvalidSyntax {
                message,
                input,
                position,
            } => {
                if let Some(pos) = position {
                    write!(
                        f,
                        "Failed to parse boolean formula at position {}: {}. Input: {:?}",
                        pos, message, input
                    )
                } else {
                    write!(
                        f,
                        "Failed to parse boolean formula: {}. Input: {:?}",
                        message, input
                    )
                }
            }
            ExpressionParseError::TooDeeplyNested {
                input,
                depth,
                limit,
            } => write!(
                f,
                "Parentheses nested {} deep exceed the limit of {}. Input: {:?}",
                depth, limit, input
            ),
        }
    }
}

impl std::error::Error for ExpressionParseError {}

impl From<ExpressionParseError> for io::Error {
    fn from(err: ExpressionParseError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// Errors raised when a term receives more operands than its operator allows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityError {
    /// The term itself carries too many operands
    TooManyOperands {
        /// Operator of the rejected term
        operator: Operator,
        /// Number of operands supplied
        given: usize,
        /// Maximum accepted
        max: usize,
    },
    /// A binary-only term would extend a preceding term of the same operator
    /// past two operands
    ChainedBinary {
        /// Operator of both terms
        operator: Operator,
        /// Operands already held by the preceding term
        existing: usize,
        /// Operands supplied for the new term
        given: usize,
    },
}

impl fmt::Display for ArityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArityError::TooManyOperands {
                operator,
                given,
                max,
            } => write!(
                f,
                "{} accepts at most {} operand(s), got {}",
                operator, max, given
            ),
            ArityError::ChainedBinary {
                operator,
                existing,
                given,
            } => write!(
                f,
                "{} is binary: cannot follow a {} term holding {} operand(s) with {} more",
                operator, operator, existing, given
            ),
        }
    }
}

impl std::error::Error for ArityError {}

impl From<ArityError> for io::Error {
    fn from(err: ArityError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}

/// Errors raised while evaluating an expression or enumerating its truth table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// An operand names an input bound neither in the expression nor in the assignment
    UnknownInput {
        /// The unbound name
        name: Arc<str>,
    },
    /// Nested expressions exceed the supported depth
    TooDeeplyNested {
        /// Maximum supported depth
        limit: usize,
    },
    /// Too many inputs to enumerate every assignment
    TooManyInputs {
        /// Number of inputs to enumerate
        count: usize,
        /// Maximum supported
        limit: usize,
    },
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::UnknownInput { name } => {
                write!(f, "Input '{}' is not bound", name)
            }
            EvaluationError::TooDeeplyNested { limit } => {
                write!(f, "Nested expressions exceed the depth limit of {}", limit)
            }
            EvaluationError::TooManyInputs { count, limit } => write!(
                f,
                "Cannot enumerate {} inputs: at most {} are supported",
                count, limit
            ),
        }
    }
}

impl std::error::Error for EvaluationError {}

impl From<EvaluationError> for io::Error {
    fn from(err: EvaluationError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}

/// Errors raised by the simplifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimplifyError {
    /// The rewrite loop kept changing the expression past its pass budget
    DidNotConverge {
        /// Passes run before giving up
        passes: usize,
        /// Rewrites recorded so far
        changes: Vec<Change>,
    },
    /// Nested expressions exceed the configured depth
    TooDeeplyNested {
        /// Depth of the expression
        depth: usize,
        /// Configured maximum
        limit: usize,
    },
}

impl fmt::Display for SimplifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimplifyError::DidNotConverge { passes, changes } => write!(
                f,
                "Simplification did not converge after {} passes ({} rewrites recorded)",
                passes,
                changes.len()
            ),
            SimplifyError::TooDeeplyNested { depth, limit } => write!(
                f,
                "Expression nested {} deep exceeds the simplification limit of {}",
                depth, limit
            ),
        }
    }
}

impl std::error::Error for SimplifyError {}

impl From<SimplifyError> for io::Error {
    fn from(err: SimplifyError) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

/// Non-fatal conditions recorded alongside a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A `NOT` term was given an explicit operand
    ImpreciseNot {
        /// Number of operands supplied
        operands: usize,
    },
    /// A truth-table cell could not be resolved to a boolean
    UnresolvedResult {
        /// Output column
        output: Arc<str>,
        /// Row index (first input is the most significant bit)
        row: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ImpreciseNot { operands } => write!(
                f,
                "NOT with {} explicit operand(s) might not be accurate for multi-term expressions",
                operands
            ),
            Warning::UnresolvedResult { output, row } => write!(
                f,
                "Output '{}' is unresolved in row {} (NAND, NOR and XNOR chains are not fully supported)",
                output, row
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_parse_error_with_position() {
        let err = ExpressionParseError::InvalidSyntax {
            message: Arc::from("unexpected character '@'"),
            input: Arc::from("a @ b"),
            position: Some(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("position 2"));
        assert!(msg.contains("unexpected character"));
    }

    #[test]
    fn test_expression_parse_error_without_position() {
        let err = ExpressionParseError::InvalidSyntax {
            message: Arc::from("cannot resolve 'a+'"),
            input: Arc::from("a +"),
            position: None,
        };
        let msg = err.to_string();
        assert!(!msg.contains("position"));
        assert!(msg.contains("cannot resolve"));
    }

    #[test]
    fn test_expression_parse_error_to_io_error() {
        let err = ExpressionParseError::TooDeeplyNested {
            input: Arc::from("((a))"),
            depth: 2,
            limit: 1,
        };
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_arity_error_messages() {
        let err = ArityError::TooManyOperands {
            operator: Operator::Nand,
            given: 3,
            max: 2,
        };
        assert_eq!(err.to_string(), "NAND accepts at most 2 operand(s), got 3");

        let err = ArityError::ChainedBinary {
            operator: Operator::Nor,
            existing: 2,
            given: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("NOR is binary"));
        assert!(msg.contains("holding 2 operand(s)"));
    }

    #[test]
    fn test_evaluation_error_messages() {
        let err = EvaluationError::UnknownInput {
            name: Arc::from("q"),
        };
        assert_eq!(err.to_string(), "Input 'q' is not bound");

        let err = EvaluationError::TooManyInputs {
            count: 30,
            limit: 20,
        };
        assert!(err.to_string().contains("30 inputs"));

        let io_err: io::Error = EvaluationError::TooDeeplyNested { limit: 4 }.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_simplify_error_messages() {
        let err = SimplifyError::DidNotConverge {
            passes: 3,
            changes: vec![Change {
                step: "Combine ANDs".to_string(),
                formula: "a ∧ b".to_string(),
            }],
        };
        let msg = err.to_string();
        assert!(msg.contains("3 passes"));
        assert!(msg.contains("1 rewrites"));
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::UnresolvedResult {
            output: Arc::from("q"),
            row: 5,
        };
        assert!(warning.to_string().contains("row 5"));
        assert!(Warning::ImpreciseNot { operands: 1 }
            .to_string()
            .starts_with("NOT with 1"));
    }
}
