//! Conversions into operands and expressions

use super::error::ExpressionParseError;
use super::{Expression, Operand, Term};
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// Operands
// ============================================================================

/// An input reference by name
impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Input(Arc::from(name))
    }
}

impl From<String> for Operand {
    fn from(name: String) -> Self {
        Operand::Input(Arc::from(name))
    }
}

impl From<&String> for Operand {
    fn from(name: &String) -> Self {
        Operand::Input(Arc::from(name.as_str()))
    }
}

impl From<Arc<str>> for Operand {
    fn from(name: Arc<str>) -> Self {
        Operand::Input(name)
    }
}

/// A nested expression, moved behind a shared handle
impl From<Expression> for Operand {
    fn from(expr: Expression) -> Self {
        Operand::Nested(Arc::new(expr))
    }
}

/// A nested copy of the expression
impl From<&Expression> for Operand {
    fn from(expr: &Expression) -> Self {
        Operand::Nested(Arc::new(expr.clone()))
    }
}

impl From<Arc<Expression>> for Operand {
    fn from(expr: Arc<Expression>) -> Self {
        Operand::Nested(expr)
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// A one-term expression; like [`Expression::with_terms`], no inputs are registered
impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Expression::with_terms([term])
    }
}

/// Parse with [`Expression::parse`]
///
/// # Examples
///
/// ```
/// use logic_algebra::Expression;
///
/// let expr: Expression = "a & !b".parse().unwrap();
/// assert_eq!(expr.to_string(), "a ∧ b\u{0304}");
/// ```
impl FromStr for Expression {
    type Err = ExpressionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse(s)
    }
}

impl TryFrom<&str> for Expression {
    type Error = ExpressionParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Expression::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{and, Operator};

    #[test]
    fn test_operand_from_names() {
        assert_eq!(Operand::from("a").name(), Some("a"));
        assert_eq!(Operand::from(String::from("b")).name(), Some("b"));
        assert_eq!(Operand::from(Arc::<str>::from("c")).name(), Some("c"));
    }

    #[test]
    fn test_operand_from_expression_shares_handle() {
        let shared = Arc::new(and(["a", "b"]));
        let first = Operand::from(Arc::clone(&shared));
        let second = Operand::from(Arc::clone(&shared));
        assert_eq!(first, second);
        assert_eq!(Arc::strong_count(&shared), 3);
    }

    #[test]
    fn test_nested_operands_compare_structurally() {
        assert_eq!(Operand::from(and(["a"])), Operand::from(&and(["a"])));
        assert_ne!(Operand::from(and(["a"])), Operand::from("a"));
    }

    #[test]
    fn test_from_term() {
        let expr = Expression::from(Term::new(Operator::Or, ["a", "b"]));
        assert!(expr.inputs().is_empty());
        assert_eq!(expr.to_string(), "a ∨ b");
    }

    #[test]
    fn test_try_from_str() {
        assert!(Expression::try_from("a * b").is_ok());
        assert!(Expression::try_from("a * (b").is_err());
    }
}
