//! Operator kinds and operator overloading for boolean expressions

use super::Expression;
use std::fmt;
use std::ops::{Add, BitXor, Mul, Not};

/// The operator of a [`Term`](super::Term)
///
/// `And`, `Or` and `Xor` take any number of operands. `Nand`, `Nor` and `Xnor`
/// are binary, and `Not` takes at most one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
    Not,
}

impl Operator {
    /// Every operator, in declaration order
    pub const ALL: [Operator; 7] = [
        Operator::And,
        Operator::Or,
        Operator::Xor,
        Operator::Nand,
        Operator::Nor,
        Operator::Xnor,
        Operator::Not,
    ];

    /// Maximum number of operands a single term accepts, if bounded
    pub fn max_operands(self) -> Option<usize> {
        match self {
            Operator::And | Operator::Or | Operator::Xor => None,
            Operator::Nand | Operator::Nor | Operator::Xnor => Some(2),
            Operator::Not => Some(1),
        }
    }

    /// Whether the operator is only defined on exactly two values
    pub fn is_binary_only(self) -> bool {
        matches!(self, Operator::Nand | Operator::Nor | Operator::Xnor)
    }

    /// The unicode glyph used when rendering
    pub fn glyph(self) -> char {
        match self {
            Operator::And => '∧',
            Operator::Or => '∨',
            Operator::Xor => '⊕',
            Operator::Nand => '⊼',
            Operator::Nor => '⊽',
            Operator::Xnor => '⊻',
            Operator::Not => '¬',
        }
    }

    pub(crate) fn separator(self) -> &'static str {
        match self {
            Operator::And => " ∧ ",
            Operator::Or => " ∨ ",
            Operator::Xor => " ⊕ ",
            Operator::Nand => " ⊼ ",
            Operator::Nor => " ⊽ ",
            Operator::Xnor => " ⊻ ",
            Operator::Not => " ¬ ",
        }
    }

    /// Upper-case name, as used in logs and error messages
    pub fn name(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::Nand => "NAND",
            Operator::Nor => "NOR",
            Operator::Xnor => "XNOR",
            Operator::Not => "NOT",
        }
    }

    /// The dual operator for absorption and distribution (`AND` ↔ `OR`)
    pub fn complement(self) -> Option<Operator> {
        match self {
            Operator::And => Some(Operator::Or),
            Operator::Or => Some(Operator::And),
            _ => None,
        }
    }

    /// Combine two values with the operator's two-input truth function
    ///
    /// `Not` ignores its second argument.
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Operator::And => a && b,
            Operator::Or => a || b,
            Operator::Xor => a != b,
            Operator::Nand => !(a && b),
            Operator::Nor => !(a || b),
            Operator::Xnor => a == b,
            Operator::Not => !a,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical AND of two expressions: `&a * &b`
///
/// Both sides become nested operands of a fresh single-term expression.
///
/// # Examples
///
/// ```
/// use logic_algebra::{and, or};
///
/// let a = and(["a", "b"]);
/// let b = or(["c", "d"]);
/// let result = &a * &b;
/// assert_eq!(result.to_string(), "(a ∧ b) ∧ (c ∨ d)");
/// ```
impl Mul for &Expression {
    type Output = Expression;

    fn mul(self, rhs: &Expression) -> Expression {
        Expression::new().and([self, rhs])
    }
}

/// Logical AND of two owned expressions: `a * b`
impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        Expression::new().and([self, rhs])
    }
}

/// Logical OR of two expressions: `&a + &b`
///
/// # Examples
///
/// ```
/// use logic_algebra::and;
///
/// let result = &and(["a", "b"]) + &and(["c"]);
/// assert_eq!(result.to_string(), "(a ∧ b) ∨ (c)");
/// ```
impl Add for &Expression {
    type Output = Expression;

    fn add(self, rhs: &Expression) -> Expression {
        Expression::new().or([self, rhs])
    }
}

/// Logical OR of two owned expressions: `a + b`
impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Expression {
        Expression::new().or([self, rhs])
    }
}

/// Logical XOR of two expressions: `&a ^ &b`
impl BitXor for &Expression {
    type Output = Expression;

    fn bitxor(self, rhs: &Expression) -> Expression {
        Expression::new().xor([self, rhs])
    }
}

/// Logical XOR of two owned expressions: `a ^ b`
impl BitXor for Expression {
    type Output = Expression;

    fn bitxor(self, rhs: Expression) -> Expression {
        Expression::new().xor([self, rhs])
    }
}

/// Logical NOT: `!&a` appends an operand-less `NOT` term to a copy
///
/// # Examples
///
/// ```
/// use logic_algebra::and;
///
/// let a = and(["a", "b"]);
/// assert_eq!((!&a).to_string(), "¬(a ∧ b)");
/// ```
impl Not for &Expression {
    type Output = Expression;

    fn not(self) -> Expression {
        self.clone().negate()
    }
}

/// Logical NOT of an owned expression: `!a`
impl Not for Expression {
    type Output = Expression;

    fn not(self) -> Expression {
        self.negate()
    }
}
