//! # Logic Algebra
//!
//! Boolean algebra expressions that can be built programmatically or parsed
//! from text, evaluated under partial assignments, simplified with classical
//! algebra laws and tabulated into truth tables.
//!
//! ## Overview
//!
//! An [`Expression`] is an ordered list of [`Term`]s. Each term applies one
//! [`Operator`] (`AND`, `OR`, `XOR`, `NAND`, `NOR`, `XNOR`, `NOT`) to its
//! operands, and the running result of all earlier terms is folded into it as
//! an implicit first operand. There is no precedence: `(a ∧ b) ∨ c` is the
//! term list `AND(a, b)`, `OR(c)`.
//!
//! Values are three-valued: an input that has not been assigned is unresolved
//! (`None`), and unresolved values propagate through the fold.
//!
//! ## Building Expressions
//!
//! ```
//! use logic_algebra::{and, formula, Expression};
//!
//! # fn main() -> Result<(), logic_algebra::LogicError> {
//! // Builder methods
//! let built = Expression::new().and(["a", "b"]).or(["c"]);
//!
//! // Parsing, with `*`/`&` for AND, `+`/`|` for OR, `^` for XOR and `~`/`!` for NOT
//! let parsed = Expression::parse("a*b+c")?;
//!
//! // The formula! macro
//! let macro_built = formula!(a & b | c);
//!
//! assert_eq!(built.to_string(), "(a ∧ b) ∨ c");
//! assert_eq!(parsed.to_string(), macro_built.to_string());
//! # Ok(())
//! # }
//! ```
//!
//! ## Simplification
//!
//! [`Expression::simplify`] rewrites the term list with the idempotent,
//! associative, absorption and distributive laws until a fixed point, keeping
//! a log of every step:
//!
//! ```
//! use logic_algebra::Expression;
//!
//! # fn main() -> Result<(), logic_algebra::LogicError> {
//! let mut expr = Expression::parse("(a*b)+(a*c)")?;
//! expr.simplify()?;
//! assert_eq!(expr.to_string(), "a ∧ (b ∨ c)");
//!
//! for change in expr.changes() {
//!     println!("{}", change);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Truth Tables
//!
//! ```
//! use logic_algebra::Expression;
//!
//! # fn main() -> Result<(), logic_algebra::LogicError> {
//! let mut expr = Expression::parse("a ^ b")?;
//! let table = expr.truth_table()?;
//!
//! assert_eq!(table.len(), 4);
//! assert_eq!(table.column("a ⊕ b"), Some(vec![Some(false), Some(true), Some(true), Some(false)]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: simplification steps at `debug`
//! (or `info` with [`SimplifyConfig::trace`]), warnings at `warn`. Install any
//! logger to see them.

// Lets the formula! macro refer to `::logic_algebra` from inside this crate
extern crate self as logic_algebra;

// Public modules
pub mod error;
pub mod expression;

// Re-export high-level public API
pub use error::LogicError;
pub use expression::{
    and, bar, nand, nor, not, or, xnor, xor, ArityError, Assignment, Change, Dialect,
    EvaluationError, Expression, ExpressionParseError, InputColumn, Inputs, LogicValue, Operand,
    Operator, Output, SimplifyError, Term, TruthRow, TruthTable, TruthVector, Warning,
};
pub use logic_algebra_macros::formula;

/// Deepest nesting of sub-expressions accepted by evaluation, rendering and parsing
pub const MAX_NESTING_DEPTH: usize = 256;

/// Largest number of inputs a truth table enumerates
pub const MAX_TRUTH_TABLE_INPUTS: usize = 20;

/// Configuration for [`Expression::simplify_with_config`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifyConfig {
    /// Maximum number of passes; `None` scales with the number of terms
    pub max_passes: Option<usize>,
    /// Deepest nesting the simplifier descends into
    pub max_depth: usize,
    /// Log every rewrite at `info` instead of `debug`
    pub trace: bool,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        SimplifyConfig {
            max_passes: None,
            max_depth: MAX_NESTING_DEPTH,
            trace: false,
        }
    }
}

impl SimplifyConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Passes allowed for an expression with `term_count` terms
    pub fn pass_budget(&self, term_count: usize) -> usize {
        self.max_passes.unwrap_or(16 + 4 * term_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimplifyConfig::new();
        assert_eq!(config.max_passes, None);
        assert_eq!(config.max_depth, MAX_NESTING_DEPTH);
        assert!(!config.trace);
    }

    #[test]
    fn test_pass_budget() {
        let config = SimplifyConfig::default();
        assert_eq!(config.pass_budget(0), 16);
        assert_eq!(config.pass_budget(10), 56);

        let config = SimplifyConfig {
            max_passes: Some(3),
            ..SimplifyConfig::default()
        };
        assert_eq!(config.pass_budget(100), 3);
    }

    #[test]
    fn test_expression_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expression>();
        assert_send_sync::<LogicError>();
    }
}
