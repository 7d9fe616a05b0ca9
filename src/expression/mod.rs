//! Boolean expressions built from an ordered list of operator terms
//!
//! An [`Expression`] is a small program: a set of named inputs and a sequence of
//! [`Term`]s, each applying one [`Operator`] to a list of [`Operand`]s. Terms are
//! folded left to right, so the result of every term becomes the implicit leading
//! operand of the next one.
//!
//! # Main Types
//!
//! - [`Expression`] - inputs, terms, labeled outputs and the simplification log
//! - [`Term`] - one operator application
//! - [`Operand`] - an input name or a nested expression
//! - [`LogicValue`] - a boolean (or unresolved) value with an inversion flag
//!
//! # Construction
//!
//! Expressions can be built in four ways:
//!
//! 1. Builder methods: `Expression::new().and(["a", "b"]).or(["c"])`
//! 2. Free functions: `and(["a", "b"]).or(["c"])`
//! 3. Parsing: `Expression::parse("a*b+c")`
//! 4. The `formula!` macro: `formula!(a * b + c)`
//!
//! ```
//! use logic_algebra::{and, Expression};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let built = and(["a", "b"]).or(["c"]);
//! let parsed = Expression::parse("a*b+c")?;
//!
//! let mut assignment = HashMap::new();
//! assignment.insert(Arc::from("a"), true);
//! assignment.insert(Arc::from("b"), false);
//! assignment.insert(Arc::from("c"), true);
//!
//! assert_eq!(built.value_of(&assignment)?, Some(true));
//! assert_eq!(parsed.value_of(&assignment)?, Some(true));
//! assert_eq!(built.to_string(), "(a ∧ b) ∨ c");
//! # Ok(())
//! # }
//! ```
//!
//! # Evaluation order
//!
//! There is no operator precedence between terms. `or(["a"]).and(["b"])` folds as
//! `(a) AND (b)`: each term's own operator decides how it merges with everything
//! before it.

mod conversions;
mod display;
pub mod error;
mod eval;
mod labels;
mod operators;
mod parser;
mod simplify;
mod truth_table;

pub use display::{bar, Dialect};
pub use error::{ArityError, EvaluationError, ExpressionParseError, SimplifyError, Warning};
pub use eval::Assignment;
pub use labels::Output;
pub use operators::Operator;
pub use simplify::Change;
pub use truth_table::{InputColumn, TruthRow, TruthTable, TruthVector};

use log::warn;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Input bindings of an expression, ordered alphabetically by name
pub type Inputs = BTreeMap<Arc<str>, LogicValue>;

/// A boolean value that may be unresolved, with an inversion flag
///
/// The effective value is the raw value XOR the inversion flag. An unresolved
/// value stays unresolved regardless of inversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogicValue {
    value: Option<bool>,
    inverted: bool,
}

impl LogicValue {
    /// A value that has not been assigned yet
    pub const UNRESOLVED: LogicValue = LogicValue {
        value: None,
        inverted: false,
    };

    /// Create a resolved, non-inverted value
    pub fn new(value: bool) -> Self {
        LogicValue {
            value: Some(value),
            inverted: false,
        }
    }

    /// The effective value, taking inversion into account
    pub fn value(&self) -> Option<bool> {
        self.value.map(|value| value != self.inverted)
    }

    /// The raw value as assigned, ignoring inversion
    pub fn raw(&self) -> Option<bool> {
        self.value
    }

    /// Whether the value is inverted
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Assign a raw value
    pub fn set(&mut self, value: bool) {
        self.value = Some(value);
    }

    /// Flip the inversion flag
    pub fn toggle_inverted(&mut self) {
        self.inverted = !self.inverted;
    }

    pub(crate) fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }
}

/// An operand of a [`Term`]
///
/// Nested expressions are shared behind an [`Arc`]: cloning an operand copies the
/// handle, and a nested expression can only refer to expressions that existed
/// before it, so operand graphs are acyclic by construction.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Reference to a named input
    Input(Arc<str>),
    /// A sub-expression evaluated against the parent's bindings
    Nested(Arc<Expression>),
}

impl Operand {
    /// The input name, if this operand is an input reference
    pub fn name(&self) -> Option<&str> {
        match self {
            Operand::Input(name) => Some(name),
            Operand::Nested(_) => None,
        }
    }

    /// The nested expression, if this operand is one
    pub fn nested(&self) -> Option<&Expression> {
        match self {
            Operand::Input(_) => None,
            Operand::Nested(expr) => Some(expr),
        }
    }
}

/// Operands compare by name, or by term structure for nested expressions
impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Operand::Input(a), Operand::Input(b)) => a == b,
            (Operand::Nested(a), Operand::Nested(b)) => Arc::ptr_eq(a, b) || a.terms == b.terms,
            _ => false,
        }
    }
}

/// One operator application: the unit of evaluation and rewriting
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    operator: Operator,
    operands: Vec<Operand>,
}

impl Term {
    /// Create a term from an operator and its operands
    ///
    /// No arity checking happens here; see [`Expression::push_term`].
    pub fn new<I, O>(operator: Operator, operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        Term {
            operator,
            operands: operands.into_iter().map(Into::into).collect(),
        }
    }

    /// The operator of this term
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The operands in insertion order
    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }
}

/// A boolean expression: named inputs, an ordered list of terms and labeled outputs
///
/// Cloning duplicates the term list and outputs; nested expressions are shared
/// handles. See the [module documentation](self) for the evaluation model.
///
/// # Examples
///
/// ```
/// use logic_algebra::Expression;
///
/// # fn main() -> Result<(), logic_algebra::ArityError> {
/// let expr = Expression::new()
///     .and(["a", "b"])
///     .nand(["c"])?
///     .label(Some("q"), false);
///
/// assert_eq!(expr.to_string(), "(a ∧ b) ⊼ c");
/// assert_eq!(expr.outputs()[0].label(), "q");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Expression {
    inputs: Inputs,
    terms: Vec<Term>,
    outputs: Vec<Output>,
    original: Option<Arc<str>>,
    changes: Vec<Change>,
    warnings: Vec<Warning>,
}

/// Expressions are equal when they bind the same inputs and fold the same terms
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.inputs == other.inputs && self.terms == other.terms
    }
}

impl Expression {
    /// Create an empty expression
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble an expression from raw terms
    ///
    /// Inputs are not registered, so evaluating a name that was never bound with
    /// [`Expression::assign`] or an assignment fails with
    /// [`EvaluationError::UnknownInput`].
    pub fn with_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Expression {
            terms: terms.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Input bindings, ordered by name
    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Input names in alphabetical order
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(|name| name.as_ref())
    }

    /// The terms in fold order
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Whether the expression has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Non-fatal warnings raised while building the expression
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The text captured when simplification first started
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    /// Append a term after checking the operator's arity
    ///
    /// Plain names register an unresolved input when unseen; nested expressions
    /// contribute their inputs (existing bindings win). On error the expression
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// - [`ArityError::TooManyOperands`] when `NAND`/`NOR`/`XNOR` get more than two
    ///   operands or `NOT` more than one
    /// - [`ArityError::ChainedBinary`] when a binary-only term would extend a
    ///   preceding term of the same operator past two operands
    pub fn push_term<I, O>(&mut self, operator: Operator, operands: I) -> Result<&mut Self, ArityError>
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        let operands: Vec<Operand> = operands.into_iter().map(Into::into).collect();
        self.check_arity(operator, operands.len())?;
        if operator == Operator::Not && !operands.is_empty() {
            warn!("NOT with an explicit operand might not be accurate for multi-term expressions");
            self.warnings.push(Warning::ImpreciseNot {
                operands: operands.len(),
            });
        }
        self.append(operator, operands);
        Ok(self)
    }

    fn check_arity(&self, operator: Operator, given: usize) -> Result<(), ArityError> {
        let Some(max) = operator.max_operands() else {
            return Ok(());
        };
        if given > max {
            return Err(ArityError::TooManyOperands {
                operator,
                given,
                max,
            });
        }
        if operator.is_binary_only() {
            if let Some(last) = self.terms.last().filter(|term| term.operator == operator) {
                let existing = last.operands.len();
                if existing + given > max {
                    return Err(ArityError::ChainedBinary {
                        operator,
                        existing,
                        given,
                    });
                }
            }
        }
        Ok(())
    }

    fn append(&mut self, operator: Operator, operands: Vec<Operand>) {
        for operand in &operands {
            match operand {
                Operand::Input(name) => {
                    self.inputs
                        .entry(Arc::clone(name))
                        .or_insert(LogicValue::UNRESOLVED);
                }
                Operand::Nested(nested) => self.merge_inputs(&nested.inputs),
            }
        }
        self.terms.push(Term { operator, operands });
    }

    /// Add bindings that are not present yet; existing bindings win
    fn merge_inputs(&mut self, other: &Inputs) {
        for (name, value) in other {
            self.inputs.entry(Arc::clone(name)).or_insert(*value);
        }
    }

    fn unbounded<I, O>(mut self, operator: Operator, operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.append(operator, operands.into_iter().map(Into::into).collect());
        self
    }

    /// Append an `AND` term
    pub fn and<I, O>(self, operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.unbounded(Operator::And, operands)
    }

    /// Append an `OR` term
    pub fn or<I, O>(self, operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.unbounded(Operator::Or, operands)
    }

    /// Append an `XOR` term
    pub fn xor<I, O>(self, operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.unbounded(Operator::Xor, operands)
    }

    /// Append a `NAND` term (at most two operands)
    pub fn nand<I, O>(mut self, operands: I) -> Result<Self, ArityError>
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.push_term(Operator::Nand, operands)?;
        Ok(self)
    }

    /// Append a `NOR` term (at most two operands)
    pub fn nor<I, O>(mut self, operands: I) -> Result<Self, ArityError>
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.push_term(Operator::Nor, operands)?;
        Ok(self)
    }

    /// Append an `XNOR` term (at most two operands)
    pub fn xnor<I, O>(mut self, operands: I) -> Result<Self, ArityError>
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.push_term(Operator::Xnor, operands)?;
        Ok(self)
    }

    /// Append a `NOT` term
    ///
    /// Without operands this negates everything folded so far. A single operand
    /// is accepted with an [`Warning::ImpreciseNot`] warning.
    pub fn not<I, O>(mut self, operands: I) -> Result<Self, ArityError>
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        self.push_term(Operator::Not, operands)?;
        Ok(self)
    }

    /// Negate everything folded so far
    pub fn negate(mut self) -> Self {
        self.append(Operator::Not, Vec::new());
        self
    }

    /// Toggle the inversion of the named inputs
    ///
    /// Output labels mentioning an inverted name are rewritten to the barred form
    /// (and back on a second call).
    pub fn invert<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.invert_inputs(names);
        self
    }

    /// Set the inversion flag of one input, registering it when unseen
    pub fn set_inverted(&mut self, name: &str, inverted: bool) -> &mut Self {
        self.inputs
            .entry(Arc::from(name))
            .or_insert(LogicValue::UNRESOLVED)
            .set_inverted(inverted);
        self
    }

    /// Store a raw value for an input, registering it when unseen
    ///
    /// Stored values are used by [`Expression::evaluate`] and as the fallback for
    /// names missing from an assignment.
    pub fn assign(&mut self, name: &str, value: bool) -> &mut Self {
        self.inputs
            .entry(Arc::from(name))
            .or_insert(LogicValue::UNRESOLVED)
            .set(value);
        self
    }

    /// Nested expressions directly referenced by this expression's terms
    fn nested(&self) -> impl Iterator<Item = &Arc<Expression>> {
        self.terms
            .iter()
            .flat_map(|term| &term.operands)
            .filter_map(|operand| match operand {
                Operand::Nested(nested) => Some(nested),
                Operand::Input(_) => None,
            })
    }

    /// Maximum nesting depth of sub-expressions (0 for a flat expression)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Expression, usize)> = vec![(self, 0)];
        while let Some((expr, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(expr.nested().map(|nested| (nested.as_ref(), depth + 1)));
        }
        deepest
    }

    /// Number of terms, counting those of nested expressions
    pub fn term_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Expression> = vec![self];
        while let Some(expr) = stack.pop() {
            count += expr.terms.len();
            stack.extend(expr.nested().map(|nested| nested.as_ref()));
        }
        count
    }

    /// Names referenced by any term, nested expressions included
    pub fn referenced_inputs(&self) -> BTreeSet<Arc<str>> {
        let mut names = BTreeSet::new();
        let mut stack: Vec<&Expression> = vec![self];
        while let Some(expr) = stack.pop() {
            for operand in expr.terms.iter().flat_map(|term| &term.operands) {
                match operand {
                    Operand::Input(name) => {
                        names.insert(Arc::clone(name));
                    }
                    Operand::Nested(nested) => stack.push(nested),
                }
            }
        }
        names
    }
}

/// Create an expression with a single `AND` term
pub fn and<I, O>(operands: I) -> Expression
where
    I: IntoIterator<Item = O>,
    O: Into<Operand>,
{
    Expression::new().and(operands)
}

/// Create an expression with a single `OR` term
pub fn or<I, O>(operands: I) -> Expression
where
    I: IntoIterator<Item = O>,
    O: Into<Operand>,
{
    Expression::new().or(operands)
}

/// Create an expression with a single `XOR` term
pub fn xor<I, O>(operands: I) -> Expression
where
    I: IntoIterator<Item = O>,
    O: Into<Operand>,
{
    Expression::new().xor(operands)
}

/// Create an expression with a single `NAND` term
pub fn nand<I, O>(operands: I) -> Result<Expression, ArityError>
where
    I: IntoIterator<Item = O>,
    O: Into<Operand>,
{
    Expression::new().nand(operands)
}

/// Create an expression with a single `NOR` term
pub fn nor<I, O>(operands: I) -> Result<Expression, ArityError>
where
    I: IntoIterator<Item = O>,
    O: Into<Operand>,
{
    Expression::new().nor(operands)
}

/// Create an expression with a single `XNOR` term
pub fn xnor<I, O>(operands: I) -> Result<Expression, ArityError>
where
    I: IntoIterator<Item = O>,
    O: Into<Operand>,
{
    Expression::new().xnor(operands)
}

/// Create an expression negating a single operand
///
/// `not(["a"])` evaluates to the negation of `a`.
pub fn not<I, O>(operands: I) -> Result<Expression, ArityError>
where
    I: IntoIterator<Item = O>,
    O: Into<Operand>,
{
    Expression::new().not(operands)
}

#[cfg(test)]
mod tests;
