//! Left-to-right evaluation of boolean expressions

use super::error::EvaluationError;
use super::{Expression, Inputs, LogicValue, Operand, Operator, Term};
use crate::MAX_NESTING_DEPTH;
use std::collections::HashMap;
use std::sync::Arc;

/// Raw input values keyed by name, as accepted by [`Expression::value_of`]
pub type Assignment = HashMap<Arc<str>, bool>;

/// Running result of the term fold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accumulator {
    /// No term has produced a value yet
    Empty,
    Resolved(bool),
    /// A term produced no definite value; later terms cannot recover one
    Indeterminate,
}

impl Accumulator {
    fn from_value(value: Option<bool>) -> Self {
        value.map_or(Accumulator::Indeterminate, Accumulator::Resolved)
    }

    fn value(self) -> Option<bool> {
        match self {
            Accumulator::Resolved(value) => Some(value),
            Accumulator::Empty | Accumulator::Indeterminate => None,
        }
    }
}

/// Reduce a term's values with its operator
///
/// Any unresolved value makes the whole term unresolved. Binary-only operators
/// pass a single value through and cannot resolve more than two.
fn reduce(operator: Operator, values: &[Option<bool>]) -> Option<bool> {
    let values: Vec<bool> = values.iter().copied().collect::<Option<_>>()?;
    match operator {
        Operator::And | Operator::Or | Operator::Xor => values
            .into_iter()
            .reduce(|acc, value| operator.apply(acc, value)),
        Operator::Nand | Operator::Nor | Operator::Xnor => match values.as_slice() {
            [single] => Some(*single),
            [a, b] => Some(operator.apply(*a, *b)),
            _ => None,
        },
        Operator::Not => values.first().map(|value| !value),
    }
}

/// Bindings of `base` overridden by everything in `top`
pub(super) fn overlay(base: &Inputs, top: &Inputs) -> Inputs {
    let mut scope = base.clone();
    scope.extend(top.iter().map(|(name, value)| (Arc::clone(name), *value)));
    scope
}

impl Expression {
    /// Evaluate the expression with the given raw input values
    ///
    /// Names missing from `assignment` fall back to the values stored with
    /// [`Expression::assign`]. Inverted inputs contribute their raw value XOR the
    /// inversion flag. Returns `Ok(None)` when the result cannot be resolved, either
    /// because an input has no value or because a binary-only operator met more
    /// than two values.
    ///
    /// Evaluation never mutates the expression.
    ///
    /// # Errors
    ///
    /// - [`EvaluationError::UnknownInput`] if an operand names an input bound nowhere
    /// - [`EvaluationError::TooDeeplyNested`] past [`MAX_NESTING_DEPTH`]
    ///
    /// # Examples
    ///
    /// ```
    /// use logic_algebra::{and, Assignment};
    /// use std::sync::Arc;
    ///
    /// # fn main() -> Result<(), logic_algebra::EvaluationError> {
    /// let expr = and(["a", "b"]).invert(["a"]);
    ///
    /// let mut assignment = Assignment::new();
    /// assignment.insert(Arc::from("a"), false);
    /// assignment.insert(Arc::from("b"), true);
    /// assert_eq!(expr.value_of(&assignment)?, Some(true));
    ///
    /// assignment.remove("b");
    /// assert_eq!(expr.value_of(&assignment)?, None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn value_of(&self, assignment: &Assignment) -> Result<Option<bool>, EvaluationError> {
        let scope = self.scope(assignment);
        self.fold(&scope, 0)
    }

    /// Evaluate with the values stored on the expression
    pub fn evaluate(&self) -> Result<Option<bool>, EvaluationError> {
        self.fold(&self.inputs, 0)
    }

    /// Top-level bindings with the assignment's raw values applied
    pub(super) fn scope(&self, assignment: &Assignment) -> Inputs {
        let mut scope = self.inputs.clone();
        for (name, value) in assignment {
            scope
                .entry(Arc::clone(name))
                .or_insert(LogicValue::UNRESOLVED)
                .set(*value);
        }
        scope
    }

    /// Fold the terms against a scope that already contains every visible binding
    pub(super) fn fold(&self, scope: &Inputs, depth: usize) -> Result<Option<bool>, EvaluationError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(EvaluationError::TooDeeplyNested {
                limit: MAX_NESTING_DEPTH,
            });
        }
        let mut acc = Accumulator::Empty;
        for term in &self.terms {
            acc = fold_term(term, acc, scope, depth)?;
        }
        Ok(acc.value())
    }
}

fn fold_term(
    term: &Term,
    acc: Accumulator,
    scope: &Inputs,
    depth: usize,
) -> Result<Accumulator, EvaluationError> {
    let mut values = Vec::with_capacity(term.operands.len() + 1);
    for operand in &term.operands {
        values.push(operand_value(operand, scope, depth)?);
    }

    if term.operator == Operator::Not {
        return Ok(match acc {
            Accumulator::Resolved(value) => Accumulator::Resolved(!value),
            Accumulator::Indeterminate => Accumulator::Indeterminate,
            Accumulator::Empty => match values.first() {
                Some(value) => Accumulator::from_value(value.map(|v| !v)),
                None => Accumulator::Empty,
            },
        });
    }

    match acc {
        Accumulator::Indeterminate => return Ok(Accumulator::Indeterminate),
        Accumulator::Resolved(value) => values.insert(0, Some(value)),
        Accumulator::Empty => {}
    }
    // an operand-less term leaves the running result untouched
    if values.is_empty() {
        return Ok(acc);
    }
    Ok(Accumulator::from_value(reduce(term.operator, &values)))
}

fn operand_value(operand: &Operand, scope: &Inputs, depth: usize) -> Result<Option<bool>, EvaluationError> {
    match operand {
        Operand::Input(name) => scope
            .get(name)
            .map(LogicValue::value)
            .ok_or_else(|| EvaluationError::UnknownInput {
                name: Arc::clone(name),
            }),
        Operand::Nested(nested) => nested.fold(&overlay(&nested.inputs, scope), depth + 1),
    }
}
