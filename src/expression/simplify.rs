//! Term-rewriting simplification with classical boolean algebra laws
//!
//! Each pass applies, in order: flattening of a leading nested operand, operand
//! sorting, idempotence, associativity, absorption and distribution, then
//! recurses into nested operands. Passes repeat until one makes no rewrite.
//! Every logged rewrite appends a [`Change`] to the expression's log.
//!
//! All rewrites preserve the value of the expression under every assignment:
//! they only act on positions where the left-to-right fold makes the classical
//! law apply (for instance the distributive law only at the head of the term
//! list, where the first term does not combine with an earlier result).

use super::error::SimplifyError;
use super::{Expression, Inputs, Operand, Operator, Term};
use crate::SimplifyConfig;
use log::{debug, info, trace};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// One entry of the simplification log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// The rewrite that was applied
    pub step: String,
    /// The expression it was applied to, rendered after the rewrite
    pub formula: String,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "› {:<30} ⇒ {}", self.step, self.formula)
    }
}

const START_STEP: &str = "Simplifying boolean equation:";

struct Simplifier<'a> {
    config: &'a SimplifyConfig,
    changes: Vec<Change>,
}

impl Simplifier<'_> {
    fn record(&mut self, step: String, expr: &Expression) {
        let change = Change {
            step,
            formula: expr.to_string(),
        };
        if self.config.trace {
            info!("{}", change);
        } else {
            debug!("{}", change);
        }
        self.changes.push(change);
    }

    fn run(&mut self, expr: &mut Expression) -> Result<(), SimplifyError> {
        if expr.original.is_none() {
            let text: Arc<str> = expr.to_string().into();
            expr.original = Some(Arc::clone(&text));
            self.record(START_STEP.to_string(), expr);
        }

        let before = (expr.inputs.clone(), expr.terms.clone());
        let budget = self.config.pass_budget(expr.term_count());
        let mut passes = 0;
        loop {
            trace!("Simplification pass {} on {}", passes + 1, expr);
            let changed = self.pass(expr, 0)?;
            passes += 1;
            if !changed {
                break;
            }
            if passes >= budget {
                return Err(SimplifyError::DidNotConverge {
                    passes,
                    changes: self.changes.clone(),
                });
            }
        }
        debug!("Simplification converged after {} pass(es)", passes);

        expr.update_labels(&before.0, &before.1);
        for step in expr.remove_unused() {
            self.record(step, expr);
        }
        Ok(())
    }

    /// One rewrite pass over `expr` and its nested operands; true if anything changed
    fn pass(&mut self, expr: &mut Expression, depth: usize) -> Result<bool, SimplifyError> {
        if depth > self.config.max_depth {
            return Err(SimplifyError::TooDeeplyNested {
                depth,
                limit: self.config.max_depth,
            });
        }

        let logged = self.changes.len();
        let mut changed = expr.un_nest();
        for step in expr.sort_operands() {
            self.record(step, expr);
        }
        changed |= expr.un_nest();
        for step in expr.remove_duplicates() {
            self.record(step, expr);
        }
        for step in expr.associate() {
            self.record(step, expr);
        }
        if let Some(step) = expr.absorb() {
            self.record(step, expr);
        }
        if let Some(step) = expr.distribute() {
            expr.clean();
            self.record(step, expr);
        }
        changed |= self.changes.len() > logged;

        for term in &mut expr.terms {
            for operand in &mut term.operands {
                if let Operand::Nested(nested) = operand {
                    changed |= self.pass(Arc::make_mut(nested), depth + 1)?;
                }
            }
        }
        Ok(changed)
    }
}

fn operand_order(a: &Operand, b: &Operand) -> Ordering {
    match (a, b) {
        (Operand::Input(x), Operand::Input(y)) => x.cmp(y),
        (Operand::Input(_), Operand::Nested(_)) => Ordering::Less,
        (Operand::Nested(_), Operand::Input(_)) => Ordering::Greater,
        (Operand::Nested(_), Operand::Nested(_)) => Ordering::Equal,
    }
}

fn operand_label(operand: &Operand) -> String {
    match operand {
        Operand::Input(name) => name.to_string(),
        Operand::Nested(nested) => nested.render(None, true, true),
    }
}

fn quoted(operands: &[Operand]) -> String {
    operands
        .iter()
        .map(|operand| format!("'{}'", operand_label(operand)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_complementary(first: Operator, second: Operator) -> bool {
    first.complement() == Some(second)
}

/// Operands of a nested expression made of one term with the given operator
fn single_term(nested: &Expression, operator: Operator) -> Option<&[Operand]> {
    match nested.terms.as_slice() {
        [term] if term.operator == operator => Some(&term.operands),
        _ => None,
    }
}

impl Expression {
    /// Simplify in place with the default configuration
    ///
    /// The first call records the original text and a start entry in
    /// [`Expression::changes`]. Afterwards the label that named the original text
    /// is renamed to the simplified text, labels taken from the unsimplified
    /// terms get the simplified snapshot, and inputs that neither a term nor a
    /// label references are removed.
    ///
    /// # Errors
    ///
    /// - [`SimplifyError::TooDeeplyNested`] if nesting exceeds the configured depth
    /// - [`SimplifyError::DidNotConverge`] if the pass budget runs out
    ///
    /// # Examples
    ///
    /// ```
    /// use logic_algebra::Expression;
    ///
    /// # fn main() -> Result<(), logic_algebra::SimplifyError> {
    /// let mut expr = Expression::new().and(["b", "a", "a"]);
    /// expr.simplify()?;
    /// assert_eq!(expr.to_string(), "a ∧ b");
    /// assert_eq!(expr.original(), Some("b ∧ a ∧ a"));
    /// assert!(expr.changes().len() >= 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn simplify(&mut self) -> Result<&mut Self, SimplifyError> {
        self.simplify_with_config(&SimplifyConfig::default())
    }

    /// Simplify in place with an explicit configuration
    pub fn simplify_with_config(&mut self, config: &SimplifyConfig) -> Result<&mut Self, SimplifyError> {
        let depth = self.depth();
        if depth > config.max_depth {
            return Err(SimplifyError::TooDeeplyNested {
                depth,
                limit: config.max_depth,
            });
        }

        let mut simplifier = Simplifier {
            config,
            changes: std::mem::take(&mut self.changes),
        };
        let result = simplifier.run(self);
        self.changes = simplifier.changes;
        result.map(|()| self)
    }

    /// The simplification log, oldest entry first
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Splice the terms of a nested expression leading the first term in front
    fn un_nest(&mut self) -> bool {
        let Some(first) = self.terms.first_mut() else {
            return false;
        };
        // the nested expression must produce a running result on its first term
        let nested = match first.operands.first() {
            Some(Operand::Nested(nested))
                if nested.terms.first().is_some_and(|term| !term.operands.is_empty()) =>
            {
                Arc::clone(nested)
            }
            _ => return false,
        };
        first.operands.remove(0);
        self.merge_inputs(&nested.inputs);
        self.terms.splice(0..0, nested.terms.iter().cloned());
        true
    }

    /// Sort operands: names alphabetically, nested expressions after them
    fn sort_operands(&mut self) -> Vec<String> {
        let mut steps = Vec::new();
        for term in &mut self.terms {
            let swap = term.operands.windows(2).find_map(|pair| match (&pair[0], &pair[1]) {
                (Operand::Input(a), Operand::Input(b)) if a > b => Some((Arc::clone(a), Arc::clone(b))),
                _ => None,
            });
            let misplaced = term
                .operands
                .windows(2)
                .any(|pair| operand_order(&pair[0], &pair[1]) == Ordering::Greater);
            if !misplaced {
                continue;
            }
            term.operands.sort_by(operand_order);
            steps.push(match swap {
                Some((a, b)) => format!("Swap inputs '{}' ⇆ '{}'", a, b),
                None => "Move nested expressions after inputs".to_string(),
            });
        }
        steps
    }

    /// Idempotence: `a ∧ a = a`, `a ∨ a = a`
    fn remove_duplicates(&mut self) -> Vec<String> {
        let mut steps = Vec::new();
        for term in &mut self.terms {
            if !matches!(term.operator, Operator::And | Operator::Or) {
                continue;
            }
            let mut kept: Vec<Operand> = Vec::with_capacity(term.operands.len());
            let mut removed: Vec<String> = Vec::new();
            for operand in term.operands.drain(..) {
                if kept.contains(&operand) {
                    let label = operand_label(&operand);
                    if !removed.contains(&label) {
                        removed.push(label);
                    }
                } else {
                    kept.push(operand);
                }
            }
            term.operands = kept;
            if !removed.is_empty() {
                let plural = if removed.len() > 1 { "s" } else { "" };
                steps.push(format!("Remove duplicate{} '{}'", plural, removed.join("', '")));
            }
        }
        steps
    }

    /// Associativity: adjacent terms with the same `AND`, `OR` or `XOR` operator merge
    fn associate(&mut self) -> Vec<String> {
        let mut steps = Vec::new();
        for operator in [Operator::And, Operator::Or, Operator::Xor] {
            let Some(index) = self
                .terms
                .windows(2)
                .position(|pair| pair[0].operator == operator && pair[1].operator == operator)
            else {
                continue;
            };
            let next = self.terms.remove(index + 1);
            self.terms[index].operands.extend(next.operands);
            steps.push(format!("Combine {}s", operator));
        }
        steps
    }

    /// Absorption: `x ∧ (x ∨ y) = x` and `x ∨ (x ∧ y) = x`
    ///
    /// When a term shares an operand with the preceding term of the dual
    /// operator, the running result is absorbed and only the later term remains.
    /// At the head of the list, a nested single-term operand is absorbed by (or
    /// absorbs) the leading term.
    fn absorb(&mut self) -> Option<String> {
        let found = self.terms.windows(2).enumerate().find_map(|(index, pair)| {
            let (first, second) = (&pair[0], &pair[1]);
            if !is_complementary(first.operator, second.operator) {
                return None;
            }
            let shared = first.operands.iter().any(|operand| second.operands.contains(operand));
            shared.then(|| (index, second.operator))
        });
        if let Some((index, operator)) = found {
            let absorbed: Vec<Operand> = self.terms[..=index]
                .iter()
                .flat_map(|term| term.operands.iter().cloned())
                .collect();
            self.terms.drain(..=index);
            return Some(format!("{} absorption of {}", operator, quoted(&absorbed)));
        }
        self.absorb_nested()
    }

    fn absorb_nested(&mut self) -> Option<String> {
        let [first, second, ..] = self.terms.as_slice() else {
            return None;
        };
        if !is_complementary(first.operator, second.operator) || first.operands.is_empty() {
            return None;
        }
        let (outer, inner_operator) = (second.operator, first.operator);

        // op1(X) op2(op1(Y)) with Y ⊆ X keeps op1(Y)
        if let [Operand::Nested(nested)] = second.operands.as_slice() {
            if let Some(inner) = single_term(nested, inner_operator) {
                if !inner.is_empty() && inner.iter().all(|operand| first.operands.contains(operand)) {
                    let absorbed: Vec<Operand> = first
                        .operands
                        .iter()
                        .filter(|operand| !inner.contains(operand))
                        .cloned()
                        .collect();
                    let replacement = Term {
                        operator: inner_operator,
                        operands: inner.to_vec(),
                    };
                    let nested_inputs = nested.inputs.clone();
                    self.terms.splice(0..2, [replacement]);
                    self.merge_inputs(&nested_inputs);
                    return Some(format!("{} absorption of {}", outer, quoted(&absorbed)));
                }
            }
        }

        // op1(X) op2(…, op1(Y), …) with X ⊆ Y drops op1(Y)
        let position = second.operands.iter().position(|operand| match operand {
            Operand::Nested(nested) => single_term(nested, inner_operator)
                .is_some_and(|inner| first.operands.iter().all(|operand| inner.contains(operand))),
            Operand::Input(_) => false,
        })?;
        let removed = self.terms[1].operands.remove(position);
        if self.terms[1].operands.is_empty() {
            self.terms.remove(1);
        }
        Some(format!("{} absorption of {}", inner_operator, quoted(&[removed])))
    }

    /// Distribution: `(c ∧ x) ∨ (c ∧ y) = c ∧ (x ∨ y)` and its dual, at the head
    fn distribute(&mut self) -> Option<String> {
        let [first, second, ..] = self.terms.as_slice() else {
            return None;
        };
        if !is_complementary(first.operator, second.operator) {
            return None;
        }
        let [Operand::Nested(nested)] = second.operands.as_slice() else {
            return None;
        };
        let (inner_operator, outer_operator) = (first.operator, second.operator);
        let inner = single_term(nested, inner_operator)?;

        let mut common: Vec<Operand> = Vec::new();
        for operand in first.operands.iter().filter(|operand| inner.contains(operand)) {
            if !common.contains(operand) {
                common.push(operand.clone());
            }
        }
        let left: Vec<Operand> = first
            .operands
            .iter()
            .filter(|operand| !common.contains(operand))
            .cloned()
            .collect();
        let right: Vec<Operand> = inner
            .iter()
            .filter(|operand| !common.contains(operand))
            .cloned()
            .collect();
        if common.is_empty() || left.is_empty() || right.is_empty() {
            return None;
        }
        let nested_inputs = nested.inputs.clone();

        let alternatives = vec![
            self.factor(inner_operator, left),
            self.factor(inner_operator, right),
        ];
        let rest = self.group(outer_operator, alternatives);
        let mut operands = common;
        operands.push(Operand::Nested(Arc::new(rest)));
        self.terms.splice(
            0..2,
            [Term {
                operator: inner_operator,
                operands,
            }],
        );
        self.merge_inputs(&nested_inputs);
        Some("Apply distributive law".to_string())
    }

    /// A single operand as is, several as a nested group
    fn factor(&self, operator: Operator, mut operands: Vec<Operand>) -> Operand {
        if operands.len() == 1 {
            if let Some(operand) = operands.pop() {
                return operand;
            }
        }
        Operand::Nested(Arc::new(self.group(operator, operands)))
    }

    /// A one-term expression carrying this expression's bindings for its names
    fn group(&self, operator: Operator, operands: Vec<Operand>) -> Expression {
        let mut group = Expression::new();
        group.append(operator, operands);
        for (name, binding) in group.inputs.iter_mut() {
            if let Some(outer) = self.inputs.get(name) {
                *binding = *outer;
            }
        }
        group
    }

    /// Drop operand-less terms other than `NOT`
    fn clean(&mut self) {
        self.un_nest();
        self.terms
            .retain(|term| term.operator == Operator::Not || !term.operands.is_empty());
    }

    /// Refresh labels taken from the pre-simplification state
    ///
    /// Their snapshots are replaced by the simplified terms (keeping a trailing
    /// `NOT` of inverted labels), and the label that named the original text is
    /// renamed to the simplified text.
    fn update_labels(&mut self, inputs: &Inputs, terms: &[Term]) {
        let current: Arc<str> = self.to_string().into();
        let snapshot = self.snapshot();
        let mut refreshed = 0;
        for output in &mut self.outputs {
            if output.expression.inputs != *inputs {
                continue;
            }
            let Some(tail) = output.expression.terms.strip_prefix(terms) else {
                continue;
            };
            if tail.iter().any(|term| term.operator != Operator::Not) {
                continue;
            }
            let mut expression = snapshot.clone();
            expression.terms.extend_from_slice(tail);
            output.expression = Arc::new(expression);
            refreshed += 1;
        }
        if refreshed > 0 {
            debug!("Refreshed {} output snapshot(s)", refreshed);
        }

        let Some(original) = self.original.clone() else {
            return;
        };
        if current == original || !self.outputs.iter().any(|output| output.label == original) {
            return;
        }
        let snapshot = Arc::new(snapshot);
        self.outputs.retain(|output| output.label != current);
        if let Some(output) = self.outputs.iter_mut().find(|output| output.label == original) {
            output.label = Arc::clone(&current);
            output.expression = snapshot;
        }
        debug!("Renamed output '{}' to '{}'", original, current);
    }

    /// Remove inputs that neither a term nor an output snapshot references
    fn remove_unused(&mut self) -> Vec<String> {
        let mut used = self.referenced_inputs();
        for output in &self.outputs {
            used.extend(output.expression.referenced_inputs());
        }
        let unused: Vec<Arc<str>> = self
            .inputs
            .keys()
            .filter(|name| !used.contains(*name))
            .cloned()
            .collect();
        for name in &unused {
            self.inputs.remove(name);
        }
        unused
            .iter()
            .map(|name| format!("Removed obsolete input '{}'", name))
            .collect()
    }
}
