//! Output labels: named snapshots of an expression
//!
//! A label freezes the current terms under a name. Truth tables produce one
//! column per label, and labels attached to nested expressions are collected
//! into the parent before a table is built.

use super::display::bar;
use super::{Expression, Operator, Term};
use log::warn;
use regex::{NoExpand, Regex};
use std::sync::Arc;

/// A labeled snapshot of an expression
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub(super) label: Arc<str>,
    pub(super) expression: Arc<Expression>,
}

impl Output {
    /// The column name
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The snapshot taken when the label was added
    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

fn is_single_word(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Replace the first whole-word occurrence of `from` in `label` by `to`
fn replace_word(label: &str, from: &str, to: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(from))).ok()?;
    pattern
        .is_match(label)
        .then(|| pattern.replacen(label, 1, NoExpand(to)).into_owned())
}

/// Flip the bar over `name` where it appears as a whole word in `label`
fn toggle_bar_in_label(label: &str, name: &str) -> Option<String> {
    let barred = bar(name);
    replace_word(label, &barred, name).or_else(|| replace_word(label, name, &barred))
}

impl Expression {
    /// Attach an output label and return the expression
    ///
    /// Without a name the label is the rendered text. An inverted label is
    /// the barred name for single words and `¬(name)` otherwise, and its snapshot
    /// gets a trailing `NOT`. A label with the same name is replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use logic_algebra::and;
    ///
    /// let expr = and(["a", "b"])
    ///     .label(None, false)
    ///     .label(Some("q"), true);
    ///
    /// let labels: Vec<&str> = expr.outputs().iter().map(|o| o.label()).collect();
    /// assert_eq!(labels, vec!["a ∧ b", "q\u{0304}"]);
    /// ```
    pub fn label(mut self, name: Option<&str>, inverted: bool) -> Self {
        self.add_label(name, inverted);
        self
    }

    /// Attach an output label in place, returning the final label text
    pub fn add_label(&mut self, name: Option<&str>, inverted: bool) -> Arc<str> {
        let name = name.map_or_else(|| self.to_string(), str::to_string);
        let mut snapshot = self.snapshot();
        let label: Arc<str> = if inverted {
            snapshot.terms.push(Term {
                operator: Operator::Not,
                operands: Vec::new(),
            });
            if is_single_word(&name) {
                bar(&name).into()
            } else {
                format!("¬({name})").into()
            }
        } else {
            name.into()
        };
        self.set_output(Arc::clone(&label), snapshot);
        label
    }

    /// Labeled outputs in insertion order
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// The snapshot stored under `label`
    pub fn output(&self, label: &str) -> Option<&Expression> {
        self.outputs
            .iter()
            .find(|output| output.label.as_ref() == label)
            .map(|output| output.expression.as_ref())
    }

    /// Inputs and terms only; snapshots never carry outputs of their own
    pub(super) fn snapshot(&self) -> Expression {
        Expression {
            inputs: self.inputs.clone(),
            terms: self.terms.clone(),
            ..Expression::default()
        }
    }

    pub(super) fn set_output(&mut self, label: Arc<str>, expression: Expression) {
        let expression = Arc::new(expression);
        match self.outputs.iter_mut().find(|output| output.label == label) {
            Some(output) => output.expression = expression,
            None => self.outputs.push(Output { label, expression }),
        }
    }

    /// Copy labels of nested expressions into this expression
    ///
    /// Labels already present at this level win.
    pub(super) fn collect_labels(&mut self) {
        let mut collected = Vec::new();
        let mut stack: Vec<&Expression> = self.nested().map(|nested| nested.as_ref()).collect();
        while let Some(expr) = stack.pop() {
            collected.extend(expr.outputs.iter().cloned());
            stack.extend(expr.nested().map(|nested| nested.as_ref()));
        }
        for output in collected {
            if !self.outputs.iter().any(|existing| existing.label == output.label) {
                self.outputs.push(output);
            }
        }
    }

    /// Toggle the inversion of the named inputs in place
    ///
    /// Labels mentioning the name as a whole word switch between the plain and
    /// barred form, and snapshots flip the same flag. Unknown names are skipped
    /// with a warning.
    pub fn invert_inputs<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            let Some(binding) = self.inputs.get_mut(name) else {
                warn!("Cannot invert unknown input '{}'", name);
                continue;
            };
            binding.toggle_inverted();

            for output in &mut self.outputs {
                if let Some(label) = toggle_bar_in_label(&output.label, name) {
                    output.label = label.into();
                }
                if let Some(binding) = Arc::make_mut(&mut output.expression).inputs.get_mut(name) {
                    binding.toggle_inverted();
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{and, or};

    #[test]
    fn test_default_label_is_rendered_text() {
        let expr = and(["a", "b"]).or(["c"]).label(None, false);
        assert_eq!(expr.outputs()[0].label(), "(a ∧ b) ∨ c");
    }

    #[test]
    fn test_inverted_label_forms() {
        let expr = and(["a", "b"]).label(Some("q"), true);
        assert_eq!(expr.outputs()[0].label(), "q\u{0304}");
        let expr = and(["a", "b"]).label(Some("a ∧ b"), true);
        assert_eq!(expr.outputs()[0].label(), "¬(a ∧ b)");
        assert_eq!(
            expr.outputs()[0].expression().terms().last().map(|t| t.operator()),
            Some(Operator::Not)
        );
    }

    #[test]
    fn test_same_label_overwrites() {
        let expr = and(["a"]).label(Some("q"), false).or(["b"]).label(Some("q"), false);
        assert_eq!(expr.outputs().len(), 1);
        assert_eq!(expr.output("q").map(|e| e.terms().len()), Some(2));
    }

    #[test]
    fn test_snapshots_drop_outputs() {
        let inner = and(["a"]).label(Some("inner"), false);
        let expr = inner.clone().label(Some("outer"), false);
        let snapshot = expr.output("outer").map(|e| e.outputs().len());
        assert_eq!(snapshot, Some(0));
    }

    #[test]
    fn test_invert_rewrites_labels() {
        let mut expr = and(["a", "ab"]).label(None, false);
        expr.invert_inputs(["a"]);
        assert_eq!(expr.outputs()[0].label(), "a\u{0304} ∧ ab");
        expr.invert_inputs(["a"]);
        assert_eq!(expr.outputs()[0].label(), "a ∧ ab");
        let snapshot = expr.outputs()[0].expression();
        assert!(!snapshot.inputs()["a"].is_inverted());
    }

    #[test]
    fn test_invert_unknown_name_is_skipped() {
        let expr = and(["a"]).invert(["zz"]);
        assert!(!expr.inputs().contains_key("zz"));
        assert!(!expr.inputs()["a"].is_inverted());
    }

    #[test]
    fn test_collect_nested_labels() {
        let inner = or(["a", "b"]).label(Some("carry"), false);
        let mut expr = Expression::new().and([inner]).and(["c"]).label(Some("q"), false);
        expr.collect_labels();
        let labels: Vec<&str> = expr.outputs().iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["q", "carry"]);
    }
}
