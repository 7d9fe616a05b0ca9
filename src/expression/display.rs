//! Text rendering of boolean expressions

use super::eval::{overlay, Assignment};
use super::{Expression, Inputs, Operand, Operator};
use crate::MAX_NESTING_DEPTH;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

/// Combining macron, placed after a single-character name
pub(crate) const BAR_SINGLE: char = '\u{0304}';
/// Combining overline, placed after every character of a longer name
pub(crate) const BAR_MULTI: char = '\u{0305}';

/// Toggle the negation bar over a name
///
/// A barred string loses all its bar marks. Otherwise a single character gets a
/// combining macron and longer strings get a combining overline after every
/// character, so the bar spans the whole name.
///
/// # Examples
///
/// ```
/// use logic_algebra::bar;
///
/// assert_eq!(bar("a"), "a\u{0304}");
/// assert_eq!(bar("ab"), "a\u{0305}b\u{0305}");
/// assert_eq!(bar(&bar("clk")), "clk");
/// ```
pub fn bar(text: &str) -> String {
    if text.contains(BAR_SINGLE) || text.contains(BAR_MULTI) {
        return text
            .chars()
            .filter(|c| *c != BAR_SINGLE && *c != BAR_MULTI)
            .collect();
    }
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (None, _) => String::new(),
        (Some(first), None) => format!("{first}{BAR_SINGLE}"),
        _ => text.chars().flat_map(|c| [c, BAR_MULTI]).collect(),
    }
}

/// Barred names as produced by [`bar`]
pub(super) fn barred_names() -> &'static Regex {
    static BARRED: OnceLock<Regex> = OnceLock::new();
    BARRED.get_or_init(|| {
        Regex::new(r"\w\x{0304}|(?:\w\x{0305})+").expect("barred name pattern is valid")
    })
}

/// Target notation for [`Expression::to_expression`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// The native rendering: `∧ ∨ ⊕ ⊼ ⊽ ⊻ ¬` with barred names
    #[default]
    Unicode,
    /// Arithmetic notation: `* + ^ ~`
    Math,
    /// Programming notation: `&& || ^ !` with `nand`, `nor` and `xnor` spelled out
    Logic,
}

impl Dialect {
    fn operators(self) -> &'static [(char, &'static str)] {
        match self {
            Dialect::Unicode => &[],
            Dialect::Math => &[
                ('∧', "*"),
                ('∨', "+"),
                ('⊕', "^"),
                ('⊼', "*~"),
                ('⊽', "+~"),
                ('⊻', "^~"),
                ('¬', "~"),
            ],
            Dialect::Logic => &[
                ('∧', "&&"),
                ('∨', "||"),
                ('⊕', "^"),
                ('⊼', "nand"),
                ('⊽', "nor"),
                ('⊻', "xnor"),
                ('¬', "!"),
            ],
        }
    }

    fn negation(self) -> &'static str {
        match self {
            Dialect::Unicode => "¬",
            Dialect::Math => "~",
            Dialect::Logic => "!",
        }
    }

    /// Translate text rendered in the unicode dialect
    pub fn translate(self, unicode: &str) -> String {
        if self == Dialect::Unicode {
            return unicode.to_string();
        }
        let unbarred = barred_names().replace_all(unicode, |caps: &Captures| {
            format!("{}{}", self.negation(), bar(&caps[0]))
        });
        let table = self.operators();
        let mut out = String::with_capacity(unbarred.len());
        for c in unbarred.chars() {
            match table.iter().find(|(glyph, _)| *glyph == c) {
                Some((_, replacement)) => out.push_str(replacement),
                None => out.push(c),
            }
        }
        out
    }
}

pub(super) fn value_text(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => "?",
    }
}

impl Expression {
    /// Render the expression as text
    ///
    /// With `use_labels` inputs appear by name (barred when inverted), otherwise
    /// by their effective value under `assignment` (`true`, `false` or `?`).
    /// Every term except the last is parenthesised; `force_parens` wraps the last
    /// one too, which is how nested operands are rendered.
    ///
    /// # Examples
    ///
    /// ```
    /// use logic_algebra::{and, Assignment};
    /// use std::sync::Arc;
    ///
    /// let expr = and(["a", "b"]).or(["c"]);
    /// assert_eq!(expr.render(None, true, false), "(a ∧ b) ∨ c");
    /// assert_eq!(expr.render(None, true, true), "((a ∧ b) ∨ c)");
    ///
    /// let mut assignment = Assignment::new();
    /// assignment.insert(Arc::from("a"), true);
    /// assert_eq!(expr.render(Some(&assignment), false, false), "(true ∧ ?) ∨ ?");
    /// ```
    pub fn render(&self, assignment: Option<&Assignment>, use_labels: bool, force_parens: bool) -> String {
        let scope = match assignment {
            Some(assignment) => self.scope(assignment),
            None => self.inputs.clone(),
        };
        self.render_in(&scope, use_labels, force_parens, 0)
    }

    fn render_in(&self, scope: &Inputs, use_labels: bool, force_parens: bool, depth: usize) -> String {
        let last = self.terms.len().saturating_sub(1);
        let mut text: Option<String> = None;

        for (index, term) in self.terms.iter().enumerate() {
            let fragments: Vec<String> = term
                .operands
                .iter()
                .map(|operand| render_operand(operand, scope, use_labels, depth))
                .collect();

            if term.operator == Operator::Not {
                text = match (text.take(), term.operands.first(), fragments.first()) {
                    (Some(acc), _, _) => Some(format!("¬{acc}")),
                    (None, Some(Operand::Input(_)), Some(fragment)) if use_labels => Some(bar(fragment)),
                    (None, _, Some(fragment)) => Some(format!("¬{fragment}")),
                    (None, _, None) => None,
                };
                continue;
            }

            let mut pieces = Vec::with_capacity(fragments.len() + 1);
            pieces.extend(text.take());
            pieces.extend(fragments);
            if pieces.is_empty() {
                continue;
            }
            let joined = pieces.join(term.operator.separator());
            text = Some(if force_parens || index < last {
                format!("({joined})")
            } else {
                joined
            });
        }
        text.unwrap_or_default()
    }

    /// Render into a target dialect
    ///
    /// # Examples
    ///
    /// ```
    /// use logic_algebra::{and, Dialect};
    ///
    /// let expr = and(["a", "b"]).invert(["a"]).or(["c"]);
    /// assert_eq!(expr.to_expression(Dialect::Math), "(~a * b) + c");
    /// assert_eq!(expr.to_expression(Dialect::Logic), "(!a && b) || c");
    /// ```
    pub fn to_expression(&self, dialect: Dialect) -> String {
        dialect.translate(&self.to_string())
    }
}

fn render_operand(operand: &Operand, scope: &Inputs, use_labels: bool, depth: usize) -> String {
    match operand {
        Operand::Input(name) => {
            let binding = scope.get(name).copied().unwrap_or_default();
            if !use_labels {
                value_text(binding.value()).to_string()
            } else if binding.is_inverted() {
                bar(name)
            } else {
                name.to_string()
            }
        }
        Operand::Nested(_) if depth >= MAX_NESTING_DEPTH => "(…)".to_string(),
        Operand::Nested(nested) => {
            nested.render_in(&overlay(&nested.inputs, scope), use_labels, true, depth + 1)
        }
    }
}

/// Renders with labels and minimal parentheses, e.g. `(a ∧ b) ∨ c̄`
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None, true, false))
    }
}
