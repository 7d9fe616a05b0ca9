//! Parsing support for boolean formulas
//!
//! Formulas are reduced innermost first: every `operand operator operand`
//! triple is replaced by a placeholder standing for a one-term expression until a
//! single placeholder remains. Binary operators therefore associate left to right
//! with no precedence between them; parentheses group.

use super::display::{bar, barred_names, BAR_MULTI, BAR_SINGLE};
use super::error::ExpressionParseError;
use super::{Expression, Operand, Operator};
use crate::MAX_NESTING_DEPTH;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

const OPERATORS: [char; 11] = ['+', '*', '^', '&', '|', '∧', '∨', '⊕', '⊼', '⊽', '⊻'];
const NEGATIONS: [char; 3] = ['~', '!', '¬'];

macro_rules! pattern {
    ($name:ident, $source:expr) => {
        fn $name() -> &'static Regex {
            static PATTERN: OnceLock<Regex> = OnceLock::new();
            PATTERN.get_or_init(|| Regex::new($source).expect("parser pattern is valid"))
        }
    };
}

pattern!(binary_triple, r"(~?(?:@\d+|\w+))([*+^⊼⊽⊻])(~?(?:@\d+|\w+))");
pattern!(lone_group, r"\((~?(?:@\d+|\w+))\)");
pattern!(negated_placeholder, r"~@(\d+)");
pattern!(whole_placeholder, r"^@(\d+)$");
pattern!(lone_name, r"^(~?)(\w+)$");
pattern!(name_use, r"(~?)(\w+)");

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_bar(c: char) -> bool {
    c == BAR_SINGLE || c == BAR_MULTI
}

fn ends_operand(c: char) -> bool {
    is_name_char(c) || is_bar(c) || c == ')'
}

fn starts_operand(c: char) -> bool {
    is_name_char(c) || c == '(' || NEGATIONS.contains(&c)
}

fn operator_for(symbol: &str) -> Option<Operator> {
    match symbol {
        "*" => Some(Operator::And),
        "+" => Some(Operator::Or),
        "^" => Some(Operator::Xor),
        "⊼" => Some(Operator::Nand),
        "⊽" => Some(Operator::Nor),
        "⊻" => Some(Operator::Xnor),
        _ => None,
    }
}

/// Map every operator and negation spelling onto `* + ^ ⊼ ⊽ ⊻ ~` and drop whitespace
fn normalise(input: &str) -> String {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let unbarred = barred_names().replace_all(&compact, |caps: &Captures| format!("~{}", bar(&caps[0])));
    unbarred
        .replace("&&", "*")
        .replace("||", "+")
        .chars()
        .map(|c| match c {
            '&' | '∧' => '*',
            '|' | '∨' => '+',
            '⊕' => '^',
            '!' | '¬' => '~',
            other => other,
        })
        .collect()
}

/// Names used both plain and negated
fn mixed_polarity(text: &str) -> BTreeSet<String> {
    let mut plain = BTreeSet::new();
    let mut negated = BTreeSet::new();
    for caps in name_use().captures_iter(text) {
        let uses = if caps[1].is_empty() { &mut plain } else { &mut negated };
        uses.insert(caps[2].to_string());
    }
    plain.intersection(&negated).cloned().collect()
}

struct Parser<'a> {
    input: &'a str,
    text: String,
    slots: Vec<Option<Expression>>,
    mixed: BTreeSet<String>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            text: String::new(),
            slots: Vec::new(),
            mixed: BTreeSet::new(),
        }
    }

    fn error(&self, message: impl Into<String>, position: Option<usize>) -> ExpressionParseError {
        ExpressionParseError::InvalidSyntax {
            message: Arc::from(message.into()),
            input: Arc::from(self.input),
            position,
        }
    }

    fn parse(mut self) -> Result<Expression, ExpressionParseError> {
        self.validate()?;
        self.text = normalise(self.input);
        while self.strip_groups() || self.cancel_double_negation() {}
        self.mixed = mixed_polarity(&self.text);

        if let Some(caps) = lone_name().captures(&self.text) {
            let mut expression = Expression::new().and([&caps[2]]);
            if !caps[1].is_empty() {
                expression.set_inverted(&caps[2], true);
            }
            return Ok(expression);
        }

        loop {
            let root = whole_placeholder()
                .captures(&self.text)
                .map(|caps| caps[1].to_string());
            if let Some(index) = root {
                return self.take(&index);
            }
            if self.strip_groups() || self.cancel_double_negation() || self.negate_placeholder()? {
                continue;
            }
            if !self.reduce_triple()? {
                let message = format!("cannot resolve '{}'", self.text);
                return Err(self.error(message, None));
            }
        }
    }

    fn validate(&self) -> Result<(), ExpressionParseError> {
        if self.input.trim().is_empty() {
            return Err(self.error("empty formula", None));
        }
        let mut open: Vec<usize> = Vec::new();
        let mut previous: Option<char> = None;
        let mut gap = false;

        for (position, c) in self.input.chars().enumerate() {
            if c.is_whitespace() {
                gap = true;
                continue;
            }
            if let Some(prev) = previous {
                let same_name = is_name_char(prev) && is_name_char(c) && !gap;
                if ends_operand(prev) && starts_operand(c) && !same_name {
                    return Err(self.error("missing operator", Some(position)));
                }
            }
            match c {
                '(' => {
                    open.push(position);
                    if open.len() > MAX_NESTING_DEPTH {
                        return Err(ExpressionParseError::TooDeeplyNested {
                            input: Arc::from(self.input),
                            depth: open.len(),
                            limit: MAX_NESTING_DEPTH,
                        });
                    }
                }
                ')' => {
                    if previous == Some('(') {
                        return Err(self.error("empty parentheses", Some(position)));
                    }
                    if open.pop().is_none() {
                        return Err(self.error("unbalanced ')'", Some(position)));
                    }
                }
                c if is_bar(c) => {
                    if !previous.is_some_and(is_name_char) || gap {
                        return Err(self.error("negation bar without a name", Some(position)));
                    }
                }
                c if is_name_char(c) || OPERATORS.contains(&c) || NEGATIONS.contains(&c) => {}
                other => {
                    return Err(self.error(format!("unexpected character '{}'", other), Some(position)));
                }
            }
            previous = Some(c);
            gap = false;
        }

        match open.pop() {
            Some(position) => Err(self.error("unclosed '('", Some(position))),
            None => Ok(()),
        }
    }

    /// `(x)` → `x` for a single, possibly negated, operand
    fn strip_groups(&mut self) -> bool {
        let stripped = match lone_group().replace_all(&self.text, "$1") {
            Cow::Owned(stripped) => stripped,
            Cow::Borrowed(_) => return false,
        };
        self.text = stripped;
        true
    }

    fn cancel_double_negation(&mut self) -> bool {
        if !self.text.contains("~~") {
            return false;
        }
        self.text = self.text.replace("~~", "");
        true
    }

    /// `~@k` → placeholder for a negated copy of expression `k`
    fn negate_placeholder(&mut self) -> Result<bool, ExpressionParseError> {
        let found = negated_placeholder()
            .captures(&self.text)
            .and_then(|caps| Some((caps.get(0)?.range(), caps[1].to_string())));
        let Some((range, index)) = found else {
            return Ok(false);
        };
        let expression = self.take(&index)?.negate();
        let token = self.store(expression);
        self.text.replace_range(range, &token);
        Ok(true)
    }

    /// Replace the leftmost `operand operator operand` by a placeholder
    ///
    /// Parentheses enclosing exactly the triple are consumed with it. Chains
    /// such as `a+b+c` stay flat: each operator adds a term to one expression.
    fn reduce_triple(&mut self) -> Result<bool, ExpressionParseError> {
        let found = binary_triple().captures(&self.text).and_then(|caps| {
            let whole = caps.get(0)?;
            Some((
                whole.start(),
                whole.end(),
                caps[1].to_string(),
                caps[2].to_string(),
                caps[3].to_string(),
            ))
        });
        let Some((mut start, mut end, left, symbol, right)) = found else {
            return Ok(false);
        };
        if self.text[..start].ends_with('(') && self.text[end..].starts_with(')') {
            start -= 1;
            end += 1;
        }

        let operator = operator_for(&symbol)
            .ok_or_else(|| self.error(format!("unknown operator '{}'", symbol), None))?;
        let mut inverted = Vec::new();
        // a plain placeholder on the left is the running result of a chain, so
        // the new term is appended to it instead of nesting one level deeper
        let (mut expression, operands) = match left.strip_prefix('@') {
            Some(index) => (self.take(index)?, vec![self.operand(&right, &mut inverted)?]),
            None => (
                Expression::new(),
                vec![
                    self.operand(&left, &mut inverted)?,
                    self.operand(&right, &mut inverted)?,
                ],
            ),
        };
        expression.append(operator, operands);
        for name in &inverted {
            expression.set_inverted(name, true);
        }

        let token = self.store(expression);
        self.text.replace_range(start..end, &token);
        Ok(true)
    }

    /// Resolve one side of a triple
    ///
    /// A negated name becomes an inverted input, unless the same name is also
    /// used plain, in which case it becomes a negated nested expression.
    fn operand(&mut self, token: &str, inverted: &mut Vec<String>) -> Result<Operand, ExpressionParseError> {
        let (negated, body) = match token.strip_prefix('~') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        if let Some(index) = body.strip_prefix('@') {
            let expression = self.take(index)?;
            return Ok(Operand::from(if negated {
                expression.negate()
            } else {
                expression
            }));
        }
        if negated && self.mixed.contains(body) {
            return Ok(Operand::from(Expression::new().and([body]).negate()));
        }
        if negated {
            inverted.push(body.to_string());
        }
        Ok(Operand::from(body))
    }

    fn store(&mut self, expression: Expression) -> String {
        self.slots.push(Some(expression));
        format!("@{}", self.slots.len() - 1)
    }

    fn take(&mut self, index: &str) -> Result<Expression, ExpressionParseError> {
        let slot = index
            .parse::<usize>()
            .ok()
            .and_then(|position| self.slots.get_mut(position))
            .and_then(Option::take);
        slot.ok_or_else(|| self.error(format!("dangling sub-expression @{}", index), None))
    }
}

impl Expression {
    /// Parse a boolean formula
    ///
    /// Accepted syntax:
    /// - `*`, `&`, `&&`, `∧` for AND
    /// - `+`, `|`, `||`, `∨` for OR
    /// - `^`, `⊕` for XOR, and `⊼`, `⊽`, `⊻` for NAND, NOR, XNOR
    /// - `~`, `!`, `¬` or a combining bar (`ā`) for negation
    /// - parentheses for grouping
    ///
    /// There is no precedence: `a+b*c` reads as `(a+b)*c`. Negated names become
    /// inverted inputs.
    ///
    /// # Errors
    ///
    /// - [`ExpressionParseError::InvalidSyntax`] for unexpected characters,
    ///   unbalanced or empty parentheses, missing operands or operators
    /// - [`ExpressionParseError::TooDeeplyNested`] for excessive parenthesis depth
    ///
    /// # Examples
    ///
    /// ```
    /// use logic_algebra::Expression;
    ///
    /// # fn main() -> Result<(), logic_algebra::ExpressionParseError> {
    /// let expr = Expression::parse("(a + b) * ~c")?;
    /// assert_eq!(expr.to_string(), "(a ∨ b) ∧ c\u{0304}");
    ///
    /// assert!(Expression::parse("a @ b").is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(input: &str) -> Result<Self, ExpressionParseError> {
        Parser::new(input).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Assignment;

    #[test]
    fn test_normalise_spellings() {
        assert_eq!(normalise("a && b || !c"), "a*b+~c");
        assert_eq!(normalise("a ∧ b ∨ ¬c ⊕ d"), "a*b+~c^d");
        assert_eq!(normalise("a\u{0304} & b"), "~a*b");
        assert_eq!(normalise("e\u{0305}n\u{0305} | b"), "~en+b");
    }

    #[test]
    fn test_mixed_polarity() {
        let mixed = mixed_polarity("a*~a+~b");
        assert!(mixed.contains("a"));
        assert!(!mixed.contains("b"));
    }

    #[test]
    fn test_lone_name() {
        let expr = Expression::parse("a").unwrap();
        assert_eq!(expr.terms().len(), 1);
        assert_eq!(expr.terms()[0].operator(), Operator::And);
        assert_eq!(expr.to_string(), "a");

        let expr = Expression::parse("((~a))").unwrap();
        assert!(expr.inputs()["a"].is_inverted());
    }

    #[test]
    fn test_enclosing_parentheses_are_consumed() {
        let expr = Expression::parse("(a*b)+c").unwrap();
        assert_eq!(expr.to_string(), "(a ∧ b) ∨ c");
    }

    #[test]
    fn test_left_to_right_without_precedence() {
        let expr = Expression::parse("a+b*c").unwrap();
        assert_eq!(expr.to_string(), "(a ∨ b) ∧ c");
    }

    #[test]
    fn test_chain_stays_flat() {
        let expr = Expression::parse("a+b*c^d").unwrap();
        assert_eq!(expr.depth(), 0);
        assert_eq!(expr.terms().len(), 3);
        assert_eq!(expr.to_string(), "((a ∨ b) ∧ c) ⊕ d");
    }

    #[test]
    fn test_long_chain_evaluates() {
        let names: Vec<String> = (0..300).map(|index| format!("x{}", index)).collect();
        let mut expr = Expression::parse(&names.join("+")).unwrap();
        assert!(expr.depth() < MAX_NESTING_DEPTH);

        let assignment: Assignment = names
            .iter()
            .map(|name| (Arc::from(name.as_str()), name == "x299"))
            .collect();
        assert_eq!(expr.value_of(&assignment), Ok(Some(true)));

        expr.simplify().unwrap();
        assert_eq!(expr.terms().len(), 1);
        assert_eq!(expr.terms()[0].operands().len(), 300);
    }

    #[test]
    fn test_negated_group() {
        let expr = Expression::parse("~(a*b)").unwrap();
        assert_eq!(expr.to_string(), "¬(a ∧ b)");
    }

    #[test]
    fn test_mixed_polarity_becomes_negated_group() {
        let expr = Expression::parse("a * ~a").unwrap();
        assert!(!expr.inputs()["a"].is_inverted());
        assert_eq!(expr.to_string(), "a ∧ ¬(a)");
        assert_eq!(expr.evaluate().ok(), Some(None));
    }

    #[test]
    fn test_syntax_errors() {
        let cases = [
            ("", None),
            ("a @ b", Some(2)),
            ("(a", Some(0)),
            ("a)", Some(1)),
            ("()", Some(1)),
            ("a b", Some(2)),
        ];
        for (input, expected) in cases {
            match Expression::parse(input) {
                Err(ExpressionParseError::InvalidSyntax { position, .. }) => {
                    assert_eq!(position, expected, "input {:?}", input)
                }
                other => panic!("expected syntax error for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_dangling_operator() {
        assert!(matches!(
            Expression::parse("a +"),
            Err(ExpressionParseError::InvalidSyntax { position: None, .. })
        ));
        assert!(Expression::parse("a ++ b").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let input = format!("{}a{}", "(".repeat(MAX_NESTING_DEPTH + 1), ")".repeat(MAX_NESTING_DEPTH + 1));
        assert!(matches!(
            Expression::parse(&input),
            Err(ExpressionParseError::TooDeeplyNested { .. })
        ));
    }
}
