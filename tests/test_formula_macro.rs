//! Tests for the formula! procedural macro

use logic_algebra::{and, formula, or, Assignment, Expression};
use std::sync::Arc;

fn assignment(values: &[(&str, bool)]) -> Assignment {
    values
        .iter()
        .map(|(name, value)| (Arc::from(*name), *value))
        .collect()
}

#[test]
fn test_matches_runtime_parser() {
    let cases = [
        (formula!(a * b + c), "a*b+c"),
        (formula!(a & b | c), "a&b|c"),
        (formula!(a && (b || c)), "a*(b+c)"),
        (formula!(!a ^ b), "~a^b"),
        (formula!(!(a + b) * c), "~(a+b)*c"),
    ];
    for (built, input) in cases {
        let parsed = Expression::parse(input).unwrap();
        assert_eq!(built.to_string(), parsed.to_string(), "formula for {}", input);
    }
}

#[test]
fn test_single_name() {
    let expr = formula!(a);
    assert_eq!(expr.to_string(), "a");
    assert_eq!(expr.terms().len(), 1);

    let expr = formula!(!a);
    assert!(expr.inputs()["a"].is_inverted());
    assert_eq!(expr.to_string(), "a\u{0304}");
}

#[test]
fn test_string_literal_names() {
    let expr = formula!("clk" * "en");
    assert_eq!(expr.input_names().collect::<Vec<_>>(), vec!["clk", "en"]);
}

#[test]
fn test_double_negation_cancels() {
    let expr = formula!(!!a * b);
    assert!(!expr.inputs()["a"].is_inverted());
    assert_eq!(expr.to_string(), "a ∧ b");
}

#[test]
fn test_mixed_polarity() {
    let expr = formula!(a * !a);
    assert!(!expr.inputs()["a"].is_inverted());
    assert_eq!(expr.to_string(), "a ∧ ¬(a)");
    assert_eq!(expr.value_of(&assignment(&[("a", true)])), Ok(Some(false)));
    assert_eq!(expr.value_of(&assignment(&[("a", false)])), Ok(Some(false)));
}

#[test]
fn test_multiplexer() {
    let mux = formula!((!s & a) | (s & b));
    for (s, a, b) in [(false, true, false), (false, false, true), (true, true, false), (true, false, true)] {
        let expected = if s { b } else { a };
        let values = assignment(&[("s", s), ("a", a), ("b", b)]);
        assert_eq!(mux.value_of(&values), Ok(Some(expected)));
    }
}

#[test]
fn test_embedded_expressions() {
    let carry = and(["a", "b"]);
    let propagate = or(["a", "b"]);
    let expr = formula!({ &carry } | ({ &propagate } & cin));
    assert_eq!(expr.to_string(), "(a ∧ b) ∨ ((a ∨ b) ∧ cin)");

    let values = assignment(&[("a", true), ("b", false), ("cin", true)]);
    assert_eq!(expr.value_of(&values), Ok(Some(true)));

    let negated = formula!(!{ carry.clone() });
    assert_eq!(negated.value_of(&assignment(&[("a", true), ("b", true)])), Ok(Some(false)));
}

#[test]
fn test_negated_names_alongside_mixed_polarity() {
    let expr = formula!(!a * b + !c * !b);
    assert!(expr.inputs()["a"].is_inverted());
    assert!(expr.inputs()["c"].is_inverted());
    assert!(!expr.inputs()["b"].is_inverted());

    let values = assignment(&[("a", false), ("b", true), ("c", false)]);
    // ((¬a ∧ b) ∨ ¬c) ∧ ¬b
    assert_eq!(expr.value_of(&values), Ok(Some(false)));
    let values = assignment(&[("a", true), ("b", false), ("c", false)]);
    assert_eq!(expr.value_of(&values), Ok(Some(true)));
}
