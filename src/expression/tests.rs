//! Tests for the expression module

use super::*;
use crate::formula;

fn equivalent(left: &Expression, right: &Expression) -> bool {
    let names: Vec<Arc<str>> = left
        .inputs()
        .keys()
        .chain(right.inputs().keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    (0..1usize << names.len()).all(|row| {
        let assignment: Assignment = names
            .iter()
            .enumerate()
            .map(|(bit, name)| (Arc::clone(name), (row >> (names.len() - 1 - bit)) & 1 == 1))
            .collect();
        left.value_of(&assignment) == right.value_of(&assignment)
    })
}

// ========== Construction ==========

#[test]
fn test_inputs_register_in_alphabetical_order() {
    let expr = and(["c", "a"]).or(["b"]);
    let names: Vec<&str> = expr.input_names().collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert!(expr.inputs().values().all(|v| v.raw().is_none()));
}

#[test]
fn test_nested_inputs_merge_parent_wins() {
    let inner = and(["a", "b"]).invert(["a"]);
    let mut outer = Expression::new().or(["a"]);
    outer.assign("a", true);
    let outer = outer.or([inner]);
    let a = outer.inputs()["a"];
    assert_eq!(a.raw(), Some(true));
    assert!(!a.is_inverted());
    assert!(outer.inputs()["b"].raw().is_none());
}

#[test]
fn test_nested_expression_is_shared() {
    let inner = Arc::new(and(["a", "b"]));
    let outer = Expression::new().or([Operand::from(Arc::clone(&inner)), Operand::from("c")]);
    let copy = outer.clone();
    assert_eq!(Arc::strong_count(&inner), 3);
    assert_eq!(outer, copy);
}

#[test]
fn test_binary_operators_reject_three_operands() {
    let err = Expression::new().nand(["a", "b", "c"]).unwrap_err();
    assert_eq!(
        err,
        ArityError::TooManyOperands {
            operator: Operator::Nand,
            given: 3,
            max: 2
        }
    );
    assert!(xnor(["a", "b", "c"]).is_err());
    assert!(nor(["a", "b"]).is_ok());
}

#[test]
fn test_chained_binary_terms() {
    // nand(a, b).nand(c) would hand three values to one NAND
    let err = nand(["a", "b"]).unwrap().nand(["c"]).unwrap_err();
    assert_eq!(
        err,
        ArityError::ChainedBinary {
            operator: Operator::Nand,
            existing: 2,
            given: 1
        }
    );
    // one operand each is fine
    let expr = nand(["a"]).unwrap().nand(["b"]).unwrap();
    assert_eq!(expr.terms().len(), 2);
    // a different operator in between resets the chain
    assert!(nand(["a", "b"]).unwrap().and(["c"]).nand(["d"]).is_ok());
}

#[test]
fn test_push_term_leaves_expression_untouched_on_error() {
    let mut expr = nor(["a", "b"]).unwrap();
    let before = expr.clone();
    assert!(expr.push_term(Operator::Nor, ["c"]).is_err());
    assert_eq!(expr, before);
    assert!(!expr.inputs().contains_key("c"));
}

#[test]
fn test_not_accepts_at_most_one_operand() {
    assert!(not(["a", "b"]).is_err());
    let expr = not(["a"]).unwrap();
    assert_eq!(expr.warnings(), &[Warning::ImpreciseNot { operands: 1 }]);
    let expr = and(["a"]).not(Vec::<Operand>::new()).unwrap();
    assert!(expr.warnings().is_empty());
}

#[test]
fn test_with_terms_registers_nothing() {
    let expr = Expression::with_terms([Term::new(Operator::And, ["a", "b"])]);
    assert!(expr.inputs().is_empty());
    assert!(matches!(
        expr.evaluate(),
        Err(EvaluationError::UnknownInput { .. })
    ));
}

#[test]
fn test_depth_and_term_count() {
    let inner = and(["a"]).or(["b"]);
    let middle = Expression::new().and([inner]);
    let outer = Expression::new().xor([middle]).xor(["c"]);
    assert_eq!(outer.depth(), 2);
    assert_eq!(outer.term_count(), 5);
    let referenced = outer.referenced_inputs();
    let names: Vec<&str> = referenced.iter().map(|n| &**n).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

// ========== Evaluation ==========

#[test]
fn test_builder_scenario() {
    let expr = Expression::new().and(["a", "b"]).or(["c"]);
    let mut assignment = Assignment::new();
    assignment.insert("a".into(), true);
    assignment.insert("b".into(), false);
    assignment.insert("c".into(), true);
    assert_eq!(expr.value_of(&assignment), Ok(Some(true)));
    assert_eq!(expr.to_string(), "(a ∧ b) ∨ c");
}

#[test]
fn test_not_of_single_operand() {
    let expr = not(["a"]).unwrap();
    let mut assignment = Assignment::new();
    assignment.insert("a".into(), true);
    assert_eq!(expr.value_of(&assignment), Ok(Some(false)));
}

#[test]
fn test_inversion_applies_to_raw_values() {
    let mut expr = and(["a"]).invert(["a"]);
    expr.assign("a", false);
    assert_eq!(expr.evaluate(), Ok(Some(true)));
    assert_eq!(expr.inputs()["a"].raw(), Some(false));
    assert_eq!(expr.inputs()["a"].value(), Some(true));
}

#[test]
fn test_xor_false_stays_resolved() {
    let expr = xor(["a", "b"]);
    let mut assignment = Assignment::new();
    assignment.insert("a".into(), true);
    assignment.insert("b".into(), true);
    assert_eq!(expr.value_of(&assignment), Ok(Some(false)));
}

#[test]
fn test_nested_sees_parent_assignment() {
    let inner = and(["a", "b"]);
    let expr = or(["c"]).or([inner]);
    let mut assignment = Assignment::new();
    assignment.insert("a".into(), true);
    assignment.insert("b".into(), true);
    assignment.insert("c".into(), false);
    assert_eq!(expr.value_of(&assignment), Ok(Some(true)));
}

// ========== Display and parsing round trips ==========

#[test]
fn test_round_trip_preserves_value() {
    let inner = or(["b", "c"]);
    let cases = vec![
        and(["a", "b"]).or(["c"]),
        Expression::new().and([Operand::from("a"), Operand::from(&inner)]),
        and(["a", "b"]).negate().xor(["c"]),
        and(["a", "b"]).invert(["a"]).or([inner.clone().negate()]),
        not(["a"]).unwrap().and(["b"]),
        and(["a"]).or([and(["a"]).negate()]),
    ];
    for expr in cases {
        let text = expr.to_string();
        let parsed = Expression::parse(&text).unwrap();
        assert!(equivalent(&expr, &parsed), "{} did not survive parsing", text);
    }
}

#[test]
fn test_parse_scenario() {
    let mut expr = Expression::parse("a*b+c").unwrap();
    let column = expr.truth_vector().unwrap().remove(0).1;
    let expected: Vec<Option<bool>> = (0..8)
        .map(|row: usize| Some((row & 0b100 != 0 && row & 0b010 != 0) || row & 0b001 != 0))
        .collect();
    assert_eq!(column, expected);
}

#[test]
fn test_parse_nested_groups() {
    let expr = Expression::parse("(a + b) * (c + d)").unwrap();
    assert_eq!(expr.to_string(), "(a ∨ b) ∧ (c ∨ d)");
    let mut assignment = Assignment::new();
    for (name, value) in [("a", false), ("b", true), ("c", false), ("d", false)] {
        assignment.insert(name.into(), value);
    }
    assert_eq!(expr.value_of(&assignment), Ok(Some(false)));
    assignment.insert("d".into(), true);
    assert_eq!(expr.value_of(&assignment), Ok(Some(true)));
}

// ========== Simplification scenarios ==========

#[test]
fn test_duplicate_removal_scenario() {
    let mut expr = and(["a", "a", "b"]);
    expr.simplify().unwrap();
    assert_eq!(expr.to_string(), "a ∧ b");
    assert!(expr
        .changes()
        .iter()
        .any(|change| change.step == "Remove duplicate 'a'"));
}

#[test]
fn test_simplify_keeps_value_of_nested_expressions() {
    let mut expr = Expression::parse("(a*b)+(a*c)").unwrap();
    let before = expr.clone();
    expr.simplify().unwrap();
    assert!(equivalent(&before, &expr));
    assert_eq!(expr.to_string(), "a ∧ (b ∨ c)");
}

// ========== The formula! macro ==========

#[test]
fn test_formula_macro_matches_parser() {
    let built = formula!(a * b + c);
    let parsed = Expression::parse("a*b+c").unwrap();
    assert_eq!(built.to_string(), parsed.to_string());
    assert!(equivalent(&built, &parsed));
}

#[test]
fn test_formula_macro_negation() {
    let expr = formula!(!a & b);
    assert!(expr.inputs()["a"].is_inverted());
    assert_eq!(expr.to_string(), "a\u{0304} ∧ b");

    let expr = formula!(!(a | b));
    assert_eq!(expr.to_string(), "¬(a ∨ b)");
}

#[test]
fn test_formula_macro_embeds_expressions() {
    let carry = and(["a", "b"]);
    let expr = formula!({ carry.clone() } ^ c);
    assert_eq!(expr.to_string(), "(a ∧ b) ⊕ c");
}
