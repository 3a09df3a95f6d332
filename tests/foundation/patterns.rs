//! Condition and action pattern tests

use std::sync::Arc;

use rete_foundation::{ActionPattern, Bindings, Condition, Fact, Field, Position};

fn var(name: &str) -> Field<Arc<str>> {
    Field::variable(name)
}

fn constant(value: &str) -> Field<Arc<str>> {
    Field::constant(value)
}

fn fact(i: &str, a: &str, v: &str) -> Fact<Arc<str>> {
    Fact::new(i, a, v)
}

// =============================================================================
// Facts
// =============================================================================

#[test]
fn facts_compare_by_value() {
    let a = fact("B1", "on", "B2");
    let b = Fact::new(Arc::<str>::from(String::from("B1")), "on", "B2");
    assert_eq!(a, b);
    assert!(!Arc::ptr_eq(&a.identifier, &b.identifier));
}

#[test]
fn fact_fields_by_position() {
    let f = fact("B1", "on", "B2");
    assert_eq!(&**f.get(Position::Identifier), "B1");
    assert_eq!(&**f.get(Position::Attribute), "on");
    assert_eq!(&**f.get(Position::Value), "B2");
    assert_eq!(f.to_string(), "(B1 ^on B2)");
}

// =============================================================================
// Conditions
// =============================================================================

#[test]
fn condition_binds_each_variable() {
    let condition = Condition::new(var("a"), constant("b"), var("c"));
    let f = fact("x", "b", "y");
    assert!(condition.test(&f));

    let bindings = condition.bindings(&f);
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings.get("a").map(|c| &**c), Some("x"));
    assert_eq!(bindings.get("c").map(|c| &**c), Some("y"));
}

#[test]
fn condition_constants_must_match() {
    let condition = Condition::new(var("x"), constant("color"), constant("red"));
    assert!(condition.test(&fact("B1", "color", "red")));
    assert!(!condition.test(&fact("B1", "color", "blue")));
    assert!(!condition.test(&fact("B1", "colour", "red")));
}

#[test]
fn repeated_variable_requires_equal_fields() {
    let condition = Condition::new(var("x"), constant("self"), var("x"));
    assert!(condition.is_consistent(&fact("B1", "self", "B1")));
    assert!(!condition.is_consistent(&fact("B1", "self", "B2")));
    assert_eq!(condition.position_of("x"), Some(Position::Identifier));
}

// =============================================================================
// Action Patterns
// =============================================================================

#[test]
fn action_substitutes_bindings() {
    let action = ActionPattern::new(var("son"), constant("hasUncle"), var("uncle"));
    let mut bindings: Bindings<Arc<str>> = Bindings::new();
    bindings.insert("son", Arc::from("A"));
    bindings.insert("uncle", Arc::from("C"));
    assert_eq!(action.substitute(&bindings), Some(fact("A", "hasUncle", "C")));
}

#[test]
fn action_with_unbound_variable_yields_nothing() {
    let action = ActionPattern::new(var("son"), constant("hasUncle"), var("aunt"));
    let mut bindings: Bindings<Arc<str>> = Bindings::new();
    bindings.insert("son", Arc::from("A"));
    assert_eq!(action.substitute(&bindings), None);
}

#[test]
fn merged_bindings_keep_both_sides() {
    let left: Bindings<Arc<str>> = [("a".to_string(), Arc::from("1"))].into_iter().collect();
    let right: Bindings<Arc<str>> = [("b".to_string(), Arc::from("2"))].into_iter().collect();
    let merged = left.merge(&right);
    assert_eq!(merged.len(), 2);
    assert_eq!(left.len(), 1);
    assert_eq!(merged.to_string(), "{a: 1, b: 2}");
}
