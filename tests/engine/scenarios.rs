//! Concrete matching scenarios

use rete_engine::{ReteNetwork, Token};
use rete_foundation::Fact;
use rete_storage::WorkingMemory;

use crate::{c, f};

fn facts(token: &Token<String>) -> Vec<Fact<String>> {
    token.facts().into_iter().cloned().collect()
}

#[test]
fn single_condition_binds_fields() {
    let mut net = ReteNetwork::new();
    let p = net.add_production(&[c("?a", "b", "?c")]).unwrap();
    net.add(f("x", "b", "y"));

    let matches = net.matches(p);
    assert_eq!(matches.len(), 1);
    let bindings = matches[0].bindings();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings.get("a").map(String::as_str), Some("x"));
    assert_eq!(bindings.get("c").map(String::as_str), Some("y"));
}

#[test]
fn uncle_appears_after_second_fact() {
    let mut net = ReteNetwork::new();
    let p = net
        .add_production(&[c("?son", "hasFather", "?father"), c("?father", "hasBrother", "?uncle")])
        .unwrap();

    net.add(f("A", "hasFather", "B"));
    assert!(net.matches(p).is_empty());

    net.add(f("B", "hasBrother", "C"));
    let matches = net.matches(p);
    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches[0].bindings().to_sorted_vec(),
        vec![
            ("father".to_string(), "B".to_string()),
            ("son".to_string(), "A".to_string()),
            ("uncle".to_string(), "C".to_string()),
        ]
    );
    assert_eq!(facts(&matches[0]), vec![f("A", "hasFather", "B"), f("B", "hasBrother", "C")]);
}

#[test]
fn self_color_red_matches_once() {
    let mut net = ReteNetwork::new();
    let p = net
        .add_production(&[c("?x", "self", "?y"), c("?x", "color", "red"), c("?y", "color", "red")])
        .unwrap();
    net.add(f("B1", "self", "B1"));
    net.add(f("B1", "color", "red"));

    assert_eq!(net.matches(p).len(), 1);
    assert_eq!(
        facts(&net.matches(p)[0]),
        vec![f("B1", "self", "B1"), f("B1", "color", "red"), f("B1", "color", "red")]
    );
}

#[test]
fn repeated_variable_within_condition() {
    let mut net = ReteNetwork::new();
    let p = net.add_production(&[c("?x", "self", "?x")]).unwrap();
    net.add(f("B1", "self", "B2"));
    assert!(net.matches(p).is_empty());
    net.add(f("B1", "self", "B1"));
    assert_eq!(net.matches(p).len(), 1);
}

#[test]
fn join_compares_against_latest_binding() {
    let mut net = ReteNetwork::new();
    let p = net
        .add_production(&[c("?x", "on", "?y"), c("?y", "on", "?z"), c("?z", "color", "?c")])
        .unwrap();
    for fact in [
        f("B1", "on", "B2"),
        f("B2", "on", "B3"),
        f("B3", "color", "red"),
        f("B2", "color", "blue"),
    ] {
        net.add(fact);
    }
    let matches = net.matches(p);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].binding("c").map(String::as_str), Some("red"));
}

#[test]
fn duplicate_fact_changes_nothing() {
    let mut net = ReteNetwork::new();
    let p = net.add_production(&[c("?x", "on", "?y")]).unwrap();
    assert!(net.add(f("B1", "on", "B2")));
    let before = net.stats();
    assert!(!net.add(f("B1", "on", "B2")));
    assert_eq!(net.stats().tokens, before.tokens);
    assert_eq!(net.matches(p).len(), 1);
    assert_eq!(net.working_memory().len(), 1);
}

#[test]
fn unrelated_facts_create_no_alpha_memory() {
    let mut net = ReteNetwork::new();
    net.add_production(&[c("?x", "on", "?y")]).unwrap();
    let before = net.stats().alpha_memories;
    net.add(f("B1", "color", "red"));
    assert_eq!(net.stats().alpha_memories, before);
    assert_eq!(net.working_memory().len(), 1);
}

#[test]
fn empty_production_is_an_error() {
    let mut net: ReteNetwork<String> = ReteNetwork::new();
    assert!(net.add_production(&[]).is_err());
}

#[test]
fn target_sees_every_activation() {
    let mut net = ReteNetwork::with_target(Vec::new());
    let p = net.add_production(&[c("?x", "on", "?y")]).unwrap();
    net.add(f("B1", "on", "B2"));
    net.add(f("B2", "on", "B3"));
    net.add(f("B2", "on", "B3"));
    assert_eq!(net.target(), &vec![p, p]);
}

#[test]
fn repeated_variable_filters_back_filled_facts() {
    let mut net = ReteNetwork::new();
    net.add(f("a", "self", "b"));
    net.add(f("c", "self", "c"));
    let p = net.add_production(&[c("?x", "self", "?x")]).unwrap();

    assert_eq!(net.working_memory().len(), 2);
    assert_eq!(net.matches(p).len(), 1);
    assert_eq!(facts(&net.matches(p)[0]), vec![f("c", "self", "c")]);
}
