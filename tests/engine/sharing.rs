//! Node sharing across productions

use rete_engine::{ReteNetwork, Token};
use rete_foundation::Fact;

use crate::{c, f};

fn blocks() -> Vec<Fact<String>> {
    vec![
        f("B1", "on", "B2"),
        f("B1", "on", "B3"),
        f("B1", "color", "red"),
        f("B2", "on", "table"),
        f("B2", "left-of", "B3"),
        f("B2", "color", "blue"),
        f("B3", "left-of", "B4"),
        f("B3", "on", "table"),
        f("B3", "color", "red"),
    ]
}

fn facts(token: &Token<String>) -> Vec<Fact<String>> {
    token.facts().into_iter().cloned().collect()
}

#[test]
fn common_prefix_shares_nodes() {
    let mut net = ReteNetwork::new();
    let on = c("?x", "on", "?y");
    let left_of = c("?y", "left-of", "?z");

    net.add_production(&[on.clone(), left_of.clone(), c("?z", "color", "red")])
        .unwrap();
    let after_first = net.stats();
    net.add_production(&[on.clone(), left_of.clone(), c("?z", "on", "table")])
        .unwrap();
    let after_second = net.stats();

    // Only the third join, its memory, and the production are new.
    assert_eq!(after_second.join_nodes, after_first.join_nodes + 1);
    assert_eq!(after_second.beta_memories, after_first.beta_memories);
    assert_eq!(after_second.productions, 2);

    let on_memory = net.alpha_memory_for(&on).unwrap();
    assert_eq!(net.alpha_memory(on_memory).unwrap().successors().len(), 1);
}

#[test]
fn shared_alpha_memory_for_equivalent_conditions() {
    let mut net: ReteNetwork<String> = ReteNetwork::new();
    net.add_production(&[c("?x", "on", "?y")]).unwrap();
    net.add_production(&[c("?a", "on", "?b")]).unwrap();

    assert_eq!(net.stats().alpha_memories, 1);
    assert_eq!(
        net.alpha_memory_for(&c("?x", "on", "?y")),
        net.alpha_memory_for(&c("?p", "on", "?q"))
    );
}

#[test]
fn identical_productions_share_a_handle() {
    let mut net: ReteNetwork<String> = ReteNetwork::new();
    let conditions = [c("?x", "on", "?y"), c("?y", "on", "table")];
    let first = net.add_production(&conditions).unwrap();
    let second = net.add_production(&conditions).unwrap();
    assert_eq!(first, second);
    assert_eq!(net.stats().productions, 1);
}

#[test]
fn shared_prefix_yields_consistent_matches() {
    let mut net = ReteNetwork::new();
    let c0 = c("?x", "on", "?y");
    let c1 = c("?y", "left-of", "?z");
    let c2 = c("?z", "color", "red");
    let c3 = c("?z", "on", "table");
    let c4 = c("?z", "left-of", "B4");

    let p0 = net.add_production(&[c0.clone(), c1.clone(), c2.clone()]).unwrap();
    let p1 = net
        .add_production(&[c0.clone(), c1.clone(), c3.clone(), c4])
        .unwrap();
    let wmes = blocks();
    for wme in &wmes {
        net.add(wme.clone());
    }
    let p2 = net.add_production(&[c0, c1, c3, c2]).unwrap();

    let expected = vec![wmes[0].clone(), wmes[4].clone(), wmes[8].clone()];
    assert_eq!(net.matches(p0).len(), 1);
    assert_eq!(facts(&net.matches(p0)[0]), expected);

    assert_eq!(net.matches(p1).len(), 1);
    assert_eq!(
        facts(&net.matches(p1)[0]),
        vec![wmes[0].clone(), wmes[4].clone(), wmes[7].clone(), wmes[6].clone()]
    );

    assert_eq!(net.matches(p2).len(), 1);
    assert_eq!(
        facts(&net.matches(p2)[0]),
        vec![wmes[0].clone(), wmes[4].clone(), wmes[7].clone(), wmes[8].clone()]
    );
}
