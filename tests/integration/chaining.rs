//! Forward chaining to a fixpoint

use proptest::prelude::*;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rete_foundation::{ErrorKind, Fact, SemanticLimit};
use rete_parser::{Rule, parse_rules};
use rete_runtime::ForwardChainer;
use std::collections::BTreeSet;

const FAMILY: &str = "
[ ($s ^hasFather $f) ^ ($f ^hasBrother $u) => ($s ^hasUncle $u) ]
[ ($a ^hasBrother $b) => ($b ^hasSibling $a), ($a ^hasSibling $b) ]
[ ($a ^hasSibling $b) ^ ($b ^hasSibling $c) => ($a ^hasSibling $c) ]
";

const REACH: &str = "
[ ($a ^next $b) => ($a ^reach $b) ]
[ ($a ^reach $b) ^ ($b ^next $c) => ($a ^reach $c) ]
";

fn rules(source: &str) -> Vec<Rule<String>> {
    parse_rules(source).unwrap()
}

fn f(i: &str, a: &str, v: &str) -> Fact<String> {
    Fact::new(i, a, v)
}

fn closure(rules_first: bool, rule_set: &[Rule<String>], facts: &[Fact<String>]) -> BTreeSet<String> {
    let mut chainer = ForwardChainer::new();
    if rules_first {
        for rule in rule_set {
            chainer.add_rule(rule).unwrap();
        }
    }
    for fact in facts {
        chainer.assert_fact(fact.clone()).unwrap();
    }
    if !rules_first {
        for rule in rule_set {
            chainer.add_rule(rule).unwrap();
        }
    }
    chainer.facts().map(ToString::to_string).collect()
}

#[test]
fn uncle_is_derived_once() {
    let mut chainer = ForwardChainer::new();
    for rule in &rules(FAMILY) {
        chainer.add_rule(rule).unwrap();
    }
    chainer.assert_fact(f("A", "hasFather", "B")).unwrap();
    chainer.assert_fact(f("B", "hasBrother", "C")).unwrap();
    chainer.assert_fact(f("B", "hasBrother", "C")).unwrap();

    let uncles: Vec<_> = chainer
        .facts()
        .filter(|fact| fact.attribute == "hasUncle")
        .collect();
    assert_eq!(uncles, vec![&f("A", "hasUncle", "C")]);
    assert!(chainer.contains(&f("C", "hasSibling", "B")));
    assert!(chainer.contains(&f("B", "hasSibling", "B")));
}

#[test]
fn reachability_is_the_transitive_closure() {
    let mut chainer = ForwardChainer::new();
    for rule in &rules(REACH) {
        chainer.add_rule(rule).unwrap();
    }
    let n = 8;
    for i in 0..n {
        chainer
            .assert_fact(f(&format!("n{i}"), "next", &format!("n{}", i + 1)))
            .unwrap();
    }
    let reach = chainer.facts().filter(|fact| fact.attribute == "reach").count();
    assert_eq!(reach, n * (n + 1) / 2);
    assert_eq!(chainer.derived(), reach);
}

#[test]
fn kill_switch_stops_runaway_rules() {
    let counting = "[ ($n ^succ $m) ^ ($m ^succ $k) => ($n ^succ $k) ]";
    let mut chainer = ForwardChainer::new().with_max_derivations(20);
    for rule in &rules(counting) {
        chainer.add_rule(rule).unwrap();
    }
    let mut failure = None;
    for i in 0..40 {
        if let Err(e) = chainer.assert_fact(f(&format!("{i}"), "succ", &format!("{}", i + 1))) {
            failure = Some(e);
            break;
        }
    }
    let err = failure.expect("limit should trip");
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(SemanticLimit::MaxDerivations { limit: 20 })
    ));
}

proptest! {
    #[test]
    fn closure_ignores_fact_order(edges in prop::collection::vec((0u8..6, 0u8..6), 0..15), seed in any::<u64>()) {
        let rule_set = rules(REACH);
        let facts: Vec<_> = edges
            .iter()
            .map(|(a, b)| f(&format!("n{a}"), "next", &format!("n{b}")))
            .collect();
        let mut shuffled = facts.clone();
        shuffled.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

        prop_assert_eq!(closure(true, &rule_set, &facts), closure(true, &rule_set, &shuffled));
    }

    #[test]
    fn closure_ignores_rule_timing(edges in prop::collection::vec((0u8..6, 0u8..6), 0..15)) {
        let rule_set = rules(REACH);
        let facts: Vec<_> = edges
            .iter()
            .map(|(a, b)| f(&format!("n{a}"), "next", &format!("n{b}")))
            .collect();

        prop_assert_eq!(closure(true, &rule_set, &facts), closure(false, &rule_set, &facts));
    }
}
