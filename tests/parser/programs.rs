//! Whole programs read from text

use std::sync::Arc;

use rete_engine::ReteNetwork;
use rete_foundation::{Fact, Field};
use rete_parser::{FactParser, Rule, RuleParser, Statement, StatementParser, parse_facts, parse_rules};

const BLOCKS_RULES: &str = "
; Blocks world
[ (?x ^on ?y) ^ (?y ^left-of ?z) ^ (?z ^color red) => add (?x ^near-red ?z) ]
[ (?x ^on ?y) ^ (?y ^left-of ?z) ^ (?z ^on table)
  => add (?x ^near-grounded ?z) ]
";

const BLOCKS_FACTS: &str = "
B1 on B2 .
B1 on B3 .
B1 color red .
B2 on table .
B2 left-of B3 .
B2 color blue .
B3 left-of B4 .
B3 on table .
B3 color red .
";

#[test]
fn rules_and_facts_drive_a_network() {
    let rules: Vec<Rule<Arc<str>>> = parse_rules(BLOCKS_RULES).unwrap();
    let facts: Vec<Fact<Arc<str>>> = parse_facts(BLOCKS_FACTS).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(facts.len(), 9);

    let mut net = ReteNetwork::new();
    let ids: Vec<_> = rules
        .iter()
        .map(|rule| net.add_production(&rule.conditions).unwrap())
        .collect();
    for fact in facts {
        net.add(fact);
    }

    for id in ids {
        let matches = net.matches(id);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].binding("x").map(|c| &**c), Some("B1"));
        assert_eq!(matches[0].binding("z").map(|c| &**c), Some("B3"));
    }
}

#[test]
fn actions_instantiate_from_matches() {
    let rule: Rule<Arc<str>> = parse_rules(BLOCKS_RULES).unwrap().remove(0);
    let mut net = ReteNetwork::new();
    let id = net.add_production(&rule.conditions).unwrap();
    for fact in parse_facts(BLOCKS_FACTS).unwrap() {
        net.add(fact);
    }
    let derived = rule.actions[0]
        .pattern()
        .substitute(net.matches(id)[0].bindings())
        .unwrap();
    assert_eq!(derived.to_string(), "(B1 ^near-red B3)");
}

#[test]
fn incremental_readers_stop_at_end() {
    let mut rules = RuleParser::<String>::new(BLOCKS_RULES);
    assert!(rules.parse_next().unwrap().is_some());
    assert!(rules.parse_next().unwrap().is_some());
    assert!(rules.parse_next().unwrap().is_none());
    assert!(rules.parse_next().unwrap().is_none());

    let mut facts = FactParser::<String>::new("a b c .\n; only a comment\n");
    assert!(facts.parse_next().unwrap().is_some());
    assert!(facts.parse_next().unwrap().is_none());
    assert_eq!(facts.location().line, 3);
}

#[test]
fn statements_in_source_order() {
    let source = format!("{BLOCKS_FACTS}{BLOCKS_RULES}Z on B1 .");
    let statements: Vec<Statement<String>> = StatementParser::new(&source).parse_all().unwrap();
    assert_eq!(statements.len(), 12);
    assert!(matches!(statements[9], Statement::Rule(_)));
    assert!(matches!(statements[11], Statement::Fact(ref f) if f.identifier == "Z"));
}

#[test]
fn unicode_constants() {
    let facts: Vec<Fact<String>> = parse_facts("Zoë likes café .").unwrap();
    assert_eq!(facts[0], Fact::new("Zoë", "likes", "café"));

    let rules: Vec<Rule<String>> = parse_rules("[ ($x ^likes café) => ($x ^is français) ]").unwrap();
    assert_eq!(rules[0].conditions[0].value, Field::constant("café"));
}

#[test]
fn printed_rules_read_back() {
    let rules: Vec<Rule<String>> = parse_rules(BLOCKS_RULES).unwrap();
    let printed: String = rules.iter().map(|r| format!("{r}\n")).collect();
    let reread: Vec<Rule<String>> = parse_rules(&printed).unwrap();
    assert_eq!(reread, rules);
}
