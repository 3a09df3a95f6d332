//! Parse error reporting

use rete_foundation::{ErrorKind, Fact};
use rete_parser::{Rule, parse_facts, parse_rules};

fn rule_error(source: &str) -> (u32, u32, String) {
    let err = parse_rules::<String>(source).unwrap_err();
    let (line, column) = err.position().unwrap();
    (line, column, err.to_string())
}

#[test]
fn missing_close_paren() {
    let (line, column, message) = rule_error("[ ($a ^b $c => ($a ^d $c) ]");
    assert_eq!((line, column), (1, 13));
    assert!(message.contains("')'"), "{message}");
}

#[test]
fn missing_attribute_marker() {
    let (line, column, _) = rule_error("[\n  ($a b $c) => ($a ^d $c) ]");
    assert_eq!((line, column), (2, 7));
}

#[test]
fn unclosed_rule() {
    let (line, _, message) = rule_error("[ ($a ^b $c) => ($a ^d $c)\n\n");
    assert_eq!(line, 3);
    assert!(message.contains("end of input"), "{message}");
}

#[test]
fn second_rule_error_is_located() {
    let (line, column, _) = rule_error("[ ($a ^b $c) => ($a ^d $c) ]\n[ ($a ^b $c) => ]");
    assert_eq!((line, column), (2, 17));
}

#[test]
fn error_offset_indexes_source() {
    let source = "x y z .\nbad fact";
    let err = parse_facts::<String>(source).unwrap_err();
    let ErrorKind::ParseError { offset, line, .. } = err.kind else {
        panic!("expected parse error");
    };
    assert_eq!(line, 2);
    assert!(offset <= source.len());
}

#[test]
fn fact_fields_may_not_run_together() {
    let facts: Vec<Fact<String>> = parse_facts("a b c.").unwrap();
    assert_eq!(facts.len(), 1);
    assert!(parse_facts::<String>("a b.c").is_err());
}

#[test]
fn rule_needs_a_condition() {
    assert!(parse_rules::<String>("[ => ($a ^b $c) ]").is_err());
    let ok: Vec<Rule<String>> = parse_rules("").unwrap();
    assert!(ok.is_empty());
}
