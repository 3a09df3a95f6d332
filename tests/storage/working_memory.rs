//! Working memory tests

use proptest::prelude::*;
use rete_foundation::Fact;
use rete_storage::{SetWorkingMemory, WorkingMemory};

fn fact(i: &str, a: &str, v: &str) -> Fact<String> {
    Fact::new(i, a, v)
}

#[test]
fn insert_reports_novelty() {
    let mut wm = SetWorkingMemory::new();
    assert!(wm.insert(fact("a", "b", "c")));
    assert!(!wm.insert(fact("a", "b", "c")));
    assert!(wm.insert(fact("a", "b", "d")));
    assert_eq!(wm.len(), 2);
    assert!(wm.contains(&fact("a", "b", "d")));
}

#[test]
fn iteration_follows_arrival_order() {
    let wm: SetWorkingMemory<String> = [fact("z", "z", "z"), fact("a", "a", "a"), fact("z", "z", "z")]
        .into_iter()
        .collect();
    let order: Vec<_> = wm.iter().map(|f| f.identifier.clone()).collect();
    assert_eq!(order, vec!["z", "a"]);
}

#[test]
fn snapshots_are_independent() {
    let mut wm = SetWorkingMemory::new();
    wm.insert(fact("a", "b", "c"));
    let snapshot = wm.clone();
    wm.insert(fact("d", "e", "f"));
    assert_eq!(snapshot.len(), 1);
    assert_eq!(wm.len(), 2);
}

proptest! {
    #[test]
    fn len_counts_distinct_facts(triples in prop::collection::vec((0u8..4, 0u8..3, 0u8..4), 0..40)) {
        let mut wm = SetWorkingMemory::new();
        let mut distinct = std::collections::HashSet::new();
        for (i, a, v) in triples {
            let f = fact(&i.to_string(), &a.to_string(), &v.to_string());
            prop_assert_eq!(wm.insert(f.clone()), distinct.insert(f));
        }
        prop_assert_eq!(wm.len(), distinct.len());
        prop_assert_eq!(wm.iter().count(), distinct.len());
    }
}
