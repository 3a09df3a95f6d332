//! Working memory: the set of facts currently asserted.
//!
//! The network treats working memory as an opaque store. It needs duplicate
//! detection on insert and a way to walk every fact when a new alpha memory
//! has to be back-filled.

use std::fmt;

use rete_foundation::{Constant, Fact};

/// The store behind a Rete network.
pub trait WorkingMemory<C: Constant> {
    /// Inserts a fact.
    ///
    /// Returns `false` if an equal fact was already present, in which case
    /// the store is unchanged.
    fn insert(&mut self, fact: Fact<C>) -> bool;

    /// Returns true if an equal fact is present.
    fn contains(&self, fact: &Fact<C>) -> bool;

    /// Returns the number of facts.
    fn len(&self) -> usize;

    /// Returns true if the store holds no facts.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every fact.
    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Fact<C>>
    where
        C: 'a;
}

/// Working memory backed by persistent collections.
///
/// Facts iterate in insertion order. Cloning is O(1), so a host can keep
/// cheap snapshots of what was asserted at any point.
#[derive(Clone)]
pub struct SetWorkingMemory<C: Constant> {
    /// Membership index for duplicate detection.
    index: im::HashSet<Fact<C>>,
    /// Facts in the order they were first inserted.
    order: im::Vector<Fact<C>>,
}

impl<C: Constant> Default for SetWorkingMemory<C> {
    fn default() -> Self {
        Self {
            index: im::HashSet::new(),
            order: im::Vector::new(),
        }
    }
}

impl<C: Constant> SetWorkingMemory<C> {
    /// Creates an empty working memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fact inserted at the given ordinal.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Fact<C>> {
        self.order.get(index)
    }
}

impl<C: Constant> WorkingMemory<C> for SetWorkingMemory<C> {
    fn insert(&mut self, fact: Fact<C>) -> bool {
        if self.index.contains(&fact) {
            return false;
        }
        self.index.insert(fact.clone());
        self.order.push_back(fact);
        true
    }

    fn contains(&self, fact: &Fact<C>) -> bool {
        self.index.contains(fact)
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Fact<C>>
    where
        C: 'a,
    {
        self.order.iter()
    }
}

impl<C: Constant> FromIterator<Fact<C>> for SetWorkingMemory<C> {
    fn from_iter<I: IntoIterator<Item = Fact<C>>>(iter: I) -> Self {
        let mut memory = Self::new();
        for fact in iter {
            memory.insert(fact);
        }
        memory
    }
}

impl<C: Constant> fmt::Debug for SetWorkingMemory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.order.iter()).finish()
    }
}
