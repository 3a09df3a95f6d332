//! Partial matches.
//!
//! A token is a sequence of facts satisfying the first k conditions of some
//! production. Tokens are list-form: each holds its parent (the match of the
//! first k-1 conditions) and the fact bound to condition k, so all tokens in
//! the network form a tree rooted at the empty match.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rete_foundation::{Bindings, Constant, Fact};

/// A persistent, reference-counted partial match.
///
/// Cloning a token is O(1). Equality compares the fact sequences, never the
/// allocation.
#[derive(Clone)]
pub struct Token<C: Constant>(Rc<TokenNode<C>>);

struct TokenNode<C: Constant> {
    parent: Option<Token<C>>,
    fact: Option<Fact<C>>,
    bindings: Bindings<C>,
    len: usize,
}

impl<C: Constant> Token<C> {
    /// Creates the root token representing the empty match.
    #[must_use]
    pub fn root() -> Self {
        Self(Rc::new(TokenNode {
            parent: None,
            fact: None,
            bindings: Bindings::new(),
            len: 0,
        }))
    }

    /// Creates a child token matching one more condition.
    ///
    /// The child's bindings are this token's bindings extended with `bindings`.
    #[must_use]
    pub fn extend(&self, fact: Fact<C>, bindings: &Bindings<C>) -> Self {
        Self(Rc::new(TokenNode {
            parent: Some(self.clone()),
            fact: Some(fact),
            bindings: self.0.bindings.merge(bindings),
            len: self.0.len + 1,
        }))
    }

    /// Returns the token for the first k-1 conditions.
    #[must_use]
    pub fn parent(&self) -> Option<&Token<C>> {
        self.0.parent.as_ref()
    }

    /// Returns the fact bound to the last condition.
    #[must_use]
    pub fn fact(&self) -> Option<&Fact<C>> {
        self.0.fact.as_ref()
    }

    /// Returns every binding accumulated along the chain.
    #[must_use]
    pub fn bindings(&self) -> &Bindings<C> {
        &self.0.bindings
    }

    /// Looks up a single binding.
    #[must_use]
    pub fn binding(&self, variable: &str) -> Option<&C> {
        self.0.bindings.get(variable)
    }

    /// Returns the number of facts in the match.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len
    }

    /// Returns true for the root token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.len == 0
    }

    /// Returns the fact bound to the condition at `index` (0-based).
    #[must_use]
    pub fn fact_at(&self, index: usize) -> Option<&Fact<C>> {
        if index >= self.0.len {
            return None;
        }
        let mut current = self;
        for _ in 0..(self.0.len - 1 - index) {
            current = current.parent()?;
        }
        current.fact()
    }

    /// Returns the matched facts, first condition first.
    #[must_use]
    pub fn facts(&self) -> Vec<&Fact<C>> {
        let mut facts = Vec::with_capacity(self.0.len);
        let mut current = Some(self);
        while let Some(token) = current {
            if let Some(fact) = token.fact() {
                facts.push(fact);
            }
            current = token.parent();
        }
        facts.reverse();
        facts
    }

    /// Returns true if both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<C: Constant> PartialEq for Token<C> {
    fn eq(&self, other: &Self) -> bool {
        let (mut a, mut b) = (self, other);
        if a.len() != b.len() {
            return false;
        }
        loop {
            if a.ptr_eq(b) {
                return true;
            }
            if a.fact() != b.fact() {
                return false;
            }
            match (a.parent(), b.parent()) {
                (Some(pa), Some(pb)) => {
                    a = pa;
                    b = pb;
                }
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

impl<C: Constant> Eq for Token<C> {}

impl<C: Constant> Hash for Token<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for fact in self.facts() {
            fact.hash(state);
        }
    }
}

impl<C: Constant> fmt::Debug for Token<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.facts()).finish()
    }
}
