//! The alpha network: constant tests on single facts.
//!
//! Every alpha memory has the shape `(t1 ^t2 t3)` where each test is either
//! equality with a constant or a wildcard. A fact `(v1 ^v2 v3)` can only
//! belong to the eight memories obtained by pinning or wildcarding each of
//! its fields, so the alpha network is an exhaustive hash table lookup keyed
//! by [`AlphaMemoryIndex`].

use std::fmt;

use rete_foundation::{Condition, Constant, Fact};

use crate::node::NodeId;

// =============================================================================
// Alpha Memory Index
// =============================================================================

/// The constant tests of an alpha memory; `None` is a wildcard.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AlphaMemoryIndex<C> {
    /// Test on the identifier field.
    pub identifier: Option<C>,
    /// Test on the attribute field.
    pub attribute: Option<C>,
    /// Test on the value field.
    pub value: Option<C>,
}

impl<C: Constant> AlphaMemoryIndex<C> {
    /// Creates an index from three optional constants.
    #[must_use]
    pub fn new(identifier: Option<C>, attribute: Option<C>, value: Option<C>) -> Self {
        Self {
            identifier,
            attribute,
            value,
        }
    }

    /// Keeps the condition's constants and wildcards its variables.
    #[must_use]
    pub fn from_condition(condition: &Condition<C>) -> Self {
        Self::new(
            condition.identifier.as_constant().cloned(),
            condition.attribute.as_constant().cloned(),
            condition.value.as_constant().cloned(),
        )
    }

    /// Returns the eight indices a fact can be stored under.
    #[must_use]
    pub fn for_fact(fact: &Fact<C>) -> [Self; 8] {
        let i = || Some(fact.identifier.clone());
        let a = || Some(fact.attribute.clone());
        let v = || Some(fact.value.clone());
        [
            Self::new(i(), a(), v()),
            Self::new(i(), a(), None),
            Self::new(i(), None, v()),
            Self::new(i(), None, None),
            Self::new(None, a(), v()),
            Self::new(None, a(), None),
            Self::new(None, None, v()),
            Self::new(None, None, None),
        ]
    }

    /// Returns true if the fact passes every constant test.
    #[must_use]
    pub fn matches(&self, fact: &Fact<C>) -> bool {
        fn pass<C: PartialEq>(test: Option<&C>, field: &C) -> bool {
            test.is_none_or(|t| t == field)
        }
        pass(self.identifier.as_ref(), &fact.identifier)
            && pass(self.attribute.as_ref(), &fact.attribute)
            && pass(self.value.as_ref(), &fact.value)
    }
}

impl<C: fmt::Display> fmt::Display for AlphaMemoryIndex<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field<C: fmt::Display>(f: &mut fmt::Formatter<'_>, test: Option<&C>) -> fmt::Result {
            match test {
                Some(c) => write!(f, "{c}"),
                None => write!(f, "*"),
            }
        }
        write!(f, "(")?;
        field(f, self.identifier.as_ref())?;
        write!(f, " ^")?;
        field(f, self.attribute.as_ref())?;
        write!(f, " ")?;
        field(f, self.value.as_ref())?;
        write!(f, ")")
    }
}

// =============================================================================
// Alpha Memory
// =============================================================================

/// Handle to an alpha memory within one network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlphaMemoryId(pub(crate) usize);

impl AlphaMemoryId {
    /// Returns the raw index of this memory.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AlphaMemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "α{}", self.0)
    }
}

/// The facts passing one combination of constant tests, plus the join
/// nodes attached to them.
///
/// One alpha memory is shared by every condition, in every production, that
/// reduces to the same [`AlphaMemoryIndex`].
#[derive(Debug)]
pub struct AlphaMemory<C: Constant> {
    index: AlphaMemoryIndex<C>,
    items: Vec<Fact<C>>,
    successors: Vec<NodeId>,
}

impl<C: Constant> AlphaMemory<C> {
    pub(crate) fn new(index: AlphaMemoryIndex<C>) -> Self {
        Self {
            index,
            items: Vec::new(),
            successors: Vec::new(),
        }
    }

    /// The constant tests of this memory.
    #[must_use]
    pub fn index(&self) -> &AlphaMemoryIndex<C> {
        &self.index
    }

    /// Matching facts, in arrival order.
    #[must_use]
    pub fn items(&self) -> &[Fact<C>] {
        &self.items
    }

    /// Attached join nodes, in attachment order.
    #[must_use]
    pub fn successors(&self) -> &[NodeId] {
        &self.successors
    }

    pub(crate) fn push(&mut self, fact: Fact<C>) {
        self.items.push(fact);
    }

    pub(crate) fn add_successor(&mut self, join: NodeId) {
        self.successors.push(join);
    }
}
