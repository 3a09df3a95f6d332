//! The beta network: memory, join, and production nodes.
//!
//! Nodes live in an arena owned by the network and refer to each other by
//! [`NodeId`]. A node's `children` list is the owning edge; `parent` is a
//! plain back-reference. The activation procedures that move tokens between
//! nodes live on [`ReteNetwork`](crate::ReteNetwork), since they need to
//! reach several nodes and alpha memories at once.

use std::fmt;

use rete_foundation::{Condition, Constant, Fact, Position};

use crate::alpha::AlphaMemoryId;
use crate::token::Token;

// =============================================================================
// Identifiers
// =============================================================================

/// Handle to a node of the beta network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The dummy top node every network starts with.
    pub const TOP: NodeId = NodeId(0);

    /// Returns the raw arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "β{}", self.0)
    }
}

/// Handle to a production node, returned when a production is registered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductionId(pub(crate) NodeId);

impl ProductionId {
    /// Returns the beta network node backing this production.
    #[must_use]
    pub const fn node(self) -> NodeId {
        self.0
    }
}

impl fmt::Display for ProductionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0.0)
    }
}

// =============================================================================
// Rete Node
// =============================================================================

/// A slot in the beta network arena.
#[derive(Debug)]
pub struct ReteNode<C: Constant> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind<C>,
}

impl<C: Constant> ReteNode<C> {
    pub(crate) fn new(parent: Option<NodeId>, kind: NodeKind<C>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            kind,
        }
    }

    /// The node this one hangs below; `None` only for the top node.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes, in registration order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The variant-specific state.
    #[must_use]
    pub fn kind(&self) -> &NodeKind<C> {
        &self.kind
    }

    /// Returns the beta memory state, if this is a beta memory.
    #[must_use]
    pub fn as_beta_memory(&self) -> Option<&BetaMemory<C>> {
        match &self.kind {
            NodeKind::BetaMemory(memory) => Some(memory),
            _ => None,
        }
    }

    /// Returns the join state, if this is a join node.
    #[must_use]
    pub fn as_join(&self) -> Option<&JoinNode<C>> {
        match &self.kind {
            NodeKind::Join(join) => Some(join),
            _ => None,
        }
    }

    /// Returns the production state, if this is a production node.
    #[must_use]
    pub fn as_production(&self) -> Option<&PNode<C>> {
        match &self.kind {
            NodeKind::Production(production) => Some(production),
            _ => None,
        }
    }

    /// Tokens stored at this node; empty for nodes that store none.
    #[must_use]
    pub fn items(&self) -> &[Token<C>] {
        match &self.kind {
            NodeKind::BetaMemory(memory) => memory.items(),
            NodeKind::Production(production) => production.items(),
            NodeKind::Top | NodeKind::Join(_) => &[],
        }
    }
}

/// The closed set of beta network node variants.
#[derive(Debug)]
pub enum NodeKind<C: Constant> {
    /// The dummy top node; the entry point of the beta network.
    Top,
    /// Stores partial matches.
    BetaMemory(BetaMemory<C>),
    /// Tests variable binding consistency between a token and a fact.
    Join(JoinNode<C>),
    /// Stores complete matches of one production.
    Production(PNode<C>),
}

impl<C: Constant> NodeKind<C> {
    /// A short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::BetaMemory(_) => "beta-memory",
            Self::Join(_) => "join",
            Self::Production(_) => "production",
        }
    }
}

// =============================================================================
// Beta Memory
// =============================================================================

/// Partial matches of a production prefix.
#[derive(Debug)]
pub struct BetaMemory<C: Constant> {
    items: Vec<Token<C>>,
}

impl<C: Constant> BetaMemory<C> {
    /// Creates a beta memory, optionally seeded with one token.
    pub(crate) fn new(initial: Option<Token<C>>) -> Self {
        Self {
            items: initial.into_iter().collect(),
        }
    }

    /// Stored tokens, in arrival order.
    #[must_use]
    pub fn items(&self) -> &[Token<C>] {
        &self.items
    }

    pub(crate) fn push(&mut self, token: Token<C>) {
        self.items.push(token);
    }
}

// =============================================================================
// Join Node
// =============================================================================

/// A variable binding consistency check performed at a join node.
///
/// `field_of_arg1` is read from the incoming fact; `field_of_arg2` is read
/// from the fact the token bound to condition `condition_number_of_arg2`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TestAtJoinNode {
    /// Field of the incoming fact.
    pub field_of_arg1: Position,
    /// Index of the earlier condition within the production.
    pub condition_number_of_arg2: usize,
    /// Field of the earlier fact.
    pub field_of_arg2: Position,
}

impl fmt::Display for TestAtJoinNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = #{}.{}",
            self.field_of_arg1, self.condition_number_of_arg2, self.field_of_arg2
        )
    }
}

/// Joins the tokens of its parent beta memory with the facts of one alpha
/// memory. Stores nothing itself.
#[derive(Debug)]
pub struct JoinNode<C: Constant> {
    beta_memory: NodeId,
    alpha_memory: AlphaMemoryId,
    tests: Vec<TestAtJoinNode>,
    condition: Condition<C>,
}

impl<C: Constant> JoinNode<C> {
    pub(crate) fn new(
        beta_memory: NodeId,
        alpha_memory: AlphaMemoryId,
        tests: Vec<TestAtJoinNode>,
        condition: Condition<C>,
    ) -> Self {
        Self {
            beta_memory,
            alpha_memory,
            tests,
            condition,
        }
    }

    /// The parent beta memory.
    #[must_use]
    pub fn beta_memory(&self) -> NodeId {
        self.beta_memory
    }

    /// The attached alpha memory.
    #[must_use]
    pub fn alpha_memory(&self) -> AlphaMemoryId {
        self.alpha_memory
    }

    /// The consistency tests, in derivation order.
    #[must_use]
    pub fn tests(&self) -> &[TestAtJoinNode] {
        &self.tests
    }

    /// The condition this node joins on.
    #[must_use]
    pub fn condition(&self) -> &Condition<C> {
        &self.condition
    }

    /// Returns true if this node was built for exactly these inputs.
    pub(crate) fn is_shareable(
        &self,
        alpha_memory: AlphaMemoryId,
        tests: &[TestAtJoinNode],
        condition: &Condition<C>,
    ) -> bool {
        self.alpha_memory == alpha_memory && self.tests == tests && &self.condition == condition
    }

    /// Runs every consistency test on a token/fact pair.
    ///
    /// With no tests every pair passes.
    #[must_use]
    pub fn perform_join_tests(&self, token: &Token<C>, fact: &Fact<C>) -> bool {
        self.tests.iter().all(|test| {
            let arg1 = fact.get(test.field_of_arg1);
            token
                .fact_at(test.condition_number_of_arg2)
                .is_some_and(|earlier| earlier.get(test.field_of_arg2) == arg1)
        })
    }

    /// Checks the fact against the condition's own repeated variables.
    ///
    /// Stricter than a plain constant test: `(?x ^self ?x)` rejects
    /// `(a self b)` rather than binding `x` to whichever position comes last.
    pub(crate) fn accepts(&self, fact: &Fact<C>) -> bool {
        self.condition.is_consistent(fact)
    }
}

// =============================================================================
// Production Node
// =============================================================================

/// The terminal node of a production: its current complete matches.
#[derive(Debug)]
pub struct PNode<C: Constant> {
    id: ProductionId,
    items: Vec<Token<C>>,
}

impl<C: Constant> PNode<C> {
    pub(crate) fn new(id: ProductionId) -> Self {
        Self {
            id,
            items: Vec::new(),
        }
    }

    /// The handle of this production.
    #[must_use]
    pub fn id(&self) -> ProductionId {
        self.id
    }

    /// Complete matches, in the order they were found.
    #[must_use]
    pub fn items(&self) -> &[Token<C>] {
        &self.items
    }

    /// The most recently found match.
    #[must_use]
    pub fn last(&self) -> Option<&Token<C>> {
        self.items.last()
    }

    /// Returns the number of complete matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the production has no matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn push(&mut self, token: Token<C>) {
        self.items.push(token);
    }
}
