//! The network orchestrator.
//!
//! [`ReteNetwork`] owns the alpha memories, the beta node arena, the working
//! memory, and the production target. It has exactly two mutating entry
//! points, [`add`](ReteNetwork::add) and
//! [`add_production`](ReteNetwork::add_production); both run every
//! activation they cause to completion before returning.
//!
//! Propagation is depth-first:
//!
//! ```text
//! add(fact)
//!   └─ alpha memory activation (one per registered index of the fact)
//!        └─ join right activation (successors in reverse attachment order)
//!             └─ beta memory / production left activation (children in order)
//!                  └─ join left activation ...
//! ```

use std::collections::HashMap;
use std::fmt;

use rete_foundation::{Bindings, Condition, Constant, Error, Fact, Result};
use rete_storage::{SetWorkingMemory, WorkingMemory};
use tracing::{debug, trace};

use crate::alpha::{AlphaMemory, AlphaMemoryId, AlphaMemoryIndex};
use crate::node::{
    BetaMemory, JoinNode, NodeId, NodeKind, PNode, ProductionId, ReteNode, TestAtJoinNode,
};
use crate::target::ProductionTarget;
use crate::token::Token;

// =============================================================================
// Network Stats
// =============================================================================

/// Structural counters for a network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetworkStats {
    /// Facts in working memory.
    pub facts: usize,
    /// Registered alpha memories.
    pub alpha_memories: usize,
    /// Beta memory nodes.
    pub beta_memories: usize,
    /// Join nodes.
    pub join_nodes: usize,
    /// Production nodes.
    pub productions: usize,
    /// Tokens stored across beta memories and production nodes.
    pub tokens: usize,
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "facts: {}, nodes: α:{} β:{} ⋈:{} P:{}, tokens: {}",
            self.facts,
            self.alpha_memories,
            self.beta_memories,
            self.join_nodes,
            self.productions,
            self.tokens
        )
    }
}

// =============================================================================
// Rete Network
// =============================================================================

/// A Rete network over constants of type `C`.
///
/// `W` stores the facts seen so far and suppresses duplicates; `T` is told
/// whenever a production gains a match.
///
/// # Example
///
/// ```
/// use rete_engine::ReteNetwork;
/// use rete_foundation::{Condition, Fact, Field};
///
/// let mut network = ReteNetwork::<&str>::new();
/// let uncle = network
///     .add_production(&[
///         Condition::new(Field::variable("son"), Field::constant("hasFather"), Field::variable("father")),
///         Condition::new(Field::variable("father"), Field::constant("hasBrother"), Field::variable("uncle")),
///     ])
///     .unwrap();
///
/// network.add(Fact::new("A", "hasFather", "B"));
/// assert!(network.matches(uncle).is_empty());
///
/// network.add(Fact::new("B", "hasBrother", "C"));
/// assert_eq!(network.matches(uncle)[0].binding("uncle"), Some(&"C"));
/// ```
pub struct ReteNetwork<C: Constant, W = SetWorkingMemory<C>, T = ()> {
    alpha_index: HashMap<AlphaMemoryIndex<C>, AlphaMemoryId>,
    alpha_memories: Vec<AlphaMemory<C>>,
    nodes: Vec<ReteNode<C>>,
    working_memory: W,
    target: T,
}

impl<C: Constant> ReteNetwork<C> {
    /// Creates an empty network with a set-backed working memory and no
    /// production target.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(SetWorkingMemory::new(), ())
    }
}

impl<C: Constant> Default for ReteNetwork<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Constant, T: ProductionTarget<C>> ReteNetwork<C, SetWorkingMemory<C>, T> {
    /// Creates an empty network that notifies `target`.
    #[must_use]
    pub fn with_target(target: T) -> Self {
        Self::with_parts(SetWorkingMemory::new(), target)
    }
}

impl<C, W, T> ReteNetwork<C, W, T>
where
    C: Constant,
    W: WorkingMemory<C>,
    T: ProductionTarget<C>,
{
    /// Creates a network from a working memory and a target.
    ///
    /// Facts already in `working_memory` are not propagated; they only
    /// back-fill alpha memories created later.
    pub fn with_parts(working_memory: W, target: T) -> Self {
        Self {
            alpha_index: HashMap::new(),
            alpha_memories: Vec::new(),
            nodes: vec![ReteNode::new(None, NodeKind::Top)],
            working_memory,
            target,
        }
    }

    // -------------------------------------------------------------------------
    // Entry points
    // -------------------------------------------------------------------------

    /// Adds a fact to working memory and propagates it.
    ///
    /// Returns `false`, with no other effect, if the fact was already present.
    pub fn add(&mut self, fact: Fact<C>) -> bool {
        if !self.working_memory.insert(fact.clone()) {
            trace!(%fact, "duplicate fact ignored");
            return false;
        }
        trace!(%fact, "fact added");

        for index in AlphaMemoryIndex::for_fact(&fact) {
            if let Some(&memory) = self.alpha_index.get(&index) {
                self.alpha_memory_activation(memory, &fact);
            }
        }
        true
    }

    /// Registers a production and returns its handle.
    ///
    /// Any existing structure for a shared condition prefix is reused. The
    /// production is matched against every fact already in working memory
    /// before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::EmptyProduction`](rete_foundation::ErrorKind::EmptyProduction)
    /// if `conditions` is empty.
    pub fn add_production(&mut self, conditions: &[Condition<C>]) -> Result<ProductionId> {
        if conditions.is_empty() {
            return Err(Error::empty_production());
        }

        let mut current = NodeId::TOP;
        for (i, condition) in conditions.iter().enumerate() {
            let beta_memory = self.build_or_share_beta_memory(current);
            let tests = join_tests(condition, &conditions[..i]);
            let alpha_memory = self.build_or_share_alpha_memory(condition);
            current = self.build_or_share_join_node(beta_memory, alpha_memory, tests, condition);
        }
        let production = self.build_or_share_pnode(current);
        debug!(%production, conditions = conditions.len(), "production registered");
        Ok(production)
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Returns a production node.
    #[must_use]
    pub fn production(&self, id: ProductionId) -> Option<&PNode<C>> {
        self.nodes.get(id.0.0).and_then(ReteNode::as_production)
    }

    /// Returns the current matches of a production; empty for unknown ids.
    #[must_use]
    pub fn matches(&self, id: ProductionId) -> &[Token<C>] {
        self.production(id).map(PNode::items).unwrap_or_default()
    }

    /// Returns every production handle, in registration order.
    pub fn productions(&self) -> impl Iterator<Item = ProductionId> + '_ {
        self.nodes
            .iter()
            .filter_map(|node| node.as_production().map(PNode::id))
    }

    /// Returns a beta network node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&ReteNode<C>> {
        self.nodes.get(id.0)
    }

    /// Returns the number of beta network nodes, including the top node.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an alpha memory.
    #[must_use]
    pub fn alpha_memory(&self, id: AlphaMemoryId) -> Option<&AlphaMemory<C>> {
        self.alpha_memories.get(id.0)
    }

    /// Looks up the alpha memory registered under an index.
    #[must_use]
    pub fn alpha_memory_id(&self, index: &AlphaMemoryIndex<C>) -> Option<AlphaMemoryId> {
        self.alpha_index.get(index).copied()
    }

    /// Looks up the alpha memory a condition would use, without building it.
    #[must_use]
    pub fn alpha_memory_for(&self, condition: &Condition<C>) -> Option<AlphaMemoryId> {
        self.alpha_memory_id(&AlphaMemoryIndex::from_condition(condition))
    }

    /// Returns the working memory.
    #[must_use]
    pub fn working_memory(&self) -> &W {
        &self.working_memory
    }

    /// Returns the production target.
    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns the production target mutably.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Consumes the network, returning its working memory and target.
    pub fn into_parts(self) -> (W, T) {
        (self.working_memory, self.target)
    }

    /// Counts the network's structure and stored tokens.
    #[must_use]
    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats {
            facts: self.working_memory.len(),
            alpha_memories: self.alpha_memories.len(),
            ..NetworkStats::default()
        };
        for node in &self.nodes {
            match &node.kind {
                NodeKind::Top => {}
                NodeKind::BetaMemory(memory) => {
                    stats.beta_memories += 1;
                    stats.tokens += memory.items().len();
                }
                NodeKind::Join(_) => stats.join_nodes += 1,
                NodeKind::Production(production) => {
                    stats.productions += 1;
                    stats.tokens += production.len();
                }
            }
        }
        stats
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    fn alpha_memory_activation(&mut self, id: AlphaMemoryId, fact: &Fact<C>) {
        let memory = &mut self.alpha_memories[id.0];
        memory.push(fact.clone());
        trace!(memory = %memory.index(), %fact, "alpha memory activated");

        // Descendants before ancestors, so a join never sees a token that
        // already contains this fact.
        let count = memory.successors().len();
        for i in (0..count).rev() {
            let join = self.alpha_memories[id.0].successors()[i];
            self.join_right_activation(join, fact, None);
        }
    }

    /// Joins a new fact against the parent beta memory. With a `recipient`,
    /// results go to that one child only.
    fn join_right_activation(&mut self, id: NodeId, fact: &Fact<C>, recipient: Option<NodeId>) {
        let Some(join) = self.nodes[id.0].as_join() else {
            return;
        };
        if !join.accepts(fact) {
            return;
        }
        let bindings = join.condition().bindings(fact);
        let parent = join.beta_memory();

        let count = self.nodes[parent.0].items().len();
        for i in 0..count {
            let token = self.nodes[parent.0].items()[i].clone();
            if self.join(id).is_some_and(|join| join.perform_join_tests(&token, fact)) {
                self.propagate(id, recipient, &token, fact, &bindings);
            }
        }
    }

    /// Joins a new token against the alpha memory.
    fn join_left_activation(&mut self, id: NodeId, token: &Token<C>) {
        let Some(join) = self.nodes[id.0].as_join() else {
            return;
        };
        let passing: Vec<(Fact<C>, Bindings<C>)> = self.alpha_memories[join.alpha_memory().0]
            .items()
            .iter()
            .filter(|fact| join.accepts(fact) && join.perform_join_tests(token, fact))
            .map(|fact| (fact.clone(), join.condition().bindings(fact)))
            .collect();

        for (fact, bindings) in &passing {
            self.propagate(id, None, token, fact, bindings);
        }
    }

    fn propagate(
        &mut self,
        join: NodeId,
        recipient: Option<NodeId>,
        token: &Token<C>,
        fact: &Fact<C>,
        bindings: &Bindings<C>,
    ) {
        if let Some(child) = recipient {
            self.left_activation(child, token, fact, bindings);
            return;
        }
        let count = self.nodes[join.0].children.len();
        for i in 0..count {
            let child = self.nodes[join.0].children[i];
            self.left_activation(child, token, fact, bindings);
        }
    }

    /// Stores `token + fact` in a beta memory or production node.
    fn left_activation(
        &mut self,
        id: NodeId,
        token: &Token<C>,
        fact: &Fact<C>,
        bindings: &Bindings<C>,
    ) {
        let new_token = token.extend(fact.clone(), bindings);
        match &mut self.nodes[id.0].kind {
            NodeKind::BetaMemory(memory) => memory.push(new_token.clone()),
            NodeKind::Production(production) => {
                production.push(new_token);
                trace!(production = %production.id(), matches = production.len(), "production activated");
                self.target.on_production_activated(production.id(), production);
                return;
            }
            // Only beta memories and production nodes hang below joins.
            NodeKind::Top | NodeKind::Join(_) => return,
        }

        let count = self.nodes[id.0].children.len();
        for i in 0..count {
            let child = self.nodes[id.0].children[i];
            self.join_left_activation(child, &new_token);
        }
    }

    fn join(&self, id: NodeId) -> Option<&JoinNode<C>> {
        self.nodes.get(id.0).and_then(ReteNode::as_join)
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    fn push_node(&mut self, parent: NodeId, kind: NodeKind<C>) -> NodeId {
        let id = NodeId(self.nodes.len());
        debug!(node = %id, %parent, kind = kind.name(), "node built");
        self.nodes.push(ReteNode::new(Some(parent), kind));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn find_child(&self, parent: NodeId, pred: impl Fn(&ReteNode<C>) -> bool) -> Option<NodeId> {
        let found = self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|child| pred(&self.nodes[child.0]));
        if let Some(id) = found {
            debug!(node = %id, %parent, "node shared");
        }
        found
    }

    fn build_or_share_beta_memory(&mut self, parent: NodeId) -> NodeId {
        if let Some(existing) = self.find_child(parent, |node| node.as_beta_memory().is_some()) {
            return existing;
        }
        let initial = (parent == NodeId::TOP).then(Token::root);
        let id = self.push_node(parent, NodeKind::BetaMemory(BetaMemory::new(initial)));
        self.update_new_node_with_matches_from_above(id);
        id
    }

    fn build_or_share_alpha_memory(&mut self, condition: &Condition<C>) -> AlphaMemoryId {
        let index = AlphaMemoryIndex::from_condition(condition);
        if let Some(&existing) = self.alpha_index.get(&index) {
            return existing;
        }

        let id = AlphaMemoryId(self.alpha_memories.len());
        let mut memory = AlphaMemory::new(index.clone());
        for fact in self.working_memory.iter().filter(|fact| index.matches(fact)) {
            memory.push(fact.clone());
        }
        debug!(memory = %id, %index, backfilled = memory.items().len(), "alpha memory built");

        self.alpha_memories.push(memory);
        self.alpha_index.insert(index, id);
        id
    }

    fn build_or_share_join_node(
        &mut self,
        parent: NodeId,
        alpha_memory: AlphaMemoryId,
        tests: Vec<TestAtJoinNode>,
        condition: &Condition<C>,
    ) -> NodeId {
        let shared = self.find_child(parent, |node| {
            node.as_join()
                .is_some_and(|join| join.is_shareable(alpha_memory, &tests, condition))
        });
        if let Some(existing) = shared {
            return existing;
        }

        let join = JoinNode::new(parent, alpha_memory, tests, condition.clone());
        let id = self.push_node(parent, NodeKind::Join(join));
        self.alpha_memories[alpha_memory.0].add_successor(id);
        id
    }

    fn build_or_share_pnode(&mut self, parent: NodeId) -> ProductionId {
        if let Some(existing) = self.find_child(parent, |node| node.as_production().is_some()) {
            return ProductionId(existing);
        }
        let id = ProductionId(NodeId(self.nodes.len()));
        self.push_node(parent, NodeKind::Production(PNode::new(id)));
        self.update_new_node_with_matches_from_above(id.0);
        id
    }

    /// Feeds a freshly built node every match its parent already holds.
    fn update_new_node_with_matches_from_above(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        match &self.nodes[parent.0].kind {
            NodeKind::BetaMemory(memory) => {
                let tokens = memory.items().to_vec();
                for token in &tokens {
                    self.join_left_activation(id, token);
                }
            }
            NodeKind::Join(join) => {
                let facts = self.alpha_memories[join.alpha_memory().0].items().to_vec();
                for fact in &facts {
                    self.join_right_activation(parent, fact, Some(id));
                }
            }
            NodeKind::Top | NodeKind::Production(_) => {}
        }
    }
}

impl<C, W, T> fmt::Debug for ReteNetwork<C, W, T>
where
    C: Constant,
    W: WorkingMemory<C>,
    T: ProductionTarget<C>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReteNetwork")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Derives the consistency tests for `condition` against the conditions
/// before it. Each variable is checked against its most recent earlier
/// occurrence only.
fn join_tests<C: Constant>(condition: &Condition<C>, earlier: &[Condition<C>]) -> Vec<TestAtJoinNode> {
    condition
        .variables()
        .into_iter()
        .filter_map(|(field_of_arg1, variable)| {
            earlier.iter().enumerate().rev().find_map(|(i, previous)| {
                previous
                    .position_of(variable)
                    .map(|field_of_arg2| TestAtJoinNode {
                        field_of_arg1,
                        condition_number_of_arg2: i,
                        field_of_arg2,
                    })
            })
        })
        .collect()
}
