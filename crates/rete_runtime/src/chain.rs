//! Forward chaining.
//!
//! A [`DerivationQueue`] sits behind the network as its production target.
//! Every time a production gains a match, the queue instantiates that
//! production's actions with the match's bindings and holds the resulting
//! facts. [`ForwardChainer::run`] feeds them back through
//! [`ReteNetwork::add`] until nothing new is derived.

use std::collections::{HashMap, VecDeque};

use rete_engine::{NetworkStats, PNode, ProductionId, ProductionTarget, ReteNetwork, Token};
use rete_foundation::{Constant, Error, Fact, Result, SemanticLimit};
use rete_parser::{Rule, RuleAction};
use rete_storage::{SetWorkingMemory, WorkingMemory};
use tracing::{debug, trace, warn};

/// Default kill switch for [`ForwardChainer::run`].
pub const DEFAULT_MAX_DERIVATIONS: usize = 100_000;

// =============================================================================
// Derivation Queue
// =============================================================================

/// Production target that turns matches into pending facts.
#[derive(Debug)]
pub struct DerivationQueue<C: Constant> {
    actions: HashMap<ProductionId, Vec<RuleAction<C>>>,
    pending: VecDeque<Fact<C>>,
}

impl<C: Constant> Default for DerivationQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Constant> DerivationQueue<C> {
    /// Creates an empty queue with no actions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            pending: VecDeque::new(),
        }
    }

    /// Attaches actions to a production; later matches will fire them.
    pub fn attach(&mut self, production: ProductionId, actions: impl IntoIterator<Item = RuleAction<C>>) {
        self.actions.entry(production).or_default().extend(actions);
    }

    /// The actions attached to a production.
    #[must_use]
    pub fn actions(&self, production: ProductionId) -> &[RuleAction<C>] {
        self.actions.get(&production).map(Vec::as_slice).unwrap_or_default()
    }

    /// Instantiates `actions` for matches that already exist.
    pub fn replay(&mut self, actions: &[RuleAction<C>], tokens: &[Token<C>]) {
        for token in tokens {
            enqueue(&mut self.pending, actions, token);
        }
    }

    /// Takes the oldest pending fact.
    pub fn pop(&mut self) -> Option<Fact<C>> {
        self.pending.pop_front()
    }

    /// Returns the number of pending facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops every pending fact.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<C: Constant> ProductionTarget<C> for DerivationQueue<C> {
    fn on_production_activated(&mut self, id: ProductionId, production: &PNode<C>) {
        let (Some(actions), Some(token)) = (self.actions.get(&id), production.last()) else {
            return;
        };
        enqueue(&mut self.pending, actions, token);
    }
}

fn enqueue<C: Constant>(pending: &mut VecDeque<Fact<C>>, actions: &[RuleAction<C>], token: &Token<C>) {
    for action in actions {
        let pattern = action.pattern();
        match pattern.substitute(token.bindings()) {
            Some(fact) => {
                trace!(%fact, "derived");
                pending.push_back(fact);
            }
            None => warn!(%pattern, bindings = %token.bindings(), "action skipped: unbound variable"),
        }
    }
}

// =============================================================================
// Forward Chainer
// =============================================================================

/// A Rete network that applies its rules' actions until quiescence.
///
/// # Example
///
/// ```
/// use rete_foundation::Fact;
/// use rete_parser::parse_rules;
/// use rete_runtime::ForwardChainer;
///
/// let mut chainer = ForwardChainer::<String>::new();
/// for rule in parse_rules("[ ($s ^hasFather $f) ^ ($f ^hasBrother $u) => ($s ^hasUncle $u) ]").unwrap() {
///     chainer.add_rule(&rule).unwrap();
/// }
/// chainer.assert_fact(Fact::new("A", "hasFather", "B")).unwrap();
/// chainer.assert_fact(Fact::new("B", "hasBrother", "C")).unwrap();
///
/// assert!(chainer.contains(&Fact::new("A", "hasUncle", "C")));
/// ```
#[derive(Debug)]
pub struct ForwardChainer<C: Constant> {
    network: ReteNetwork<C, SetWorkingMemory<C>, DerivationQueue<C>>,
    max_derivations: usize,
    derived: usize,
}

impl<C: Constant> Default for ForwardChainer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Constant> ForwardChainer<C> {
    /// Creates a chainer with no rules and no facts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            network: ReteNetwork::with_target(DerivationQueue::new()),
            max_derivations: DEFAULT_MAX_DERIVATIONS,
            derived: 0,
        }
    }

    /// Sets how many new facts one run may derive before failing.
    #[must_use]
    pub const fn with_max_derivations(mut self, limit: usize) -> Self {
        self.max_derivations = limit;
        self
    }

    /// The derivation limit per run.
    #[must_use]
    pub const fn max_derivations(&self) -> usize {
        self.max_derivations
    }

    /// Registers a rule and fires its actions for every existing match.
    ///
    /// # Errors
    ///
    /// Fails if the rule has no conditions or the resulting run exceeds the
    /// derivation limit. In the second case the rule stays registered.
    pub fn add_rule(&mut self, rule: &Rule<C>) -> Result<ProductionId> {
        let production = self.attach_rule(rule)?;
        self.run()?;
        Ok(production)
    }

    /// Registers a rule and queues its actions for every existing match
    /// without running.
    ///
    /// # Errors
    ///
    /// Fails if the rule has no conditions; nothing is registered then.
    pub fn attach_rule(&mut self, rule: &Rule<C>) -> Result<ProductionId> {
        for variable in rule.unbound_action_variables() {
            warn!(%rule, variable, "action variable is never bound");
        }
        let production = self.network.add_production(&rule.conditions)?;

        // A shared production may already hold matches that earlier rules
        // fired on; only the new actions need to see them.
        let existing = self.network.matches(production).to_vec();
        let queue = self.network.target_mut();
        queue.replay(&rule.actions, &existing);
        queue.attach(production, rule.actions.iter().cloned());
        debug!(%production, matches = existing.len(), "rule attached");
        Ok(production)
    }

    /// Adds a fact and runs to quiescence.
    ///
    /// Returns `false` if the fact was already known.
    ///
    /// # Errors
    ///
    /// Fails if the run exceeds the derivation limit.
    pub fn assert_fact(&mut self, fact: Fact<C>) -> Result<bool> {
        let added = self.network.add(fact);
        self.run()?;
        Ok(added)
    }

    /// Feeds pending derived facts back into the network until none remain.
    ///
    /// Returns the number of new facts added.
    ///
    /// # Errors
    ///
    /// Returns [`SemanticLimit::MaxDerivations`] once more than
    /// `max_derivations` new facts have been added; the remaining queue is
    /// dropped.
    pub fn run(&mut self) -> Result<usize> {
        let mut added = 0;
        while let Some(fact) = self.network.target_mut().pop() {
            if !self.network.add(fact) {
                continue;
            }
            added += 1;
            self.derived += 1;
            if added > self.max_derivations {
                self.network.target_mut().clear();
                return Err(Error::limit_exceeded(SemanticLimit::MaxDerivations {
                    limit: self.max_derivations,
                }));
            }
        }
        if added > 0 {
            debug!(added, total = self.derived, "run complete");
        }
        Ok(added)
    }

    /// Returns true if the fact is in working memory.
    #[must_use]
    pub fn contains(&self, fact: &Fact<C>) -> bool {
        self.network.working_memory().contains(fact)
    }

    /// Every known fact, asserted or derived, in arrival order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact<C>> {
        self.network.working_memory().iter()
    }

    /// Current matches of a production.
    #[must_use]
    pub fn matches(&self, production: ProductionId) -> &[Token<C>] {
        self.network.matches(production)
    }

    /// Total facts derived over the chainer's lifetime.
    #[must_use]
    pub const fn derived(&self) -> usize {
        self.derived
    }

    /// Structural counters of the underlying network.
    #[must_use]
    pub fn stats(&self) -> NetworkStats {
        self.network.stats()
    }

    /// The underlying network.
    #[must_use]
    pub const fn network(&self) -> &ReteNetwork<C, SetWorkingMemory<C>, DerivationQueue<C>> {
        &self.network
    }
}
