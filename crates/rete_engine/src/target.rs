//! Production activation callbacks.

use rete_foundation::Constant;

use crate::node::{PNode, ProductionId};

/// Receives a notification each time a production gains a complete match.
///
/// The network owns its target and calls it synchronously from inside
/// [`add`](crate::ReteNetwork::add) or
/// [`add_production`](crate::ReteNetwork::add_production). The new match is
/// `production.last()`. Implementations must not assume the callback runs
/// once per fact: one fact can complete several matches.
pub trait ProductionTarget<C: Constant> {
    /// Called after a token has been appended to `production`.
    fn on_production_activated(&mut self, id: ProductionId, production: &PNode<C>);
}

/// Ignores every activation.
impl<C: Constant> ProductionTarget<C> for () {
    fn on_production_activated(&mut self, _id: ProductionId, _production: &PNode<C>) {}
}

/// Records the activation sequence.
impl<C: Constant> ProductionTarget<C> for Vec<ProductionId> {
    fn on_production_activated(&mut self, id: ProductionId, _production: &PNode<C>) {
        self.push(id);
    }
}
