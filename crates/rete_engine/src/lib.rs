//! The Rete match network.
//!
//! This crate provides:
//! - [`ReteNetwork`] - Fact insertion, production registration, and node sharing
//! - [`AlphaMemory`] - Facts passing one set of constant tests
//! - [`ReteNode`] - Beta memories, join nodes, and production nodes in an arena
//! - [`Token`] - Persistent partial matches
//! - [`ProductionTarget`] - Callback for new complete matches

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod alpha;
pub mod network;
pub mod node;
pub mod target;
pub mod token;

pub use alpha::{AlphaMemory, AlphaMemoryId, AlphaMemoryIndex};
pub use network::{NetworkStats, ReteNetwork};
pub use node::{BetaMemory, JoinNode, NodeId, NodeKind, PNode, ProductionId, ReteNode, TestAtJoinNode};
pub use target::ProductionTarget;
pub use token::Token;
