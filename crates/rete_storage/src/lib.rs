//! Working memory stores for the Rete engine.
//!
//! This crate provides:
//! - [`WorkingMemory`] - The store contract the network inserts facts into
//! - [`SetWorkingMemory`] - A persistent, insertion-ordered set of facts

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod memory;

pub use memory::{SetWorkingMemory, WorkingMemory};
