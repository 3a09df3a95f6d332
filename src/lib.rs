//! Rete - Incremental pattern matching over fact triples
//!
//! This crate re-exports all layers of the Rete system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: rete_runtime    - Forward chaining, session, REPL, CLI
//! Layer 3: rete_parser     - Rule and fact text readers
//! Layer 2: rete_engine     - Alpha/beta network, tokens, production nodes
//! Layer 1: rete_storage    - Working memory with duplicate detection
//! Layer 0: rete_foundation - Core types (Fact, Condition, Bindings, Error)
//! ```

pub use rete_engine as engine;
pub use rete_foundation as foundation;
pub use rete_parser as parser;
pub use rete_runtime as runtime;
pub use rete_storage as storage;
