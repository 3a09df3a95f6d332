//! Forward chaining, REPL, and CLI for the Rete engine.
//!
//! This crate provides:
//! - [`ForwardChainer`] - Applies rule actions until no new fact appears
//! - [`Session`] - Rules and facts entered interactively or from files
//! - [`Repl`] - Interactive read-eval-print loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chain;
pub mod editor;
pub mod highlight;
pub mod repl;
pub mod session;

pub use chain::{DEFAULT_MAX_DERIVATIONS, DerivationQueue, ForwardChainer};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use highlight::RuleHighlighter;
pub use repl::{Repl, Reply};
pub use session::{EvalSummary, Session, Symbol};
