//! Facts, patterns, bindings, and errors for the Rete engine.
//!
//! This crate provides:
//! - [`Fact`] - The `(identifier ^attribute value)` working memory element
//! - [`Field`], [`Condition`], [`ActionPattern`] - Read and write side patterns
//! - [`Bindings`] - Persistent variable bindings
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bindings;
pub mod error;
pub mod fact;
pub mod pattern;

pub use bindings::Bindings;
pub use error::{Error, ErrorContext, ErrorKind, Result, SemanticLimit};
pub use fact::{Constant, Fact, Position};
pub use pattern::{ActionPattern, Condition, Field};
