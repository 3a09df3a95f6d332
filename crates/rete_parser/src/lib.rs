//! Readers for the Rete rule and fact text formats.
//!
//! This crate provides:
//! - [`RuleParser`] - `[ cond ^ cond => add action, action ]`
//! - [`FactParser`] - `identifier attribute value .`
//! - [`StatementParser`] - Sources mixing both
//! - [`Rule`] - A parsed production with its actions
//!
//! Errors carry the line and column of the first bad character.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cursor;
pub mod parser;
pub mod rule;


pub use cursor::{Cursor, Location};
pub use parser::{
    ADD_KEYWORD, FactParser, RuleParser, Statement, StatementParser, parse_facts, parse_rules,
};
pub use rule::{Rule, RuleAction};
