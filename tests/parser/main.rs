//! Integration tests for Layer 3: Parser
//!
//! Tests for reading rules and facts and feeding them to a network.

mod errors;
mod programs;
