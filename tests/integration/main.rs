//! Cross-layer integration tests
//!
//! Tests forward chaining and sessions end to end, from text to derived facts.

mod chaining;
mod session;
