//! Integration tests for Layer 0: Foundation
//!
//! Tests for facts, patterns, bindings, and errors.

mod patterns;
