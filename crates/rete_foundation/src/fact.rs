//! Working memory elements.
//!
//! A fact is an `(identifier ^attribute value)` triple of constants. The
//! names of the three fields carry no meaning to the matcher.

use std::fmt;
use std::hash::Hash;

/// A value that can occupy a field of a fact.
///
/// Equality is structural: two constants are the same constant when they
/// compare equal, regardless of where they live in memory.
pub trait Constant: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

impl<T> Constant for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display {}

/// One of the three fields of a fact or pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    /// The first field.
    Identifier,
    /// The second field.
    Attribute,
    /// The third field.
    Value,
}

impl Position {
    /// All positions in field order.
    pub const ALL: [Position; 3] = [Position::Identifier, Position::Attribute, Position::Value];
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::Attribute => write!(f, "attribute"),
            Self::Value => write!(f, "value"),
        }
    }
}

/// A working memory element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fact<C> {
    /// The identifier field.
    pub identifier: C,
    /// The attribute field.
    pub attribute: C,
    /// The value field.
    pub value: C,
}

impl<C: Constant> Fact<C> {
    /// Creates a fact from its three fields.
    #[must_use]
    pub fn new(identifier: impl Into<C>, attribute: impl Into<C>, value: impl Into<C>) -> Self {
        Self {
            identifier: identifier.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Reads the field at the given position.
    #[must_use]
    pub fn get(&self, position: Position) -> &C {
        match position {
            Position::Identifier => &self.identifier,
            Position::Attribute => &self.attribute,
            Position::Value => &self.value,
        }
    }
}

impl<C: fmt::Display> fmt::Display for Fact<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} ^{} {})", self.identifier, self.attribute, self.value)
    }
}
