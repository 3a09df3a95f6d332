//! Patterns over facts: fields, conditions, and action patterns.
//!
//! A [`Condition`] is one test of a production's left-hand side. An
//! [`ActionPattern`] is the write-side counterpart used to build derived
//! facts from a match's bindings.

use std::fmt;

use crate::bindings::Bindings;
use crate::fact::{Constant, Fact, Position};

// =============================================================================
// Field
// =============================================================================

/// A pattern slot: a constant to test for, or a named variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field<C> {
    /// Matches exactly this constant.
    Constant(C),
    /// Matches anything and binds it to the name.
    Variable(String),
}

impl<C: Constant> Field<C> {
    /// Creates a constant field.
    #[must_use]
    pub fn constant(value: impl Into<C>) -> Self {
        Self::Constant(value.into())
    }

    /// Creates a variable field.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Returns the constant, if this is a constant field.
    #[must_use]
    pub fn as_constant(&self) -> Option<&C> {
        match self {
            Self::Constant(c) => Some(c),
            Self::Variable(_) => None,
        }
    }

    /// Returns the variable name, if this is a variable field.
    #[must_use]
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Constant(_) => None,
            Self::Variable(name) => Some(name),
        }
    }

    /// Resolves the field to a constant.
    ///
    /// Returns `None` when the field is a variable with no binding.
    #[must_use]
    pub fn substitute(&self, bindings: &Bindings<C>) -> Option<C> {
        match self {
            Self::Constant(c) => Some(c.clone()),
            Self::Variable(name) => bindings.get(name).cloned(),
        }
    }
}

impl<C: fmt::Display> fmt::Display for Field<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "{c}"),
            Self::Variable(name) => write!(f, "${name}"),
        }
    }
}

// =============================================================================
// Condition
// =============================================================================

/// One test of a production against a fact's three fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Condition<C> {
    /// Test on the identifier field.
    pub identifier: Field<C>,
    /// Test on the attribute field.
    pub attribute: Field<C>,
    /// Test on the value field.
    pub value: Field<C>,
}

impl<C: Constant> Condition<C> {
    /// Creates a condition from its three fields.
    #[must_use]
    pub fn new(identifier: Field<C>, attribute: Field<C>, value: Field<C>) -> Self {
        Self {
            identifier,
            attribute,
            value,
        }
    }

    /// Returns the field at the given position.
    #[must_use]
    pub fn field(&self, position: Position) -> &Field<C> {
        match position {
            Position::Identifier => &self.identifier,
            Position::Attribute => &self.attribute,
            Position::Value => &self.value,
        }
    }

    /// Returns `(position, variable)` for every variable field, in field order.
    #[must_use]
    pub fn variables(&self) -> Vec<(Position, &str)> {
        Position::ALL
            .iter()
            .filter_map(|&p| self.field(p).as_variable().map(|v| (p, v)))
            .collect()
    }

    /// Returns the first position holding the given variable.
    #[must_use]
    pub fn position_of(&self, variable: &str) -> Option<Position> {
        Position::ALL
            .into_iter()
            .find(|&p| self.field(p).as_variable() == Some(variable))
    }

    /// Tests the constant fields against a fact.
    ///
    /// Variable fields always pass.
    #[must_use]
    pub fn test(&self, fact: &Fact<C>) -> bool {
        Position::ALL.iter().all(|&p| match self.field(p) {
            Field::Constant(c) => fact.get(p) == c,
            Field::Variable(_) => true,
        })
    }

    /// Checks that a variable used twice in this condition binds one value.
    ///
    /// `(?x ^self ?x)` is consistent with `(B1 ^self B1)` but not with
    /// `(B1 ^self B2)`.
    #[must_use]
    pub fn is_consistent(&self, fact: &Fact<C>) -> bool {
        let vars = self.variables();
        vars.iter().enumerate().all(|(i, (p1, v1))| {
            vars[i + 1..]
                .iter()
                .filter(|(_, v2)| v1 == v2)
                .all(|(p2, _)| fact.get(*p1) == fact.get(*p2))
        })
    }

    /// Extracts the variable bindings a matching fact produces.
    #[must_use]
    pub fn bindings(&self, fact: &Fact<C>) -> Bindings<C> {
        let mut bindings = Bindings::new();
        for (position, name) in self.variables() {
            bindings.insert(name, fact.get(position).clone());
        }
        bindings
    }
}

impl<C: fmt::Display> fmt::Display for Condition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} ^{} {})", self.identifier, self.attribute, self.value)
    }
}

// =============================================================================
// Action Pattern
// =============================================================================

/// A template for a derived fact.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionPattern<C> {
    /// Template for the identifier field.
    pub identifier: Field<C>,
    /// Template for the attribute field.
    pub attribute: Field<C>,
    /// Template for the value field.
    pub value: Field<C>,
}

impl<C: Constant> ActionPattern<C> {
    /// Creates an action pattern from its three fields.
    #[must_use]
    pub fn new(identifier: Field<C>, attribute: Field<C>, value: Field<C>) -> Self {
        Self {
            identifier,
            attribute,
            value,
        }
    }

    /// Builds a fact by substituting every variable from the bindings.
    ///
    /// Returns `None` if any variable is unbound.
    #[must_use]
    pub fn substitute(&self, bindings: &Bindings<C>) -> Option<Fact<C>> {
        Some(Fact {
            identifier: self.identifier.substitute(bindings)?,
            attribute: self.attribute.substitute(bindings)?,
            value: self.value.substitute(bindings)?,
        })
    }
}

impl<C: fmt::Display> fmt::Display for ActionPattern<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} ^{} {})", self.identifier, self.attribute, self.value)
    }
}
