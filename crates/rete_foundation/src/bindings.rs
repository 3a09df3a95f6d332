//! Variable bindings accumulated while matching.
//!
//! Bindings are a thin wrapper around `im::HashMap`: extending a token's
//! bindings shares structure with its parent's instead of copying them.

use std::fmt;

use crate::fact::Constant;

/// A persistent map from variable name to bound constant.
#[derive(Clone, PartialEq, Eq)]
pub struct Bindings<C: Constant>(im::HashMap<String, C>);

impl<C: Constant> Default for Bindings<C> {
    fn default() -> Self {
        Self(im::HashMap::new())
    }
}

impl<C: Constant> Bindings<C> {
    /// Creates empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no variable is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets the constant bound to a variable.
    #[must_use]
    pub fn get(&self, variable: &str) -> Option<&C> {
        self.0.get(variable)
    }

    /// Binds a variable, replacing any previous binding.
    pub fn insert(&mut self, variable: impl Into<String>, value: C) {
        self.0.insert(variable.into(), value);
    }

    /// Returns a new map holding both sets of bindings.
    ///
    /// Where both bind the same variable, `other` wins.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        Self(other.0.clone().union(self.0.clone()))
    }

    /// Iterates all bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &C)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the bindings sorted by variable name.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<(String, C)> {
        let mut pairs: Vec<_> = self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }
}

impl<C: Constant> FromIterator<(String, C)> for Bindings<C> {
    fn from_iter<I: IntoIterator<Item = (String, C)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<C: Constant> fmt::Debug for Bindings<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.to_sorted_vec()).finish()
    }
}

impl<C: Constant> fmt::Display for Bindings<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.to_sorted_vec().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}
