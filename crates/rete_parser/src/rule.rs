//! Parsed rules.

use std::fmt;

use rete_foundation::{ActionPattern, Condition, Constant, Field};

/// What a rule does when its conditions hold.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuleAction<C> {
    /// Derive a new fact.
    Add(ActionPattern<C>),
}

impl<C: Constant> RuleAction<C> {
    /// The fact template of this action.
    #[must_use]
    pub fn pattern(&self) -> &ActionPattern<C> {
        match self {
            Self::Add(pattern) => pattern,
        }
    }
}

impl<C: fmt::Display> fmt::Display for RuleAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(pattern) => write!(f, "add {pattern}"),
        }
    }
}

/// A production plus its consequent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rule<C> {
    /// The antecedent, in match order.
    pub conditions: Vec<Condition<C>>,
    /// The consequent.
    pub actions: Vec<RuleAction<C>>,
}

impl<C: Constant> Rule<C> {
    /// Creates a rule.
    #[must_use]
    pub fn new(conditions: Vec<Condition<C>>, actions: Vec<RuleAction<C>>) -> Self {
        Self {
            conditions,
            actions,
        }
    }

    /// Variables used by an action but bound by no condition, in order of
    /// first use.
    ///
    /// Actions mentioning them can never fire.
    #[must_use]
    pub fn unbound_action_variables(&self) -> Vec<&str> {
        let mut unbound: Vec<&str> = Vec::new();
        for action in &self.actions {
            let pattern = action.pattern();
            for field in [&pattern.identifier, &pattern.attribute, &pattern.value] {
                let Field::Variable(name) = field else {
                    continue;
                };
                let bound = self
                    .conditions
                    .iter()
                    .any(|condition| condition.position_of(name).is_some());
                if !bound && !unbound.contains(&name.as_str()) {
                    unbound.push(name);
                }
            }
        }
        unbound
    }
}

/// Renders the rule in the syntax [`RuleParser`](crate::RuleParser) reads.
impl<C: fmt::Display> fmt::Display for Rule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " ^ ")?;
            }
            write!(f, "{condition}")?;
        }
        write!(f, " =>")?;
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {action}")?;
        }
        write!(f, " ]")
    }
}
