//! Session state for the REPL.
//!
//! A session owns one [`ForwardChainer`] and the rules registered with it,
//! in registration order.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use rete_engine::{NetworkStats, ProductionId, Token};
use rete_foundation::{Error, ErrorContext, Fact, Result};
use rete_parser::{Rule, Statement, StatementParser};
use tracing::info;

use crate::chain::ForwardChainer;

/// The constant type used by interactive sessions.
pub type Symbol = Arc<str>;

/// What one call to [`Session::eval`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalSummary {
    /// Rules registered.
    pub rules: usize,
    /// Asserted facts that were new.
    pub facts: usize,
    /// Facts derived by forward chaining.
    pub derived: usize,
}

impl EvalSummary {
    /// Returns true if nothing changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules == 0 && self.facts == 0 && self.derived == 0
    }
}

impl fmt::Display for EvalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        write!(
            f,
            "{} rule{}, {} fact{}, {} derived",
            self.rules,
            plural(self.rules),
            self.facts,
            plural(self.facts),
            self.derived
        )
    }
}

/// Session state for an interactive REPL session.
#[derive(Debug)]
pub struct Session {
    chainer: ForwardChainer<Symbol>,
    rules: Vec<(ProductionId, Rule<Symbol>)>,
    /// Current load path for relative file resolution.
    load_path: PathBuf,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chainer(ForwardChainer::new())
    }

    /// Creates a session around an existing chainer.
    #[must_use]
    pub fn with_chainer(chainer: ForwardChainer<Symbol>) -> Self {
        Self {
            chainer,
            rules: Vec::new(),
            load_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Parses `source` and applies each statement in order.
    ///
    /// Nothing is applied if any statement fails to parse.
    ///
    /// # Errors
    ///
    /// Returns the first parse error, or the first rule or chaining error.
    pub fn eval(&mut self, source: &str) -> Result<EvalSummary> {
        let statements = StatementParser::<Symbol>::new(source).parse_all()?;
        let derived_before = self.chainer.derived();
        let mut summary = EvalSummary::default();

        for statement in statements {
            match statement {
                Statement::Rule(rule) => {
                    let production = self.chainer.attach_rule(&rule)?;
                    self.rules.push((production, rule));
                    summary.rules += 1;
                    self.chainer.run()?;
                }
                Statement::Fact(fact) => {
                    if self.chainer.assert_fact(fact)? {
                        summary.facts += 1;
                    }
                }
            }
        }

        summary.derived = self.chainer.derived() - derived_before;
        Ok(summary)
    }

    /// Reads a file and evaluates its contents.
    ///
    /// Relative paths resolve against the load path, which then moves to
    /// the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or any error from
    /// [`eval`](Self::eval) tagged with the file name.
    pub fn load_file(&mut self, path: &str) -> Result<EvalSummary> {
        let resolved = self.resolve_path(path);
        let source = std::fs::read_to_string(&resolved)
            .map_err(|e| Error::io(resolved.display().to_string(), &e))?;

        let previous = self.load_path.clone();
        if let Some(parent) = resolved.parent() {
            self.load_path = parent.to_path_buf();
        }
        let result = self.eval(&source);
        self.load_path = previous;

        let summary = result.map_err(|e| {
            e.with_context(ErrorContext::new().with_source(resolved.display().to_string()))
        })?;
        info!(path = %resolved.display(), %summary, "loaded");
        Ok(summary)
    }

    /// Resolves a path relative to the current load path.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = PathBuf::from(path);
        if p.is_absolute() { p } else { self.load_path.join(p) }
    }

    /// Returns the current load path.
    #[must_use]
    pub fn load_path(&self) -> &PathBuf {
        &self.load_path
    }

    /// Sets the load path.
    pub fn set_load_path(&mut self, path: PathBuf) {
        self.load_path = path;
    }

    /// Every fact in working memory, in arrival order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact<Symbol>> {
        self.chainer.facts()
    }

    /// Registered rules, in registration order.
    #[must_use]
    pub fn rules(&self) -> &[(ProductionId, Rule<Symbol>)] {
        &self.rules
    }

    /// Current matches of the `number`th rule, counting from 1.
    ///
    /// # Errors
    ///
    /// Fails if no rule has that number.
    pub fn matches(&self, number: usize) -> Result<&[Token<Symbol>]> {
        let (production, _) = number
            .checked_sub(1)
            .and_then(|index| self.rules.get(index))
            .ok_or_else(|| Error::unknown_production(number))?;
        Ok(self.chainer.matches(*production))
    }

    /// Distinct attribute names in working memory, sorted.
    #[must_use]
    pub fn attributes(&self) -> Vec<String> {
        self.facts()
            .map(|fact| fact.attribute.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Network counters.
    #[must_use]
    pub fn stats(&self) -> NetworkStats {
        self.chainer.stats()
    }

    /// Total facts derived in this session.
    #[must_use]
    pub const fn derived(&self) -> usize {
        self.chainer.derived()
    }

    /// The underlying chainer.
    #[must_use]
    pub const fn chainer(&self) -> &ForwardChainer<Symbol> {
        &self.chainer
    }
}
