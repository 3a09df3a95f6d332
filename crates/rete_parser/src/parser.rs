//! Readers for the rule and fact line formats.
//!
//! ```text
//! ; facts: three constants and a standalone period
//! B1 on B2 .
//!
//! ; rules: conditions joined by ^, actions separated by commas
//! [ ($x ^on $y) ^ ($y ^left-of $z) => add ($x ^above-left $z) ]
//! ```
//!
//! Variables start with `$` or `?`. The `add` keyword before an action is
//! optional. A `;` comments out the rest of the line.

use std::marker::PhantomData;

use rete_foundation::{ActionPattern, Condition, Constant, Fact, Field, Result};

use crate::cursor::{Cursor, Location};
use crate::rule::{Rule, RuleAction};

/// The only action keyword.
pub const ADD_KEYWORD: &str = "add";

fn is_variable_sigil(c: char) -> bool {
    c == '$' || c == '?'
}

fn is_variable_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn is_rule_constant_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '/')
}

fn is_fact_constant_char(c: char) -> bool {
    !c.is_whitespace() && c != '.' && c != ';'
}

// =============================================================================
// Rule Parser
// =============================================================================

/// Reads rules of the form `[ (f ^f f) ^ (f ^f f) => add (f ^f f), (f ^f f) ]`.
#[derive(Clone, Debug)]
pub struct RuleParser<'src, C> {
    cursor: Cursor<'src>,
    _constant: PhantomData<fn() -> C>,
}

impl<'src, C> RuleParser<'src, C>
where
    C: Constant + From<&'src str>,
{
    /// Creates a parser over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::from_cursor(Cursor::new(source))
    }

    fn from_cursor(cursor: Cursor<'src>) -> Self {
        Self {
            cursor,
            _constant: PhantomData,
        }
    }

    /// The parser's current location.
    #[must_use]
    pub fn location(&self) -> Location {
        self.cursor.location()
    }

    /// Reads the next rule, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns a parse error with the location of the first bad character.
    pub fn parse_next(&mut self) -> Result<Option<Rule<C>>> {
        self.cursor.skip_trivia();
        if self.cursor.is_eof() {
            return Ok(None);
        }
        self.rule().map(Some)
    }

    /// Reads every remaining rule.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed rule.
    pub fn parse_all(mut self) -> Result<Vec<Rule<C>>> {
        let mut rules = Vec::new();
        while let Some(rule) = self.parse_next()? {
            rules.push(rule);
        }
        Ok(rules)
    }

    fn rule(&mut self) -> Result<Rule<C>> {
        self.cursor.expect('[', "rule start")?;

        let mut conditions = vec![self.condition()?];
        loop {
            self.cursor.skip_trivia();
            if self.cursor.eat('^') {
                conditions.push(self.condition()?);
            } else if self.cursor.eat('=') {
                if !self.cursor.eat('>') {
                    return Err(self.cursor.unexpected("'>' after '='"));
                }
                break;
            } else {
                return Err(self.cursor.unexpected("'^' or '=>'"));
            }
        }

        let mut actions = vec![self.action()?];
        loop {
            self.cursor.skip_trivia();
            if self.cursor.eat(',') {
                actions.push(self.action()?);
            } else if self.cursor.eat(']') {
                break;
            } else {
                return Err(self.cursor.unexpected("',' or ']'"));
            }
        }

        Ok(Rule::new(conditions, actions))
    }

    fn condition(&mut self) -> Result<Condition<C>> {
        let (identifier, attribute, value) = self.fields("condition")?;
        Ok(Condition::new(identifier, attribute, value))
    }

    fn action(&mut self) -> Result<RuleAction<C>> {
        self.cursor.skip_trivia();
        if self.cursor.peek().is_some_and(char::is_alphabetic) {
            let start = self.cursor.clone();
            let keyword = self.cursor.take_while(char::is_alphanumeric);
            if keyword != ADD_KEYWORD {
                return Err(start.error(format!("unknown action '{keyword}', expected '{ADD_KEYWORD}'")));
            }
        }
        let (identifier, attribute, value) = self.fields("action")?;
        Ok(RuleAction::Add(ActionPattern::new(identifier, attribute, value)))
    }

    fn fields(&mut self, what: &str) -> Result<(Field<C>, Field<C>, Field<C>)> {
        self.cursor.expect('(', &format!("{what} start"))?;
        let identifier = self.field()?;
        self.cursor.expect('^', "attribute marker")?;
        let attribute = self.field()?;
        let value = self.field()?;
        self.cursor.expect(')', &format!("{what} end"))?;
        Ok((identifier, attribute, value))
    }

    fn field(&mut self) -> Result<Field<C>> {
        self.cursor.skip_trivia();
        match self.cursor.peek() {
            Some(c) if is_variable_sigil(c) => {
                self.cursor.advance();
                let name = self.cursor.take_while(is_variable_char);
                if name.is_empty() {
                    return Err(self.cursor.unexpected("variable name"));
                }
                Ok(Field::Variable(name.to_string()))
            }
            Some(c) if is_rule_constant_char(c) => {
                let text = self.cursor.take_while(is_rule_constant_char);
                Ok(Field::Constant(C::from(text)))
            }
            _ => Err(self.cursor.unexpected("variable or constant")),
        }
    }
}

// =============================================================================
// Fact Parser
// =============================================================================

/// Reads facts of the form `a b c .`.
#[derive(Clone, Debug)]
pub struct FactParser<'src, C> {
    cursor: Cursor<'src>,
    _constant: PhantomData<fn() -> C>,
}

impl<'src, C> FactParser<'src, C>
where
    C: Constant + From<&'src str>,
{
    /// Creates a parser over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::from_cursor(Cursor::new(source))
    }

    fn from_cursor(cursor: Cursor<'src>) -> Self {
        Self {
            cursor,
            _constant: PhantomData,
        }
    }

    /// The parser's current location.
    #[must_use]
    pub fn location(&self) -> Location {
        self.cursor.location()
    }

    /// Reads the next fact, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns a parse error with the location of the first bad character.
    pub fn parse_next(&mut self) -> Result<Option<Fact<C>>> {
        self.cursor.skip_trivia();
        if self.cursor.is_eof() {
            return Ok(None);
        }
        self.fact().map(Some)
    }

    /// Reads every remaining fact.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed fact.
    pub fn parse_all(mut self) -> Result<Vec<Fact<C>>> {
        let mut facts = Vec::new();
        while let Some(fact) = self.parse_next()? {
            facts.push(fact);
        }
        Ok(facts)
    }

    fn fact(&mut self) -> Result<Fact<C>> {
        let identifier = self.constant()?;
        let attribute = self.constant()?;
        let value = self.constant()?;
        self.cursor.expect('.', "fact terminator")?;
        Ok(Fact {
            identifier,
            attribute,
            value,
        })
    }

    fn constant(&mut self) -> Result<C> {
        self.cursor.skip_trivia();
        let text = self.cursor.take_while(is_fact_constant_char);
        if text.is_empty() {
            return Err(self.cursor.unexpected("constant"));
        }
        Ok(C::from(text))
    }
}

// =============================================================================
// Statements
// =============================================================================

/// One top-level item of a mixed source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement<C> {
    /// A bracketed rule.
    Rule(Rule<C>),
    /// A period-terminated fact.
    Fact(Fact<C>),
}

/// Reads a source mixing rules and facts; `[` starts a rule, anything else
/// starts a fact.
#[derive(Clone, Debug)]
pub struct StatementParser<'src, C> {
    cursor: Cursor<'src>,
    _constant: PhantomData<fn() -> C>,
}

impl<'src, C> StatementParser<'src, C>
where
    C: Constant + From<&'src str>,
{
    /// Creates a parser over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            _constant: PhantomData,
        }
    }

    /// Reads the next statement, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns a parse error with the location of the first bad character.
    pub fn parse_next(&mut self) -> Result<Option<Statement<C>>> {
        self.cursor.skip_trivia();
        if self.cursor.is_eof() {
            return Ok(None);
        }
        let statement = if self.cursor.peek() == Some('[') {
            let mut rules = RuleParser::from_cursor(self.cursor.clone());
            let rule = rules.rule()?;
            self.cursor = rules.cursor;
            Statement::Rule(rule)
        } else {
            let mut facts = FactParser::from_cursor(self.cursor.clone());
            let fact = facts.fact()?;
            self.cursor = facts.cursor;
            Statement::Fact(fact)
        };
        Ok(Some(statement))
    }

    /// Reads every remaining statement.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed statement.
    pub fn parse_all(mut self) -> Result<Vec<Statement<C>>> {
        let mut statements = Vec::new();
        while let Some(statement) = self.parse_next()? {
            statements.push(statement);
        }
        Ok(statements)
    }
}

/// Parses every rule in `source`.
///
/// # Errors
///
/// Returns the first parse error.
pub fn parse_rules<'src, C>(source: &'src str) -> Result<Vec<Rule<C>>>
where
    C: Constant + From<&'src str>,
{
    RuleParser::new(source).parse_all()
}

/// Parses every fact in `source`.
///
/// # Errors
///
/// Returns the first parse error.
pub fn parse_facts<'src, C>(source: &'src str) -> Result<Vec<Fact<C>>>
where
    C: Constant + From<&'src str>,
{
    FactParser::new(source).parse_all()
}
