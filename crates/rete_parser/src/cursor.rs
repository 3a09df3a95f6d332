//! Character cursor with source location tracking.

use rete_foundation::{Error, Result};

/// A position in source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// Byte offset into the source.
    pub offset: usize,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number, counted in characters.
    pub column: u32,
}

impl Location {
    /// The start of any input.
    pub const START: Location = Location {
        offset: 0,
        line: 1,
        column: 1,
    };
}

/// Walks source text one character at a time.
#[derive(Clone, Debug)]
pub struct Cursor<'src> {
    rest: &'src str,
    location: Location,
}

impl<'src> Cursor<'src> {
    /// Creates a cursor at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            location: Location::START,
        }
    }

    /// The current location.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Returns true once every character has been consumed.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.rest.is_empty()
    }

    /// Peeks at the next character.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks `n` characters past the next one.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    pub fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.rest = &self.rest[c.len_utf8()..];
            self.location.offset += c.len_utf8();
            if c == '\n' {
                self.location.line += 1;
                self.location.column = 1;
            } else {
                self.location.column += 1;
            }
        }
    }

    /// Consumes the next character if it is `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the longest prefix whose characters satisfy `pred`.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let rest = self.rest;
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        let taken = &rest[..len];
        for _ in taken.chars() {
            self.advance();
        }
        taken
    }

    /// Skips whitespace and `;` comments.
    pub fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.advance(),
                Some(';') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Skips trivia, then consumes `expected` or fails naming `what`.
    ///
    /// # Errors
    ///
    /// Returns a parse error at the offending character.
    pub fn expect(&mut self, expected: char, what: &str) -> Result<()> {
        self.skip_trivia();
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("{what} '{expected}'")))
        }
    }

    /// Builds a parse error at the current location.
    #[must_use]
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::parse(
            message,
            self.location.line,
            self.location.column,
            self.location.offset,
        )
    }

    /// Builds an "expected X, found Y" error at the current location.
    #[must_use]
    pub fn unexpected(&self, expected: &str) -> Error {
        match self.peek() {
            Some(c) => self.error(format!("expected {expected}, found '{c}'")),
            None => self.error(format!("expected {expected}, found end of input")),
        }
    }
}
