//! Error types for the Rete system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for Rete operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a parse error at the given source location.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: u32, column: u32, offset: usize) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line,
            column,
            offset,
        })
    }

    /// Creates an error for a production without conditions.
    #[must_use]
    pub fn empty_production() -> Self {
        Self::new(ErrorKind::EmptyProduction)
    }

    /// Creates an error for a production handle this network never issued.
    #[must_use]
    pub fn unknown_production(index: usize) -> Self {
        Self::new(ErrorKind::UnknownProduction(index))
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Creates an I/O error for the given path.
    #[must_use]
    pub fn io(path: impl Into<String>, source: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io {
            path: path.into(),
            message: source.to_string(),
        })
    }

    /// Returns the source position `(line, column)` of a parse error.
    #[must_use]
    pub fn position(&self) -> Option<(u32, u32)> {
        match &self.kind {
            ErrorKind::ParseError { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

/// Categorized error kinds.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed rule or fact text.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// Byte offset into the source.
        offset: usize,
    },

    /// A production was registered with no conditions.
    #[error("a production needs at least one condition")]
    EmptyProduction,

    /// A production handle did not belong to this network.
    #[error("unknown production: {0}")]
    UnknownProduction(usize),

    /// Semantic limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),

    /// Reading a source file failed.
    #[error("failed to read {path}: {message}")]
    Io {
        /// The path that was read.
        path: String,
        /// The underlying I/O error message.
        message: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Semantic limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// Forward chaining derived more facts than allowed in one run.
    MaxDerivations {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxDerivations { limit } => {
                write!(f, "max derivations ({limit}) exceeded")
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or rule text.
    pub source: Option<String>,
    /// Stack of enclosing operations.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

/// Result type alias using the Rete [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
