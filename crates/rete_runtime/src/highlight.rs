//! Syntax highlighting for the REPL.

use std::borrow::Cow;

const RESET: &str = "\x1b[0m";

/// Highlighter for rule and fact syntax.
pub struct RuleHighlighter {}

impl RuleHighlighter {
    /// Creates a new highlighter.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }

    /// Highlight a line of input.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let mut result = String::with_capacity(line.len() * 2);
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                // Comments run to end of line
                ';' => {
                    result.push_str("\x1b[2;3m"); // dim italic
                    result.push(c);
                    result.extend(chars.by_ref());
                    result.push_str(RESET);
                }

                // REPL commands, only at the start of input
                ':' if result.is_empty() => {
                    result.push_str("\x1b[1;36m"); // bold cyan
                    result.push(c);
                    while let Some(next) = chars.next_if(|n| !n.is_whitespace()) {
                        result.push(next);
                    }
                    result.push_str(RESET);
                }

                // Variables ($name or ?name)
                '$' | '?' => {
                    result.push_str("\x1b[34m"); // blue
                    result.push(c);
                    while let Some(next) =
                        chars.next_if(|n| n.is_alphanumeric() || *n == '-' || *n == '_')
                    {
                        result.push(next);
                    }
                    result.push_str(RESET);
                }

                // Attribute marker, conjunction, and arrow
                '^' => {
                    result.push_str("\x1b[36m"); // cyan
                    result.push(c);
                    while let Some(next) =
                        chars.next_if(|n| !n.is_whitespace() && !"()[];".contains(*n))
                    {
                        result.push(next);
                    }
                    result.push_str(RESET);
                }
                '=' if chars.peek() == Some(&'>') => {
                    chars.next();
                    result.push_str("\x1b[1;32m=>"); // bold green
                    result.push_str(RESET);
                }

                // Delimiters
                '(' | ')' | '[' | ']' => {
                    result.push_str("\x1b[1m"); // bold
                    result.push(c);
                    result.push_str(RESET);
                }

                // Fact terminator
                '.' => {
                    result.push_str("\x1b[33m"); // yellow
                    result.push(c);
                    result.push_str(RESET);
                }

                // Action keywords
                c if c.is_alphabetic() => {
                    let mut word = String::new();
                    word.push(c);
                    while let Some(next) =
                        chars.next_if(|n| !n.is_whitespace() && !"()[]^.;,".contains(*n))
                    {
                        word.push(next);
                    }
                    if word == rete_parser::ADD_KEYWORD {
                        result.push_str("\x1b[35m"); // magenta
                        result.push_str(&word);
                        result.push_str(RESET);
                    } else {
                        result.push_str(&word);
                    }
                }

                _ => result.push(c),
            }
        }

        Cow::Owned(result)
    }
}

impl Default for RuleHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
