//! The main REPL implementation.

use std::fmt::Write as _;
use std::io::{self, Write};

use rete_foundation::{Error, ErrorKind, Result};

use crate::editor::{COMMANDS, LineEditor, ReadResult, RustylineEditor, bracket_depth};
use crate::session::Session;

const HELP: &str = "\
Enter facts and rules; they take effect immediately.

  B1 on B2.                                   assert a fact
  [ ($x ^on $y) ^ ($y ^on $z) => ($x ^above $z) ]
                                              register a rule

Commands:
  :help            show this message
  :facts           list working memory
  :rules           list registered rules with their numbers
  :matches N       list current matches of rule N
  :stats           show network counters
  :load PATH       evaluate a file
  :quit            exit";

/// What the REPL should do after evaluating one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text.
    Text(String),
    /// Print nothing.
    Nothing,
    /// Leave the loop.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Facts, rules, and the network.
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for multi-line input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            session: Session::new(),
            show_banner: true,
            prompt: "rete> ".to_string(),
            continuation_prompt: "  ... ".to_string(),
        }
    }

    /// Sets the session for this REPL.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs the REPL loop until `:quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }
        self.refresh_keywords();

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => self.print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };

        if input.trim().is_empty() {
            return Ok(true);
        }

        self.editor.add_history(&input);

        match self.eval(&input) {
            Ok(Reply::Text(text)) => println!("{text}"),
            Ok(Reply::Nothing) => {}
            Ok(Reply::Quit) => return Ok(false),
            Err(e) => self.print_error(&e),
        }

        Ok(true)
    }

    /// Reads a potentially multi-line input.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let read = if first_line {
                self.editor.read_line(&self.prompt)?
            } else {
                self.editor.read_continuation(&self.continuation_prompt)?
            };

            match read {
                ReadResult::Line(line) => {
                    if !first_line {
                        input.push('\n');
                    }
                    input.push_str(&line);

                    if Self::is_complete(&input) {
                        return Ok(Some(input));
                    }
                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::new(ErrorKind::Internal(
                        "unexpected EOF in multi-line input".to_string(),
                    )));
                }
            }
        }
    }

    /// Checks if input is complete (no open brackets).
    fn is_complete(input: &str) -> bool {
        input.trim_start().starts_with(':') || bracket_depth(input) <= 0
    }

    /// Evaluates a command or a block of statements.
    ///
    /// # Errors
    ///
    /// Returns parse, rule, chaining, and I/O errors, and an error for
    /// unknown commands.
    pub fn eval(&mut self, input: &str) -> Result<Reply> {
        let trimmed = input.trim();
        if let Some(command) = trimmed.strip_prefix(':') {
            return self.command(command);
        }

        let summary = self.session.eval(input)?;
        if summary.is_empty() {
            return Ok(Reply::Nothing);
        }
        self.refresh_keywords();
        Ok(Reply::Text(summary.to_string()))
    }

    fn command(&mut self, command: &str) -> Result<Reply> {
        let (name, argument) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, rest)| (name, rest.trim()));

        match name {
            "help" | "h" | "?" => Ok(Reply::Text(HELP.to_string())),
            "quit" | "q" | "exit" => Ok(Reply::Quit),
            "facts" => Ok(Reply::Text(self.list_facts())),
            "rules" => Ok(Reply::Text(self.list_rules())),
            "matches" => {
                let number = argument.parse::<usize>().map_err(|_| {
                    Error::new(ErrorKind::Internal(format!(
                        ":matches expects a rule number, got '{argument}'"
                    )))
                })?;
                self.list_matches(number).map(Reply::Text)
            }
            "stats" => Ok(Reply::Text(format!(
                "{}, derived: {}",
                self.session.stats(),
                self.session.derived()
            ))),
            "load" => {
                if argument.is_empty() {
                    return Err(Error::new(ErrorKind::Internal(
                        ":load expects a path".to_string(),
                    )));
                }
                let summary = self.session.load_file(argument)?;
                self.refresh_keywords();
                Ok(Reply::Text(format!("loaded {argument}: {summary}")))
            }
            _ => Err(Error::new(ErrorKind::Internal(format!(
                "unknown command ':{name}', try :help"
            )))),
        }
    }

    fn list_facts(&self) -> String {
        let mut out = String::new();
        let mut count = 0;
        for fact in self.session.facts() {
            let _ = writeln!(out, "{fact}");
            count += 1;
        }
        let _ = write!(out, "{count} fact{}", if count == 1 { "" } else { "s" });
        out
    }

    fn list_rules(&self) -> String {
        if self.session.rules().is_empty() {
            return "no rules".to_string();
        }
        let mut out = String::new();
        for (i, (production, rule)) in self.session.rules().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{}. {rule}  ({production})", i + 1);
        }
        out
    }

    fn list_matches(&self, number: usize) -> Result<String> {
        let tokens = self.session.matches(number)?;
        if tokens.is_empty() {
            return Ok("no matches".to_string());
        }
        let mut out = String::new();
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{}", token.bindings());
        }
        Ok(out)
    }

    /// Offers commands plus every attribute seen so far for completion.
    fn refresh_keywords(&mut self) {
        let mut keywords: Vec<String> = COMMANDS.iter().map(|&c| c.to_string()).collect();
        keywords.extend(self.session.attributes());
        self.editor.set_keywords(keywords);
    }

    /// Prints an error, with the file it came from when known.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
        if let Some(source) = error.context.as_ref().and_then(|c| c.source.as_ref()) {
            eprintln!("\x1b[2m  in {source}\x1b[0m");
        }
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mrete\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!("Enter facts and rules. Type :help for commands, Ctrl+D to exit.\n");
        let _ = io::stdout().flush();
    }
}
