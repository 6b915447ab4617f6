//! Line-oriented operator input for manual mode.

use std::io::{self, BufRead, Write};
use std::sync::{Mutex, PoisonError};

use photo_triage_core::domain::Disposition;
use photo_triage_core::ports::Confirmation;
use tracing::debug;

/// One operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Tag the current image and move on.
    Tag(Disposition),
    /// Next image.
    Next,
    /// Previous image.
    Previous,
    /// Print tagging progress.
    Status,
    /// Copy files now if every image is tagged.
    Finish,
    /// Leave without copying.
    Quit,
    /// Print the key list.
    Help,
}

impl Command {
    /// Parses one input line. Case and surrounding whitespace are ignored.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "k" | "keep" => Some(Self::Tag(Disposition::Keep)),
            "d" | "discard" => Some(Self::Tag(Disposition::Discard)),
            "m" | "maybe" => Some(Self::Tag(Disposition::Maybe)),
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "s" | "status" => Some(Self::Status),
            "f" | "finish" => Some(Self::Finish),
            "q" | "quit" => Some(Self::Quit),
            "?" | "h" | "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Key list shown by `?`.
pub const HELP: &str = "k keep, d discard, m maybe, n next, p previous, s status, f finish, q quit";

/// Reads commands and yes/no answers from a line reader, writing prompts
/// to stderr.
pub struct LinePrompt<R> {
    input: Mutex<R>,
}

impl LinePrompt<io::StdinLock<'static>> {
    /// Prompt bound to standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> LinePrompt<R> {
    /// Wraps `input`.
    #[must_use]
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }

    /// Reads one line, or `None` at end of input.
    fn read_line(&self) -> Option<String> {
        let mut input = self.input.lock().unwrap_or_else(PoisonError::into_inner);
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(e) => {
                debug!("Input read failed: {e}");
                None
            }
        }
    }

    /// Reads until a valid command is entered. End of input counts as quit.
    pub fn read_command(&self) -> Command {
        loop {
            prompt("> ");
            let Some(line) = self.read_line() else {
                return Command::Quit;
            };
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Some(command) => return command,
                None => eprintln!("Unknown command '{}' ({HELP})", line.trim()),
            }
        }
    }
}

impl<R: BufRead> Confirmation for LinePrompt<R> {
    fn confirm(&self, question: &str) -> bool {
        loop {
            prompt(&format!("{question} [y/n] "));
            let Some(line) = self.read_line() else {
                return false;
            };
            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => eprintln!("Please answer y or n"),
            }
        }
    }
}

fn prompt(text: &str) {
    let mut stderr = io::stderr();
    let _ = write!(stderr, "{text}");
    let _ = stderr.flush();
}
