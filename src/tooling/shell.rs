//! Line Shell
//!
//! Reads one command per line and runs it against a [`Store`]. Output is
//! either plain text (one result per line) or one JSON document per command.

use crate::error::{ApiError, StoreError};
use crate::store::Store;
use serde_json::json;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

pub const NOT_FOUND: &str = "not found";
pub const NO_DATA: &str = "no data";
pub const NO_MEMORY: &str = "No memory.";

pub const HELP_MESSAGE: &str = "help: Prints the available commands.\n\
quit: Ends the program.\n\
set: Adds or modifies the value to store.\n\
print: Prints all paths and values.\n\
find: Prints the stored value.\n\
list: Lists all immediate components of a sub-path.\n\
search: Searches the path given a value.\n\
delete: Deletes a path and all its sub-paths.";

/// How command results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Quit,
    Set { path: &'a str, value: &'a str },
    Print,
    Find { path: &'a str },
    List { path: &'a str },
    Search { value: &'a str },
    /// `None` deletes everything below the root
    Delete { path: Option<&'a str> },
    Unknown(&'a str),
}

/// Split off the first whitespace-delimited token
fn next_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], input[end..].trim_start()),
        None => (input, ""),
    }
}

/// Parse one line; `None` for a blank line
pub fn parse_command(line: &str) -> Option<Command<'_>> {
    let (name, rest) = next_token(line);
    if name.is_empty() {
        return None;
    }
    let command = match name {
        "help" => Command::Help,
        "quit" => Command::Quit,
        "print" => Command::Print,
        "set" => {
            let (path, value) = next_token(rest);
            Command::Set {
                path,
                value: value.trim_end(),
            }
        }
        "find" => Command::Find {
            path: next_token(rest).0,
        },
        "list" => Command::List {
            path: next_token(rest).0,
        },
        "search" => Command::Search {
            value: rest.trim_end(),
        },
        "delete" => {
            let path = next_token(rest).0;
            Command::Delete {
                path: (!path.is_empty()).then_some(path),
            }
        }
        other => Command::Unknown(other),
    };
    Some(command)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// What the session should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    OutOfMemory,
}

/// Interactive session over a store
pub struct Shell {
    store: Store,
    format: OutputFormat,
}

impl Shell {
    pub fn new(store: Store, format: OutputFormat) -> Self {
        Shell { store, format }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn into_store(self) -> Store {
        self.store
    }

    /// Run commands from `input` until `quit`, end of input, an unknown
    /// command, or an out-of-memory failure.
    ///
    /// Lines are raw bytes; invalid UTF-8 is replaced with U+FFFD so one bad
    /// line cannot end the session.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> Result<Outcome, ApiError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(Outcome::Quit);
            }
            let line = String::from_utf8_lossy(strip_line_ending(&buf));
            match self.execute(&line, out)? {
                Outcome::Continue => {}
                outcome => return Ok(outcome),
            }
        }
    }

    /// Execute a single line
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Outcome, ApiError> {
        let Some(command) = parse_command(line) else {
            return Ok(Outcome::Continue);
        };
        debug!(?command, "execute");
        match self.apply(command, out) {
            Err(ApiError::Store(StoreError::OutOfMemory(reason))) => {
                warn!(%reason, "aborting session");
                writeln!(out, "{}", NO_MEMORY)?;
                Ok(Outcome::OutOfMemory)
            }
            other => other,
        }
    }

    fn apply<W: Write>(&mut self, command: Command<'_>, out: &mut W) -> Result<Outcome, ApiError> {
        match command {
            Command::Help => writeln!(out, "{}", HELP_MESSAGE)?,
            Command::Quit => return Ok(Outcome::Quit),
            Command::Unknown(name) => {
                warn!(command = name, "unknown command");
                return Ok(Outcome::Quit);
            }
            Command::Set { path, value } => {
                self.store.set(path, value)?;
            }
            Command::Print => self.print(out)?,
            Command::Find { path } => self.find(path, out)?,
            Command::List { path } => self.list(path, out)?,
            Command::Search { value } => self.search(value, out)?,
            Command::Delete { path } => self.delete(path, out)?,
        }
        Ok(Outcome::Continue)
    }

    fn print<W: Write>(&self, out: &mut W) -> Result<(), ApiError> {
        match self.format {
            OutputFormat::Text => self.store.write_print(out)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &self.store.print())?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn find<W: Write>(&self, path: &str, out: &mut W) -> Result<(), ApiError> {
        let node = self.store.find(path);
        let value = node.and_then(|id| self.store.value(id));
        match self.format {
            OutputFormat::Text => match (node, value) {
                (None, _) => writeln!(out, "{}", NOT_FOUND)?,
                (Some(_), None) => writeln!(out, "{}", NO_DATA)?,
                (Some(_), Some(value)) => writeln!(out, "{}", value)?,
            },
            OutputFormat::Json => {
                let document = json!({
                    "path": path,
                    "found": node.is_some(),
                    "value": value,
                });
                writeln!(out, "{}", document)?;
            }
        }
        Ok(())
    }

    fn list<W: Write>(&self, path: &str, out: &mut W) -> Result<(), ApiError> {
        let children = self.store.list(path);
        match self.format {
            OutputFormat::Text => match children {
                None => writeln!(out, "{}", NOT_FOUND)?,
                Some(children) => {
                    for child in children {
                        writeln!(out, "{}", child)?;
                    }
                }
            },
            OutputFormat::Json => {
                let document = json!({
                    "path": path,
                    "found": children.is_some(),
                    "children": children.unwrap_or_default(),
                });
                writeln!(out, "{}", document)?;
            }
        }
        Ok(())
    }

    fn search<W: Write>(&self, value: &str, out: &mut W) -> Result<(), ApiError> {
        let path = self
            .store
            .search(value)
            .and_then(|id| self.store.path_of(id));
        match self.format {
            OutputFormat::Text => match path {
                None => writeln!(out, "{}", NOT_FOUND)?,
                Some(path) => writeln!(out, "{}", path)?,
            },
            OutputFormat::Json => {
                let document = json!({
                    "value": value,
                    "found": path.is_some(),
                    "path": path,
                });
                writeln!(out, "{}", document)?;
            }
        }
        Ok(())
    }

    fn delete<W: Write>(&mut self, path: Option<&str>, out: &mut W) -> Result<(), ApiError> {
        let result = match path {
            None => Ok(self.store.clear()),
            Some(path) => self.store.delete(path),
        };
        match (result, self.format) {
            (Ok(_), OutputFormat::Text) => {}
            (Ok(destroyed), OutputFormat::Json) => {
                writeln!(out, "{}", json!({ "deleted": destroyed }))?;
            }
            (Err(StoreError::NotFound(_)), OutputFormat::Text) => writeln!(out, "{}", NOT_FOUND)?,
            (Err(StoreError::NotFound(path)), OutputFormat::Json) => {
                writeln!(out, "{}", json!({ "path": path, "found": false }))?;
            }
            (Err(err), _) => return Err(err.into()),
        }
        Ok(())
    }
}
