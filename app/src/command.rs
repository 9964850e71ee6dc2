//! Parsing of the lines typed into the session.

use thiserror::Error;
use todo_core::TodoId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit the draft. `Some` replaces the draft first; `None` resubmits
    /// whatever was left after a failed add.
    Add(Option<String>),
    /// Set `completed`, or flip the cached flag when `None`.
    Toggle { id: TodoId, completed: Option<bool> },
    Delete(TodoId),
    Theme,
    Refresh,
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, try \"help\"")]
    Unknown(String),
    #[error("{0} needs a todo id")]
    MissingId(&'static str),
    #[error("{0:?} is not a todo id")]
    BadId(String),
    #[error("{0:?} is not a completion state (use true/false)")]
    BadState(String),
}

pub const HELP: &str = "\
commands:
  add [title]              add a todo (without a title, retry the last one)
  toggle <id> [true|false] flip or set the completed flag
  delete <id>              delete a todo
  theme                    switch between light and dark
  refresh                  re-fetch the list
  list                     show the list
  help                     show this help
  quit                     leave";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "add" => Ok(Command::Add((!rest.is_empty()).then(|| rest.to_string()))),
            "toggle" => {
                let mut args = rest.split_whitespace();
                let id = parse_id("toggle", args.next())?;
                let completed = args.next().map(parse_state).transpose()?;
                Ok(Command::Toggle { id, completed })
            }
            "delete" | "rm" => Ok(Command::Delete(parse_id("delete", rest.split_whitespace().next())?)),
            "theme" => Ok(Command::Theme),
            "refresh" => Ok(Command::Refresh),
            "" | "list" | "ls" => Ok(Command::List),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

fn parse_id(command: &'static str, raw: Option<&str>) -> Result<TodoId, CommandError> {
    let raw = raw.ok_or(CommandError::MissingId(command))?;
    raw.parse().map_err(|_| CommandError::BadId(raw.to_string()))
}

fn parse_state(raw: &str) -> Result<bool, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "done" | "yes" => Ok(true),
        "false" | "undone" | "no" => Ok(false),
        _ => Err(CommandError::BadState(raw.to_string())),
    }
}
