//! Command language for driving a session from scripts and the shell.
//!
//! One statement per line, whitespace-separated words, `#` starts a comment:
//!
//! ```text
//! # two processes fighting over two single-instance resources
//! process P1
//! process P2
//! resource R1 1
//! resource R2 1
//! request P1 R1 1
//! request P2 R2 1
//! request P1 R2      # amount defaults to 1
//! request P2 R1
//! detect
//! ```
//!
//! Parsing is pure: [`parse_script`] turns text into [`Statement`]s, and
//! [`Interpreter`](crate::interpreter::Interpreter) runs them.

use std::path::PathBuf;
use std::str::FromStr;

/// One parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `process NAME`
    Process(String),
    /// `resource NAME COUNT`
    Resource(String, u32),
    /// `request PROCESS RESOURCE [AMOUNT]`
    Request(String, String, u32),
    /// `release PROCESS RESOURCE [AMOUNT]`
    Release(String, String, u32),
    /// `cancel PROCESS RESOURCE`
    Cancel(String, String),
    /// `capacity RESOURCE COUNT`
    Capacity(String, u32),
    /// `rename OLD NEW`
    Rename(String, String),
    /// `remove NAME`
    Remove(String),
    /// `move NAME X Y`
    Move(String, f64, f64),
    /// `layout`
    Layout,
    /// `clear`
    Clear,
    /// `undo`
    Undo,
    /// `redo`
    Redo,
    /// `detect`
    Detect,
    /// `show`
    Show,
    /// `history`
    History,
    /// `save PATH`
    Save(PathBuf),
    /// `load PATH`
    Load(PathBuf),
    /// `help`
    Help,
}

/// Usage lines for every statement, shown by `help`.
pub const USAGE: &[&str] = &[
    "process NAME",
    "resource NAME COUNT",
    "request PROCESS RESOURCE [AMOUNT]",
    "release PROCESS RESOURCE [AMOUNT]",
    "cancel PROCESS RESOURCE",
    "capacity RESOURCE COUNT",
    "rename OLD NEW",
    "remove NAME",
    "move NAME X Y",
    "layout",
    "clear",
    "undo",
    "redo",
    "detect",
    "show",
    "history",
    "save PATH",
    "load PATH",
    "help",
];

/// Errors from script parsing. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    /// The first word is not a known command.
    #[error("line {line}: unknown command '{name}' (try 'help')")]
    UnknownCommand {
        /// Line number.
        line: usize,
        /// The unrecognized word.
        name: String,
    },
    /// Wrong number of arguments.
    #[error("line {line}: usage: {usage}")]
    Usage {
        /// Line number.
        line: usize,
        /// Expected form.
        usage: &'static str,
    },
    /// An argument that should be a number is not one.
    #[error("line {line}: invalid number '{value}'")]
    InvalidNumber {
        /// Line number.
        line: usize,
        /// The offending text.
        value: String,
    },
}

/// Parses one line. Blank and comment-only lines yield `None`.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Statement>, ScriptError> {
    let text = text.split_once('#').map_or(text, |(code, _)| code);
    let words: Vec<&str> = text.split_whitespace().collect();
    let Some((&command, args)) = words.split_first() else {
        return Ok(None);
    };

    let usage = |form: &'static str| ScriptError::Usage { line, usage: form };
    let number = |s: &str| parse_number::<u32>(line, s);

    let statement = match (command.to_ascii_lowercase().as_str(), args) {
        ("process", [name]) => Statement::Process((*name).to_string()),
        ("process", _) => return Err(usage("process NAME")),

        ("resource", [name, count]) => Statement::Resource((*name).to_string(), number(*count)?),
        ("resource", _) => return Err(usage("resource NAME COUNT")),

        ("request", [p, r]) => Statement::Request((*p).to_string(), (*r).to_string(), 1),
        ("request", [p, r, n]) => {
            Statement::Request((*p).to_string(), (*r).to_string(), number(*n)?)
        }
        ("request", _) => return Err(usage("request PROCESS RESOURCE [AMOUNT]")),

        ("release", [p, r]) => Statement::Release((*p).to_string(), (*r).to_string(), 1),
        ("release", [p, r, n]) => {
            Statement::Release((*p).to_string(), (*r).to_string(), number(*n)?)
        }
        ("release", _) => return Err(usage("release PROCESS RESOURCE [AMOUNT]")),

        ("cancel", [p, r]) => Statement::Cancel((*p).to_string(), (*r).to_string()),
        ("cancel", _) => return Err(usage("cancel PROCESS RESOURCE")),

        ("capacity", [r, n]) => Statement::Capacity((*r).to_string(), number(*n)?),
        ("capacity", _) => return Err(usage("capacity RESOURCE COUNT")),

        ("rename", [old, new]) => Statement::Rename((*old).to_string(), (*new).to_string()),
        ("rename", _) => return Err(usage("rename OLD NEW")),

        ("remove", [name]) => Statement::Remove((*name).to_string()),
        ("remove", _) => return Err(usage("remove NAME")),

        ("move", [name, x, y]) => Statement::Move(
            (*name).to_string(),
            parse_coordinate(line, *x)?,
            parse_coordinate(line, *y)?,
        ),
        ("move", _) => return Err(usage("move NAME X Y")),

        ("save", [path]) => Statement::Save(PathBuf::from(*path)),
        ("save", _) => return Err(usage("save PATH")),
        ("load", [path]) => Statement::Load(PathBuf::from(*path)),
        ("load", _) => return Err(usage("load PATH")),

        ("layout", []) => Statement::Layout,
        ("clear", []) => Statement::Clear,
        ("undo", []) => Statement::Undo,
        ("redo", []) => Statement::Redo,
        ("detect", []) => Statement::Detect,
        ("show", []) => Statement::Show,
        ("history", []) => Statement::History,
        ("help", []) => Statement::Help,
        (
            name @ ("layout" | "clear" | "undo" | "redo" | "detect" | "show" | "history" | "help"),
            _,
        ) => {
            return Err(ScriptError::Usage {
                line,
                usage: USAGE.iter().find(|u| **u == name).copied().unwrap_or("help"),
            });
        }

        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                name: command.to_string(),
            });
        }
    };
    Ok(Some(statement))
}

/// Parses a whole script, keeping each statement's line number.
///
/// Stops at the first malformed line.
pub fn parse_script(text: &str) -> Result<Vec<(usize, Statement)>, ScriptError> {
    let mut statements = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(statement) = parse_line(index + 1, line)? {
            statements.push((index + 1, statement));
        }
    }
    Ok(statements)
}

fn parse_number<T: FromStr>(line: usize, s: &str) -> Result<T, ScriptError> {
    s.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: s.to_string(),
    })
}

/// Like [`parse_number`], but `NaN` and infinities are rejected.
fn parse_coordinate(line: usize, s: &str) -> Result<f64, ScriptError> {
    let value: f64 = parse_number(line, s)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScriptError::InvalidNumber {
            line,
            value: s.to_string(),
        })
    }
}
