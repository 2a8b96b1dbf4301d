//! Session command parsing
//!
//! One command per input line. Ids may be separated by spaces or commas.
//!
//! ```text
//! n | next            p | prev            g N | goto N
//! s IDS | select IDS  u IDS | unselect IDS  only IDS
//! all                 none                first N
//! ls | show           status              h | help          q | quit
//! ```

use super::error::SessionError;
use crate::source::RecordId;

/// A parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Next,
    Prev,
    Goto(u32),
    /// Check these rows in addition to the ones already checked
    Select(Vec<RecordId>),
    /// Uncheck these rows
    Unselect(Vec<RecordId>),
    /// Check exactly these rows on the visible page
    Only(Vec<RecordId>),
    /// Check every visible row
    All,
    /// Uncheck every visible row
    Clear,
    /// Bulk-select the first N records of the collection
    First(u64),
    Show,
    Status,
    Help,
    Quit,
}

/// Help text shown for `help`, as (command, description) pairs
pub const HELP: &[(&str, &str)] = &[
    ("n, next", "Go to the next page"),
    ("p, prev", "Go to the previous page"),
    ("g, goto N", "Go to page N"),
    ("s, select IDS", "Check rows on this page"),
    ("u, unselect IDS", "Uncheck rows on this page"),
    ("only IDS", "Check exactly these rows on this page"),
    ("all", "Check every row on this page"),
    ("none", "Uncheck every row on this page"),
    ("first N", "Select the first N records of the collection"),
    ("ls, show", "Redraw the current page"),
    ("status", "Show selection counts"),
    ("h, help", "Show this help"),
    ("q, quit", "Print the selected ids and exit"),
];

impl SessionCommand {
    /// Parse one input line
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownCommand` for an unrecognised verb and
    /// `SessionError::InvalidArgument` for missing or malformed arguments.
    pub fn parse(line: &str) -> Result<Self, SessionError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Show);
        };
        let rest: Vec<&str> = words.collect();

        let command = match verb.to_lowercase().as_str() {
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Prev,
            "g" | "goto" | "page" => Self::Goto(parse_single(verb, &rest)?),
            "s" | "select" => Self::Select(parse_ids(verb, &rest)?),
            "u" | "unselect" | "deselect" => Self::Unselect(parse_ids(verb, &rest)?),
            "only" => Self::Only(parse_ids(verb, &rest)?),
            "all" => Self::All,
            "none" | "clear" => Self::Clear,
            "first" => Self::First(parse_single(verb, &rest)?),
            "ls" | "show" => Self::Show,
            "status" => Self::Status,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => return Err(SessionError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

/// Exactly one positive number
fn parse_single<T>(verb: &str, args: &[&str]) -> Result<T, SessionError>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
{
    let [arg] = args else {
        return Err(SessionError::InvalidArgument(format!(
            "'{verb}' takes exactly one number"
        )));
    };
    match arg.parse::<T>() {
        Ok(value) if value >= T::from(1) => Ok(value),
        _ => Err(SessionError::InvalidArgument(format!(
            "'{arg}' is not a positive number"
        ))),
    }
}

/// One or more ids, separated by whitespace and/or commas
fn parse_ids(verb: &str, args: &[&str]) -> Result<Vec<RecordId>, SessionError> {
    let ids = args
        .iter()
        .flat_map(|arg| arg.split(','))
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<RecordId>()
                .map_err(|_| SessionError::InvalidArgument(format!("'{s}' is not a record id")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(SessionError::InvalidArgument(format!(
            "'{verb}' needs at least one record id"
        )));
    }
    Ok(ids)
}
