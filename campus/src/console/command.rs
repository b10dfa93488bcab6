//! Console command parsing.

use chrono::NaiveDate;
use tabula::TableEvent;
use thiserror::Error;

use crate::models::Id;
use crate::screens::{ScreenKind, UnknownScreen};
use crate::session::{Role, UnknownRole};

pub const HELP: &str = "\
Navigation
  screen <schools|degrees|subjects|staff|dependencies>
  role <public|staff|admin>      reload      help      quit
Table
  sort <column>                  select <id> | select page
  page <n> | next | prev         size <rows per page>
  search [text]                  (no text clears the search)
Filters
  filter [key]                   pick a filter to edit (no key closes the editor)
  type [text]                    draft for text and number filters
  range <min|-> <max|->          draft for range filters
  apply | discard                commit or clear the draft
  option [value]                 select filters (no value removes the filter)
  date [YYYY-MM-DD]              date filters (no date removes the filter)
  remove <key> | clear           drop one or every active filter
  forget                         drop the saved filters of every screen
Records
  new | edit | delete            open a form for the selection
  set <field> <value>            fill a form field
  submit | cancel";

/// One line of console input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Reload,
    /// Forget every screen's saved filters.
    Forget,
    Screen(ScreenKind),
    Role(Role),
    /// Anything the table handles itself.
    Table(TableEvent<Id>),
    Set {
        field: String,
        value: String,
    },
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("type a command, or 'help'")]
    Empty,

    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    Missing {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a number")]
    Number(String),

    #[error("'{0}' is not a date (YYYY-MM-DD)")]
    Date(String),

    #[error(transparent)]
    Role(#[from] UnknownRole),

    #[error(transparent)]
    Screen(#[from] UnknownScreen),
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::Missing { command, argument })
    } else {
        Ok(rest)
    }
}

fn number<T: std::str::FromStr>(raw: &str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::Number(raw.to_string()))
}

/// A range bound; `-` leaves the bound open.
fn bound(raw: Option<&str>) -> Result<Option<f64>, ParseError> {
    match raw {
        None | Some("-") => Ok(None),
        Some(raw) => number(raw).map(Some),
    }
}

/// Parse one input line.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let table = |event: TableEvent<Id>| -> Result<Command, ParseError> {
        Ok(Command::Table(event))
    };

    match word.to_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "reload" => Ok(Command::Reload),
        "forget" => Ok(Command::Forget),
        "screen" => Ok(Command::Screen(
            required(rest, "screen", "a screen name")?.parse()?,
        )),
        "role" => Ok(Command::Role(required(rest, "role", "a role")?.parse()?)),

        "sort" => table(TableEvent::ToggleSort(
            required(rest, "sort", "a column")?.to_string(),
        )),
        "select" => match required(rest, "select", "a record id or 'page'")? {
            "page" => table(TableEvent::TogglePageSelection),
            id => table(TableEvent::ToggleRow(number(id)?)),
        },
        "page" => {
            let page: usize = number(required(rest, "page", "a page number")?)?;
            // Pages are numbered from 1 on screen
            match page.checked_sub(1) {
                Some(index) => table(TableEvent::GotoPage(index)),
                None => Err(ParseError::Number(rest.to_string())),
            }
        }
        "next" => table(TableEvent::NextPage),
        "prev" | "previous" => table(TableEvent::PreviousPage),
        "size" => table(TableEvent::SetPageSize(number(required(
            rest,
            "size",
            "a page size",
        )?)?)),
        "search" if rest.is_empty() => table(TableEvent::ClearSearch),
        "search" => table(TableEvent::SearchInput(rest.to_string())),

        "filter" => match rest {
            "" | "none" => table(TableEvent::PickFilter(None)),
            key => table(TableEvent::PickFilter(Some(key.to_string()))),
        },
        "type" => table(TableEvent::DraftText(rest.to_string())),
        "range" => {
            let mut bounds = rest.split_whitespace();
            let min = bound(bounds.next())?;
            let max = bound(bounds.next())?;
            table(TableEvent::DraftRange { min, max })
        }
        "apply" => table(TableEvent::ApplyDraft),
        "discard" => table(TableEvent::ClearDraft),
        "option" => table(TableEvent::PickOption(rest.to_string())),
        "date" if rest.is_empty() => table(TableEvent::PickDate(None)),
        "date" => match NaiveDate::parse_from_str(rest, "%Y-%m-%d") {
            Ok(date) => table(TableEvent::PickDate(Some(date))),
            Err(_) => Err(ParseError::Date(rest.to_string())),
        },
        "remove" => table(TableEvent::RemoveFilter(
            required(rest, "remove", "a filter key")?.to_string(),
        )),
        "clear" => table(TableEvent::ClearAllFilters),

        "new" => table(TableEvent::OpenCreate),
        "edit" => table(TableEvent::OpenEdit),
        "delete" => table(TableEvent::OpenDelete),
        "cancel" => table(TableEvent::CloseModal),
        "set" => {
            let rest = required(rest, "set", "a field and a value")?;
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Ok(Command::Set {
                field: field.to_string(),
                value: value.trim().to_string(),
            })
        }
        "submit" | "save" => Ok(Command::Submit),

        other => Err(ParseError::Unknown(other.to_string())),
    }
}
