//! Command scripts driving the wizard, one action per line.

use thiserror::Error;

use crate::screens::TransferKind;
use crate::wizard::{Action, ExportTarget};

/// Errors that can occur when parsing a script line
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("line {line}: unrecognized command '{command}'")]
    Unrecognized { line: usize, command: String },

    #[error("line {line}: {command} missing argument")]
    MissingArgument { line: usize, command: String },

    #[error("line {line}: unknown export target '{target}'")]
    UnknownExportTarget { line: usize, target: String },
}

/// Parse one line. Blank lines and `#` comments give `None`.
pub fn parse_line(line: usize, text: &str) -> Option<Result<Action, CommandError>> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return None;
    }
    let (command, rest) = match text.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (text, ""),
    };

    let required = |value: &str| {
        if value.is_empty() {
            Err(CommandError::MissingArgument {
                line,
                command: command.to_string(),
            })
        } else {
            Ok(value.to_string())
        }
    };

    let action = match command {
        "open" => required(rest).map(Action::Open),
        "inft" => Ok(Action::Choose(TransferKind::Inft)),
        "standard" => Ok(Action::Choose(TransferKind::Standard)),
        "select" => required(rest).map(Action::Select),
        "type" => Ok(Action::Type(rest.to_string())),
        "max" => Ok(Action::TransferAll),
        "next" => Ok(Action::Next),
        "remark" => Ok(Action::Remark(rest.to_string())),
        "confirm" => Ok(Action::Confirm),
        "back" => Ok(Action::Back),
        "retry" => Ok(Action::Retry),
        "again" => Ok(Action::TransferAgain),
        "home" => Ok(Action::Home),
        "export" => match rest {
            "receipt" => Ok(Action::Export(ExportTarget::Receipt)),
            "screen" => Ok(Action::Export(ExportTarget::Screen)),
            "" => required(rest).map(|_| Action::Export(ExportTarget::Screen)),
            other => Err(CommandError::UnknownExportTarget {
                line,
                target: other.to_string(),
            }),
        },
        other => Err(CommandError::Unrecognized {
            line,
            command: other.to_string(),
        }),
    };
    Some(action)
}

/// Parse a whole script, skipping blank and comment lines
pub fn parse_script(script: &str) -> impl Iterator<Item = Result<Action, CommandError>> + '_ {
    script
        .lines()
        .enumerate()
        .filter_map(|(idx, text)| parse_line(idx + 1, text))
}
