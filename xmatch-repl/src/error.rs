use std::{fmt, io};
use xmatch::error::Error as MatchError;

/// Utility enum to package errors that can occur while processing a line of input.
#[derive(Debug)]
pub enum Error {
    /// The line is neither a command nor of the form `lhs => rhs`.
    MissingArrow,

    /// The line starts with `:`, but names no known command.
    UnknownCommand(String),

    /// A toggle command was given something other than `on` or `off`.
    InvalidToggle {
        command: &'static str,
        value: String,
    },

    /// The two expressions could not be matched.
    Match {
        lhs: String,
        rhs: String,
        err: MatchError,
    },
}

impl Error {
    /// Report this error to stderr. Match errors are rendered with their source code.
    pub fn report_to_stderr(&self) -> io::Result<()> {
        match self {
            Self::Match { lhs, rhs, err } => err.report_to_stderr(lhs, rhs),
            _ => {
                eprintln!("error: {}", self);
                Ok(())
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingArrow => write!(f, "expected two expressions separated by `=>`"),
            Self::UnknownCommand(name) => write!(f, "unknown command `:{}` (try `:help`)", name),
            Self::InvalidToggle { command, value } => {
                write!(f, "`:{}` takes `on` or `off`, not `{}`", command, value)
            },
            Self::Match { err, .. } => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}
