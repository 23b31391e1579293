//! Line-oriented front end to the matcher.
//!
//! Every line of input is one of:
//!
//! - `lhs => rhs`: match the two expressions in the current mode,
//! - `:deep` / `:shallow`: switch the matching mode,
//! - `:power on|off`: treat powers as atomic symbols or not,
//! - `:literals on|off`: elide pairs of equal numbers or not,
//! - `:help`: print a summary of the above,
//! - blank, or a comment starting with `#`: ignored.

use crate::error::Error;
use tracing::debug;
use xmatch::{match_with, MatchMode, MatchOptions, MatchResult};

/// Summary of the accepted input, printed by `:help`.
pub const HELP: &str = "\
lhs => rhs        match two expressions in the current mode
:deep             align the expressions down to names and numbers
:shallow          align only the operands of the root operators
:power on|off     treat powers as single symbols
:literals on|off  hide pairs of equal numbers when something else differs
:help             show this message
# ...             comment";

/// What processing a line produced.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The two expressions were matched.
    Matched(MatchResult),

    /// A setting was changed. Holds a description of the new setting.
    Updated(String),

    /// The user asked for help.
    Help,

    /// The line was blank or a comment.
    Nothing,
}

/// Settings that persist across lines.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub mode: MatchMode,
    pub options: MatchOptions,
}

impl Session {
    /// Creates a session that deep-matches with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a single line of input.
    pub fn process(&mut self, line: &str) -> Result<Outcome, Error> {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            return Ok(Outcome::Nothing);
        }

        if let Some(command) = line.strip_prefix(':') {
            return self.command(command);
        }

        let (lhs, rhs) = line.split_once("=>").ok_or(Error::MissingArrow)?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());
        debug!(mode = %self.mode, options = ?self.options, lhs, rhs, "matching");

        match match_with(self.mode, lhs, rhs, &self.options) {
            Ok(result) => {
                debug!(pairs = result.len(), "matched");
                Ok(Outcome::Matched(result))
            },
            Err(err) => Err(Error::Match { lhs: lhs.to_owned(), rhs: rhs.to_owned(), err }),
        }
    }

    /// Runs a command, given without its leading `:`.
    fn command(&mut self, command: &str) -> Result<Outcome, Error> {
        let mut words = command.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();

        match name {
            "deep" => self.mode = MatchMode::Deep,
            "shallow" => self.mode = MatchMode::Shallow,
            "power" => self.options.power_as_atomic = toggle("power", arg)?,
            "literals" => self.options.elide_equal_literals = toggle("literals", arg)?,
            "help" => return Ok(Outcome::Help),
            _ => return Err(Error::UnknownCommand(name.to_owned())),
        }

        debug!(mode = %self.mode, options = ?self.options, "settings changed");
        Ok(Outcome::Updated(self.describe()))
    }

    /// Describes the current settings.
    pub fn describe(&self) -> String {
        format!(
            "mode: {}, atomic powers: {}, equal literals: {}",
            self.mode,
            on_off(self.options.power_as_atomic),
            if self.options.elide_equal_literals { "hidden" } else { "shown" },
        )
    }
}

/// Removes a trailing `#` comment.
fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(code, _)| code)
}

/// Parses the argument of a toggle command.
fn toggle(command: &'static str, arg: Option<&str>) -> Result<bool, Error> {
    match arg {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        other => Err(Error::InvalidToggle {
            command,
            value: other.unwrap_or_default().to_owned(),
        }),
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
