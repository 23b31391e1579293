mod error;
mod session;

use rustyline::{error::ReadlineError, DefaultEditor};
use session::{Outcome, Session, HELP};
use std::{fs::File, io::{self, BufReader, IsTerminal, Read}, process::ExitCode};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Processes one line and prints its outcome. Returns false if the line was in error.
fn process_line(input: &str, session: &mut Session) -> bool {
    match session.process(input) {
        Ok(Outcome::Matched(result)) => println!("{}", result),
        Ok(Outcome::Updated(settings)) => println!("{}", settings),
        Ok(Outcome::Help) => println!("{}", HELP),
        Ok(Outcome::Nothing) => (), // intentionally print nothing
        Err(err) => {
            if let Err(io_err) = err.report_to_stderr() {
                warn!("could not write report: {}", io_err);
            }
            return false;
        },
    }
    true
}

/// Processes every line of a file or of piped input. Every line is processed, even after an
/// error.
fn process_all(input: &str) -> ExitCode {
    let mut session = Session::new();
    let mut failed = 0;
    for (number, line) in input.lines().enumerate() {
        debug!(line = number + 1, "processing");
        if !process_line(line, &mut session) {
            failed += 1;
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        debug!(failed, "some lines were in error");
        ExitCode::FAILURE
    }
}

/// Reads the whole file, or stdin if `filename` is `None`.
fn read_input(filename: Option<String>) -> io::Result<String> {
    let mut input = String::new();
    match filename {
        Some(filename) => BufReader::new(File::open(filename)?).read_to_string(&mut input)?,
        None => io::stdin().read_to_string(&mut input)?,
    };
    Ok(input)
}

/// Runs the interactive mode until end of input.
fn repl() -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;
    let mut session = Session::new();
    println!("{} (type :help for help)", session.describe());

    loop {
        let input = match rl.readline("> ") {
            Ok(input) => input,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => return Ok(()),
            Err(err) => return Err(err),
        };
        if input.trim().is_empty() {
            continue;
        }

        rl.add_history_entry(&input)?;
        process_line(&input, &mut session);
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args();
    args.next();
    let filename = args.next();

    if filename.is_some() || !io::stdin().is_terminal() {
        // match every line of the source file or stdin
        match read_input(filename) {
            Ok(input) => process_all(&input),
            Err(err) => {
                eprintln!("error: {}", err);
                ExitCode::FAILURE
            },
        }
    } else {
        // run the repl / interactive mode
        match repl() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::FAILURE
            },
        }
    }
}
