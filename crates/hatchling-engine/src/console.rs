//! Line-oriented owner console.
//!
//! Reads one command per line from stdin and forwards it to the scheduler:
//!
//! | Line | Effect |
//! |------|--------|
//! | `feed [n]` | feed `n` food (default 10) |
//! | `pet` | pet |
//! | `clean` | clean |
//! | `name <text>` | name the pup and acknowledge hatching |
//! | `advance` | acknowledge a stage boundary |
//! | `pause` | toggle pause |
//! | `reset` | start over with a new egg |
//! | `tick` | force one tick |
//! | `status` | print the pet |
//! | `help` | print this table |
//! | `quit` | save and exit |
//!
//! Results of applied commands are printed by the renderer, not here.

use std::io::{BufRead, Write};

use hatchling_core::{Request, SchedulerError, SchedulerHandle};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::render;

/// Food given by a bare `feed`.
pub const DEFAULT_FEED_AMOUNT: i32 = 10;

/// Usage text printed by `help` and after an unknown command.
pub const USAGE: &str = "commands: feed [n] | pet | clean | name <text> | advance | pause | reset | tick | status | help | quit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Forward a request to the scheduler.
    Apply(Request),
    /// Print the current pet.
    Status,
    /// Print usage.
    Help,
    /// Stop the scheduler and exit.
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first word is not a command.
    #[error("unknown command `{0}`")]
    Unknown(String),
    /// `feed` was given something other than a positive whole number.
    #[error("`{0}` is not a positive whole amount of food")]
    BadAmount(String),
    /// `name` was given no text.
    #[error("`name` needs a name")]
    MissingName,
}

/// Parse one console line. Blank lines yield `None`.
pub fn parse(line: &str) -> Option<Result<ConsoleCommand, ParseError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "feed" => parse_amount(rest).map(|amount| ConsoleCommand::Apply(Request::Feed { amount })),
        "pet" => Ok(ConsoleCommand::Apply(Request::Pet)),
        "clean" => Ok(ConsoleCommand::Apply(Request::Clean)),
        "name" if rest.is_empty() => Err(ParseError::MissingName),
        "name" => Ok(ConsoleCommand::Apply(Request::NameAndAdvance(rest.to_owned()))),
        "advance" => Ok(ConsoleCommand::Apply(Request::Advance)),
        "pause" => Ok(ConsoleCommand::Apply(Request::TogglePause)),
        "reset" => Ok(ConsoleCommand::Apply(Request::Reset)),
        "tick" => Ok(ConsoleCommand::Apply(Request::Tick)),
        "status" => Ok(ConsoleCommand::Status),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        _ => Err(ParseError::Unknown(word.to_owned())),
    };
    Some(command)
}

fn parse_amount(text: &str) -> Result<i32, ParseError> {
    if text.is_empty() {
        return Ok(DEFAULT_FEED_AMOUNT);
    }
    match text.parse::<i32>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(ParseError::BadAmount(text.to_owned())),
    }
}

/// Depth of the stdin line channel.
const LINE_BUFFER: usize = 16;

/// Read stdin on a dedicated thread and forward each line.
///
/// The channel closes at end of input. The thread is detached so a pending
/// read never holds up process exit.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                warn!("Stopped reading stdin after an I/O error");
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Apply console lines until `quit` or the end of input, then ask the
/// scheduler to stop.
///
/// # Errors
///
/// Returns an I/O error if writing to `out` fails. A scheduler that stopped
/// on its own ends the loop quietly.
pub async fn run<W: Write>(
    handle: SchedulerHandle,
    mut lines: mpsc::Receiver<String>,
    mut out: W,
) -> Result<(), std::io::Error> {
    while let Some(line) = lines.recv().await {
        let Some(parsed) = parse(&line) else {
            continue;
        };
        let command = match parsed {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}\n{USAGE}")?;
                continue;
            }
        };

        let result = match command {
            ConsoleCommand::Apply(request) => handle.apply(request).await.map(drop),
            ConsoleCommand::Status => match handle.snapshot().await {
                Ok(snapshot) => {
                    writeln!(out, "{}", render::status(&snapshot))?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            ConsoleCommand::Help => {
                writeln!(out, "{USAGE}")?;
                Ok(())
            }
            ConsoleCommand::Quit => break,
        };

        match result {
            Ok(()) => {}
            Err(SchedulerError::Closed) => return Ok(()),
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }

    debug!("Console finished, stopping the scheduler");
    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hatchling_core::{HatchlingConfig, ManualClock, NoOpObserver, Scheduler, Session};
    use hatchling_store::MemoryStore;

    use super::*;

    fn parsed(line: &str) -> Result<ConsoleCommand, ParseError> {
        parse(line).unwrap()
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   \t"), None);
    }

    #[test]
    fn feed_amount_defaults_and_parses() {
        assert_eq!(
            parsed("feed"),
            Ok(ConsoleCommand::Apply(Request::Feed {
                amount: DEFAULT_FEED_AMOUNT
            }))
        );
        assert_eq!(
            parsed("FEED 25"),
            Ok(ConsoleCommand::Apply(Request::Feed { amount: 25 }))
        );
        assert_eq!(
            parsed("feed lots"),
            Err(ParseError::BadAmount("lots".to_owned()))
        );
        assert_eq!(
            parsed("feed -50"),
            Err(ParseError::BadAmount("-50".to_owned()))
        );
        assert_eq!(parsed("feed 0"), Err(ParseError::BadAmount("0".to_owned())));
    }

    #[test]
    fn name_keeps_inner_spaces() {
        assert_eq!(
            parsed("name  Sir Rex "),
            Ok(ConsoleCommand::Apply(Request::NameAndAdvance(
                "Sir Rex".to_owned()
            )))
        );
        assert_eq!(parsed("name"), Err(ParseError::MissingName));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parsed("pet"), Ok(ConsoleCommand::Apply(Request::Pet)));
        assert_eq!(parsed("clean"), Ok(ConsoleCommand::Apply(Request::Clean)));
        assert_eq!(parsed("advance"), Ok(ConsoleCommand::Apply(Request::Advance)));
        assert_eq!(parsed("pause"), Ok(ConsoleCommand::Apply(Request::TogglePause)));
        assert_eq!(parsed("reset"), Ok(ConsoleCommand::Apply(Request::Reset)));
        assert_eq!(parsed("tick"), Ok(ConsoleCommand::Apply(Request::Tick)));
        assert_eq!(parsed("status"), Ok(ConsoleCommand::Status));
        assert_eq!(parsed("?"), Ok(ConsoleCommand::Help));
        assert_eq!(parsed("exit"), Ok(ConsoleCommand::Quit));
        assert_eq!(parsed("dance"), Err(ParseError::Unknown("dance".to_owned())));
    }

    #[tokio::test]
    async fn run_applies_lines_until_quit() {
        let (session, _) = Session::open(
            &HatchlingConfig::default(),
            Box::new(MemoryStore::new()),
            Box::new(ManualClock::new(1_000)),
        )
        .unwrap();
        let (scheduler, handle) = Scheduler::new(session, Box::new(NoOpObserver)).unwrap();
        let task = tokio::spawn(scheduler.run());

        let (tx, rx) = mpsc::channel(8);
        for line in ["pet", "", "feed x", "status", "quit", "pet"] {
            tx.send(line.to_owned()).await.unwrap();
        }
        let mut out = Vec::new();
        run(handle, rx, &mut out).await.unwrap();

        let (summary, session) = task.await.unwrap().unwrap();
        assert_eq!(summary.commands, 1);
        assert_eq!(session.pet_state().behavior(), 1);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("`x` is not a positive whole amount of food\n"));
        assert!(text.contains("Your pet the "));
        assert!(text.contains("behavior 1"));
    }
}
