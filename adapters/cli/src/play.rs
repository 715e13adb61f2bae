//! Scripted and interactive play loop.

use std::io::Write;

use anyhow::{bail, Context, Result};
use blockslide_core::{Command, Direction, Event, SessionState};
use blockslide_session::{apply, query, Session};
use tracing::debug;

use crate::text;

/// Player instruction parsed from a script entry or an input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerCommand {
    /// Slide the selected block.
    Move(Direction),
    /// Select a block by its one-based label.
    Select(usize),
    /// Start the level over.
    Restart,
    /// Stop reading input.
    Quit,
}

/// How a play loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayOutcome {
    /// Every block reached a finish cell.
    Won,
    /// The level was lost, abandoned or input ran out before it was solved.
    NotSolved,
}

/// Parses a single command such as `r`, `up` or `select 2`.
pub(crate) fn parse_command(input: &str) -> Result<PlayerCommand> {
    let normalized = input.trim().to_ascii_lowercase();
    let mut words = normalized.split_whitespace();
    let Some(head) = words.next() else {
        bail!("empty command");
    };

    let command = match head {
        "u" | "up" => PlayerCommand::Move(Direction::Up),
        "d" | "down" => PlayerCommand::Move(Direction::Down),
        "l" | "left" => PlayerCommand::Move(Direction::Left),
        "r" | "right" => PlayerCommand::Move(Direction::Right),
        "restart" => PlayerCommand::Restart,
        "q" | "quit" | "exit" => PlayerCommand::Quit,
        "s" | "select" => {
            let Some(label) = words.next() else {
                bail!("select needs a block number");
            };
            let label = label
                .parse::<usize>()
                .with_context(|| format!("`{label}` is not a block number"))?;
            PlayerCommand::Select(label)
        }
        other => bail!("unknown command `{other}`"),
    };

    if let Some(extra) = words.next() {
        bail!("unexpected `{extra}` after `{head}`");
    }
    Ok(command)
}

/// Splits a comma-separated script into individual commands.
pub(crate) fn script_entries(script: &str) -> Vec<String> {
    script
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Runs the session against the provided input lines, printing to `out`.
///
/// Stops as soon as the level is won or a `quit` command arrives. A lost
/// level keeps reading so the player can `restart`.
pub(crate) fn run<I, W>(session: &mut Session, input: I, out: &mut W) -> Result<PlayOutcome>
where
    I: IntoIterator<Item = String>,
    W: Write,
{
    write!(out, "{}", text::board(session))?;
    writeln!(out, "{}", text::hud(session))?;

    for line in input {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(error) => {
                writeln!(out, "{error:#}")?;
                continue;
            }
        };
        debug!(?command, "player command");

        let mut events = Vec::new();
        match command {
            PlayerCommand::Quit => break,
            PlayerCommand::Restart => session.restart(),
            PlayerCommand::Select(label) => apply(
                session,
                Command::SelectBlock {
                    index: label.saturating_sub(1),
                },
                &mut events,
            ),
            PlayerCommand::Move(direction) => {
                apply(session, Command::AttemptMove { direction }, &mut events);
            }
        }

        for line in events.iter().filter_map(text::describe) {
            writeln!(out, "{line}")?;
        }
        if moved(&events) || command == PlayerCommand::Restart {
            write!(out, "{}", text::board(session))?;
        }
        writeln!(out, "{}", text::hud(session))?;

        if query::state(session) == SessionState::Won {
            break;
        }
    }

    out.flush()?;
    Ok(match query::state(session) {
        SessionState::Won => PlayOutcome::Won,
        _ => PlayOutcome::NotSolved,
    })
}

fn moved(events: &[Event]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::BlockSlid { .. }))
}
