//! Interactive line-oriented session over stdin.
//!
//! Each line is one command. Engine failures never end the session; they
//! land in the store's error slots and show up in the next printed view.

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;

use client::QubitSession;
use client::util::pointer::{PointerEvent, PointerHub};
use tokio::io::{AsyncBufReadExt, BufReader};
use wire::GateName;

use crate::CliError;
use crate::output::{OutputFormat, print_view};

pub const HELP: &str = "\
commands:
  h x y z s t p r_x r_y reset   apply a gate (p, r_x, r_y use the angle field)
  angle                         open or close the angle panel
  type <text>                   set the angle field (empty clears it)
  click <x> <y>                 pointer-down at x,y
  refresh                       re-read the engine state
  dismiss                       clear the error lines
  show                          print the current view
  help                          this text
  quit                          leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Gate(GateName),
    Angle,
    Type(String),
    Click { x: f64, y: f64 },
    Refresh,
    Dismiss,
    Show,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: click <x> <y>")]
    ClickUsage,
}

/// Parse one input line. Command words are case-insensitive. The `type`
/// argument is everything after the single separator that follows the
/// word, surrounding whitespace included.
pub fn parse_line(line: &str) -> Result<ReplCommand, ParseError> {
    let line = line.trim_start();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let word = word.to_ascii_lowercase();

    match word.as_str() {
        "" => Ok(ReplCommand::Empty),
        "angle" => Ok(ReplCommand::Angle),
        "type" => Ok(ReplCommand::Type(rest.to_owned())),
        "click" => parse_click(rest),
        "refresh" => Ok(ReplCommand::Refresh),
        "dismiss" => Ok(ReplCommand::Dismiss),
        "show" => Ok(ReplCommand::Show),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => other
            .parse::<GateName>()
            .map(ReplCommand::Gate)
            .map_err(|_| ParseError::Unknown(other.to_owned())),
    }
}

fn parse_click(rest: &str) -> Result<ReplCommand, ParseError> {
    let mut parts = rest.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::ClickUsage);
    };
    let x = x.parse::<f64>().map_err(|_| ParseError::ClickUsage)?;
    let y = y.parse::<f64>().map_err(|_| ParseError::ClickUsage)?;
    if !x.is_finite() || !y.is_finite() {
        return Err(ParseError::ClickUsage);
    }
    Ok(ReplCommand::Click { x, y })
}

pub async fn run(mut session: QubitSession, hub: &PointerHub, format: OutputFormat) -> Result<(), CliError> {
    if let Err(err) = session.mount().await {
        tracing::warn!(kind = err.kind(), "initial state read failed");
    }
    print_view(&session.view().await, format)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(ReplCommand::Quit) => break,
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        if execute(&mut session, hub, command).await {
            print_view(&session.view().await, format)?;
        }
    }
    Ok(())
}

/// Run one command. Returns whether the view should be printed afterwards.
async fn execute(session: &mut QubitSession, hub: &PointerHub, command: ReplCommand) -> bool {
    match command {
        ReplCommand::Gate(gate) => {
            if let Err(err) = session.apply_gate(gate).await {
                tracing::debug!(gate = %gate, kind = err.kind(), "gate not applied");
            }
            true
        }
        ReplCommand::Angle => {
            session.panel().toggle();
            true
        }
        ReplCommand::Type(text) => {
            if !session.panel().is_open() {
                eprintln!("the angle panel is closed; run 'angle' first");
                return false;
            }
            if let Err(reason) = session.angle_input_mut().try_set(&text) {
                eprintln!("rejected: {reason}");
                return false;
            }
            true
        }
        ReplCommand::Click { x, y } => {
            let delivered = hub.emit(&PointerEvent::down(x, y));
            tracing::debug!(x, y, delivered, "pointer-down emitted");
            true
        }
        ReplCommand::Refresh => {
            if let Err(err) = session.refresh().await {
                tracing::debug!(kind = err.kind(), "refresh failed");
            }
            true
        }
        ReplCommand::Dismiss => {
            session.dismiss_errors().await;
            true
        }
        ReplCommand::Show => true,
        ReplCommand::Help => {
            println!("{HELP}");
            false
        }
        ReplCommand::Quit | ReplCommand::Empty => false,
    }
}
