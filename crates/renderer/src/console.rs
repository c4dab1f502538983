use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use params::{
    describe_parameters, parse_command, CommandError, ConsoleCommand, ParameterSurface,
    CONSOLE_HELP,
};
use tracing::debug;

/// Result of one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleReply {
    pub text: String,
    /// Whether the surface was modified and panels need refreshing.
    pub changed: bool,
}

impl ConsoleReply {
    fn output(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            changed: false,
        }
    }

    fn changed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            changed: true,
        }
    }
}

/// Parses and applies one console line against the surface.
pub fn respond(surface: &mut ParameterSurface, line: &str) -> Result<ConsoleReply, CommandError> {
    match parse_command(line, surface.specs())? {
        ConsoleCommand::Set { id, value } => {
            surface.set(id, value)?;
            debug!(id, %value, "console edit");
            Ok(ConsoleReply::changed(format!("{id} = {value}")))
        }
        ConsoleCommand::Reset => {
            surface.reset();
            Ok(ConsoleReply::changed("parameters reset to defaults"))
        }
        ConsoleCommand::Dump => Ok(ConsoleReply::output(
            surface
                .dump_json()
                .unwrap_or_else(|err| format!("failed to serialise parameters: {err}")),
        )),
        ConsoleCommand::List => Ok(ConsoleReply::output(describe_parameters(surface.specs()))),
        ConsoleCommand::Help => Ok(ConsoleReply::output(CONSOLE_HELP)),
    }
}

/// Forwards stdin lines to `deliver` until input ends or `deliver` returns false.
pub(crate) fn spawn_reader<F>(deliver: F) -> io::Result<JoinHandle<()>>
where
    F: Fn(String) -> bool + Send + 'static,
{
    thread::Builder::new()
        .name("aurora-console".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                if !deliver(line) {
                    break;
                }
            }
            debug!("console input closed");
        })
}
