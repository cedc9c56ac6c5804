//! Interactive loop: one command per line, same grammar as the CLI.

use clap::Parser;
use votepaxos_client::RealtimeError;

use crate::app::{self, Context, Input};
use crate::cli::{Command, ConsoleLine};
use crate::error::CliError;

const PROMPT: &str = "votepaxos> ";

#[derive(Debug, PartialEq)]
pub enum ConsoleInput {
    Empty,
    Quit,
    Run(Command),
    /// Help text or a parse error, to be printed as-is.
    Message(String),
}

pub fn parse_line(line: &str) -> ConsoleInput {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.first() {
        None => ConsoleInput::Empty,
        Some(&("quit" | "exit")) => ConsoleInput::Quit,
        Some(_) => match ConsoleLine::try_parse_from(words) {
            Ok(parsed) => ConsoleInput::Run(parsed.command),
            Err(err) => ConsoleInput::Message(err.render().to_string()),
        },
    }
}

pub async fn run(context: &Context, input: &mut Input) -> Result<(), CliError> {
    app::print_status(context);
    println!("\nType 'help' for commands, 'quit' to leave.");

    loop {
        let line = tokio::select! {
            line = input.read_line(PROMPT) => line?,
            _ = context.session.disconnected() => {
                println!("\nThe realtime connection was lost; restart the console to reconnect.");
                return Err(CliError::Realtime(RealtimeError::Closed));
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(());
            }
        };
        let Some(line) = line else {
            return Ok(());
        };

        match parse_line(&line) {
            ConsoleInput::Empty => {}
            ConsoleInput::Quit => return Ok(()),
            ConsoleInput::Message(text) => println!("{}", text.trim_end()),
            ConsoleInput::Run(command) => match app::execute(context, input, command).await {
                Ok(()) | Err(CliError::ActionFailed) => {}
                Err(err) => println!("❌ {err}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_timeout::timeout]
    fn blank_and_quit() {
        assert_eq!(parse_line("   "), ConsoleInput::Empty);
        assert_eq!(parse_line("quit"), ConsoleInput::Quit);
        assert_eq!(parse_line(" exit "), ConsoleInput::Quit);
    }

    #[test_timeout::timeout]
    fn commands_use_cli_grammar() {
        assert_eq!(
            parse_line("kill sim-3"),
            ConsoleInput::Run(Command::Kill { id: "sim-3".into() })
        );
        assert_eq!(
            parse_line("propose Universal basic income"),
            ConsoleInput::Run(Command::Propose {
                selector: vec!["Universal".into(), "basic".into(), "income".into()]
            })
        );
    }

    #[test_timeout::timeout]
    fn unknown_commands_and_help_produce_messages() {
        assert!(matches!(parse_line("frobnicate"), ConsoleInput::Message(_)));
        match parse_line("help") {
            ConsoleInput::Message(text) => assert!(text.contains("spawn")),
            other => panic!("expected help text, got {other:?}"),
        }
    }
}
