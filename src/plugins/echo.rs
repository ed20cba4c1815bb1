//! Echo plugin - small demo plugin wired into the binary
//!
//! Shows a plain command, an alias and a persistent data bucket.

use serde_json::{json, Value};

use crate::application::errors::CommandError;
use crate::application::messaging::parser::{CommandParser, DEFAULT_PREFIX};
use crate::application::services::BucketRegistry;
use crate::domain::entities::{Bucket, Command, CommandResult, Message};
use super::trait_def::Plugin;

pub const NOTES_BUCKET: &str = "notes";

#[derive(Debug, Clone)]
pub struct EchoPlugin {
    parser: CommandParser,
}

impl EchoPlugin {
    /// `prefix` must match the dispatcher's so arguments line up
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            parser: CommandParser::new(prefix),
        }
    }
}

impl Default for EchoPlugin {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Plugin for EchoPlugin {
    fn id(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo and per-user notes"
    }

    fn buckets(&self) -> Vec<Bucket> {
        vec![Bucket::new(NOTES_BUCKET).persistent()]
    }

    fn commands(&self) -> Vec<Command> {
        let echo_parser = self.parser.clone();
        let note_parser = self.parser.clone();
        vec![
            Command::new("echo")
                .with_description("Repeat the arguments")
                .with_runner(move |msg, _| Ok(Some(args(&echo_parser, msg).join(" ")))),
            Command::alias("say", "echo"),
            Command::new("note")
                .with_description("Keep short notes: note add <text> | note list | note clear")
                .with_runner(move |msg, buckets| run_note(&args(&note_parser, msg), msg, buckets)),
        ]
    }
}

/// Arguments after the call token
fn args(parser: &CommandParser, message: &Message) -> Vec<String> {
    parser
        .parse(&message.text)
        .map(|invocation| invocation.args)
        .unwrap_or_default()
}

fn run_note(args: &[String], message: &Message, buckets: &BucketRegistry) -> CommandResult {
    let author = message.author_id();

    let mut notes: Vec<Value> = buckets
        .get(NOTES_BUCKET, author)?
        .and_then(|e| e.as_data().and_then(|v| v.as_array().cloned()))
        .unwrap_or_default();

    match args.first().map(String::as_str) {
        Some("add") if args.len() > 1 => {
            notes.push(json!(args[1..].join(" ")));
            let count = notes.len();
            buckets.upsert(NOTES_BUCKET, author, Value::Array(notes))?;
            Ok(Some(format!("Saved note #{}", count)))
        }
        Some("list") | None => {
            if notes.is_empty() {
                return Ok(Some("No notes yet".to_string()));
            }
            let lines: Vec<String> = notes
                .iter()
                .enumerate()
                .map(|(i, n)| format!("{}. {}", i + 1, n.as_str().unwrap_or_default()))
                .collect();
            Ok(Some(lines.join("\n")))
        }
        Some("clear") => {
            buckets.remove(NOTES_BUCKET, author)?;
            Ok(Some("Notes cleared".to_string()))
        }
        _ => Err(CommandError::InvalidArgs("usage: note add <text> | note list | note clear".to_string())),
    }
}
