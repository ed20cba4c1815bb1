//! Core plugin - owns the command bucket and the command message handler

use tracing::{debug, warn};

use crate::application::messaging::middleware::{handler, Handler};
use crate::application::messaging::parser::{CommandParser, DEFAULT_PREFIX};
use crate::application::services::{CommandResolver, COMMAND_BUCKET};
use crate::domain::entities::{Bucket, BucketEntries, Entry, Message};
use super::trait_def::Plugin;

pub const CORE_PLUGIN_ID: &str = "core";

/// Built-in plugin loaded by every dispatcher before any other plugin
#[derive(Debug, Clone)]
pub struct CorePlugin {
    parser: CommandParser,
    resolver: CommandResolver,
    unknown_command_reply: Option<String>,
}

impl CorePlugin {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            parser: CommandParser::new(prefix),
            resolver: CommandResolver::new(),
            unknown_command_reply: None,
        }
    }

    /// Reply with `text` when a prefixed call resolves to nothing.
    /// `{call}` in the text is replaced with the typed call.
    pub fn with_unknown_command_reply(mut self, text: Option<String>) -> Self {
        self.unknown_command_reply = text;
        self
    }

    pub fn with_resolver(mut self, resolver: CommandResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn prefix(&self) -> &str {
        self.parser.prefix()
    }

    fn command_handler(&self) -> Handler {
        let parser = self.parser.clone();
        let resolver = self.resolver;
        let unknown_reply = self.unknown_command_reply.clone();

        handler(move |message: &Message, buckets| {
            let Some(invocation) = parser.parse(&message.text) else {
                return Ok(None);
            };

            match resolver.resolve(buckets, &invocation.call)? {
                Some(command) => {
                    debug!("[{}] Running {} for {}", message.chat_id, invocation.call, message.author);
                    Ok(command.run(message, buckets)?)
                }
                None => {
                    debug!("[{}] Unknown command: {}", message.chat_id, invocation.call);
                    Ok(unknown_reply.as_ref().map(|r| r.replace("{call}", &invocation.call)))
                }
            }
        })
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Plugin for CorePlugin {
    fn id(&self) -> &str {
        CORE_PLUGIN_ID
    }

    fn description(&self) -> &str {
        "Command bucket and command dispatch"
    }

    fn buckets(&self) -> Vec<Bucket> {
        vec![Bucket::new(COMMAND_BUCKET).with_insert_hook(insert_command)]
    }

    fn message_handlers(&self) -> Vec<Handler> {
        vec![self.command_handler()]
    }
}

/// Insertion hook of the command bucket.
///
/// A taken call is retried as `{plugin}:{call}`; if that is taken too the
/// command is dropped with a warning.
pub fn insert_command(entries: &mut BucketEntries, call: String, entry: Entry) {
    let Some(command) = entry.as_command() else {
        warn!("Could not add data({}) to {}, not a command. (skipped)", call, COMMAND_BUCKET);
        return;
    };
    let owner = command.src_plugin().unwrap_or("unknown").to_string();

    let call = if entries.contains_key(&call) {
        format!("{}:{}", owner, call)
    } else {
        call
    };

    if entries.contains_key(&call) {
        warn!(
            "Command with call({}) from {} could not be registered, duplicate call. (skipped)",
            call, owner
        );
    } else {
        entries.insert(call, entry);
    }
}
