//! Message dispatcher - single entry point for inbound messages

use std::sync::{Arc, RwLock};

use crate::application::errors::{BotError, ConfigError, PluginError, StorageError};
use crate::application::services::snapshot::{self, RestoreReport, Snapshot};
use crate::application::services::BucketRegistry;
use crate::domain::entities::Message;
use crate::domain::traits::PersistenceGateway;
use crate::plugins::{CorePlugin, Plugin, PluginLoader};
use super::middleware::HandlerChain;
use super::parser::DEFAULT_PREFIX;

/// Dispatcher construction options
#[derive(Debug, Clone)]
pub struct DispatcherOptions {
    pub prefix: String,
    pub unknown_command_reply: Option<String>,
    pub strict_commands: bool,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            unknown_command_reply: None,
            strict_commands: false,
        }
    }
}

/// Message dispatcher - filters self-authored messages and fans the rest out
/// to every registered handler
///
/// Owns the bucket registry, handler chain and plugin loader of one bot
/// instance. The core plugin is loaded on construction.
pub struct MessageDispatcher {
    buckets: Arc<BucketRegistry>,
    handlers: Arc<HandlerChain>,
    loader: PluginLoader,
    own_identity: RwLock<Option<String>>,
}

impl MessageDispatcher {
    pub fn new(options: DispatcherOptions) -> Result<Self, BotError> {
        if options.prefix.is_empty() {
            return Err(ConfigError::InvalidValue("command prefix must not be empty".to_string()).into());
        }

        let buckets = Arc::new(BucketRegistry::new());
        let handlers = Arc::new(HandlerChain::new());
        let loader = PluginLoader::new(buckets.clone(), handlers.clone())
            .strict_commands(options.strict_commands);

        let dispatcher = Self {
            buckets,
            handlers,
            loader,
            own_identity: RwLock::new(None),
        };

        let core = CorePlugin::new(options.prefix)
            .with_unknown_command_reply(options.unknown_command_reply);
        dispatcher.load_plugin(&core)?;
        Ok(dispatcher)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Result<Self, BotError> {
        Self::new(DispatcherOptions {
            prefix: prefix.into(),
            ..DispatcherOptions::default()
        })
    }

    pub fn load_plugin(&self, plugin: &dyn Plugin) -> Result<(), PluginError> {
        self.loader.load(plugin)
    }

    pub fn load_plugins<'a>(&self, plugins: impl IntoIterator<Item = &'a dyn Plugin>) -> Result<(), PluginError> {
        self.loader.load_all(plugins)
    }

    /// Set the bot's own user id once the gateway knows it
    pub fn set_own_identity(&self, id: Option<String>) {
        *self
            .own_identity
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = id;
    }

    pub fn own_identity(&self) -> Option<String> {
        self.own_identity.read().ok().and_then(|id| id.clone())
    }

    /// Process one inbound message and return the replies produced by handlers.
    ///
    /// Messages authored by the bot itself are ignored. With no known identity
    /// nothing is filtered.
    pub fn on_message(&self, message: &Message) -> Vec<String> {
        if let Some(own) = self.own_identity() {
            if message.author_id() == own {
                tracing::debug!("[{}] Ignoring own message {}", message.chat_id, message.id);
                return Vec::new();
            }
        }

        tracing::debug!("[{}] {}: {}", message.chat_id, message.author, preview(&message.text));
        self.handlers.run(message, &self.buckets)
    }

    pub fn buckets(&self) -> &Arc<BucketRegistry> {
        &self.buckets
    }

    pub fn loader(&self) -> &PluginLoader {
        &self.loader
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Write every persistent bucket through `gateway`
    pub fn save_persistent(&self, gateway: &dyn PersistenceGateway) -> Result<Snapshot, StorageError> {
        snapshot::save(&self.buckets, gateway)
    }

    /// Repopulate persistent buckets from `gateway`
    pub fn restore_persistent(&self, gateway: &dyn PersistenceGateway) -> Result<RestoreReport, StorageError> {
        snapshot::restore(&self.buckets, gateway)
    }
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
