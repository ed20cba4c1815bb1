//! Plugin loader - validates plugins and installs their parts

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::application::errors::{PluginError, RegistryError};
use crate::application::messaging::middleware::HandlerChain;
use crate::application::services::{AddOptions, BucketRegistry, COMMAND_BUCKET};
use crate::domain::entities::Entry;
use super::trait_def::Plugin;

/// Installs plugins into the bucket registry and the handler chain
///
/// A load either installs every bucket and handler of the plugin or none of
/// them. Command collisions are soft failures handled by the command bucket.
pub struct PluginLoader {
    plugin_ids: RwLock<Vec<String>>,
    buckets: Arc<BucketRegistry>,
    handlers: Arc<HandlerChain>,
    strict_commands: bool,
}

impl PluginLoader {
    pub fn new(buckets: Arc<BucketRegistry>, handlers: Arc<HandlerChain>) -> Self {
        Self {
            plugin_ids: RwLock::new(Vec::new()),
            buckets,
            handlers,
            strict_commands: false,
        }
    }

    /// Fail the load instead of skipping commands when no command bucket exists
    pub fn strict_commands(mut self, strict: bool) -> Self {
        self.strict_commands = strict;
        self
    }

    /// Install a plugin
    pub fn load(&self, plugin: &dyn Plugin) -> Result<(), PluginError> {
        let id = plugin.id().to_string();
        let mut plugin_ids = self
            .plugin_ids
            .write()
            .map_err(|_| PluginError::Registry(RegistryError::LockPoisoned))?;

        if plugin_ids.contains(&id) {
            return Err(PluginError::DuplicatePlugin(id));
        }

        let buckets = plugin.buckets();
        let commands = plugin.commands();

        if self.strict_commands
            && !commands.is_empty()
            && !self.buckets.contains_bucket(COMMAND_BUCKET)
            && !buckets.iter().any(|b| b.id() == COMMAND_BUCKET)
        {
            return Err(RegistryError::UnknownBucket(COMMAND_BUCKET.to_string()).into());
        }

        self.buckets.create_all(buckets)?;

        let options = AddOptions {
            fail_if_missing: self.strict_commands,
        };
        for command in commands {
            let call = command.call.clone();
            self.buckets
                .add_entry(COMMAND_BUCKET, call, Entry::from(command.stamped(&id)), options)?;
        }

        self.handlers.extend(plugin.message_handlers());
        plugin_ids.push(id.clone());

        info!("{} loaded", id);
        Ok(())
    }

    /// Load plugins in order. The first failure stops the batch; earlier
    /// plugins stay loaded.
    pub fn load_all<'a>(&self, plugins: impl IntoIterator<Item = &'a dyn Plugin>) -> Result<(), PluginError> {
        for plugin in plugins {
            self.load(plugin)?;
        }
        Ok(())
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.plugin_ids
            .read()
            .map(|ids| ids.iter().any(|p| p == id))
            .unwrap_or(false)
    }

    /// Loaded plugin ids in load order
    pub fn plugin_ids(&self) -> Vec<String> {
        self.plugin_ids.read().map(|ids| ids.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.plugin_ids.read().map(|ids| ids.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
