//! Plugin trait definitions

use crate::application::messaging::middleware::Handler;
use crate::domain::entities::{Bucket, Command};

/// A unit of extension: buckets, commands and raw message handlers under one id
///
/// Each method is called once, when the plugin is loaded.
pub trait Plugin: Send + Sync {
    /// Unique identifier for the plugin
    fn id(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str {
        ""
    }

    /// Buckets to register
    fn buckets(&self) -> Vec<Bucket> {
        Vec::new()
    }

    /// Commands to install into the command bucket
    fn commands(&self) -> Vec<Command> {
        Vec::new()
    }

    /// Handlers invoked on every inbound message, in this order
    fn message_handlers(&self) -> Vec<Handler> {
        Vec::new()
    }
}

/// A plugin assembled from parts, for integrators who don't need a custom type
#[derive(Clone, Default)]
pub struct PluginBundle {
    id: String,
    description: String,
    buckets: Vec<Bucket>,
    commands: Vec<Command>,
    handlers: Vec<Handler>,
}

impl PluginBundle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_bucket(mut self, bucket: Bucket) -> Self {
        self.buckets.push(bucket);
        self
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handlers.push(handler);
        self
    }
}

impl Plugin for PluginBundle {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn buckets(&self) -> Vec<Bucket> {
        self.buckets.clone()
    }

    fn commands(&self) -> Vec<Command> {
        self.commands.clone()
    }

    fn message_handlers(&self) -> Vec<Handler> {
        self.handlers.clone()
    }
}
