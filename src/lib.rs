//! plugbot - a plugin-driven command router for chat gateways
//!
//! Plugins publish buckets, commands and raw message handlers into a
//! [`MessageDispatcher`]. Inbound messages are fanned out to every handler;
//! the core plugin's handler resolves prefixed calls against the `command`
//! bucket and runs them.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

pub use application::errors::{BotError, CommandError, PluginError, RegistryError, StorageError};
pub use application::messaging::{DispatcherOptions, MessageDispatcher};
pub use application::services::{AddOptions, BucketRegistry, CommandResolver};
pub use domain::entities::{Bucket, Command, Entry, Message, User};
pub use plugins::{Plugin, PluginBundle};
