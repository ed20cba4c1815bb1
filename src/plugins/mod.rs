//! Plugin system
//!
//! A plugin contributes buckets, commands and raw message handlers under a
//! unique id. The core plugin is always loaded first.

pub mod core_plugin;
pub mod echo;
pub mod loader;
pub mod trait_def;

pub use core_plugin::{CorePlugin, CORE_PLUGIN_ID};
pub use echo::EchoPlugin;
pub use loader::PluginLoader;
pub use trait_def::{Plugin, PluginBundle};
