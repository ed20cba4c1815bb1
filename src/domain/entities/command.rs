use std::fmt;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::services::BucketRegistry;
use crate::domain::entities::Message;

/// Outcome of running a command: an optional reply for the gateway
pub type CommandResult = Result<Option<String>, CommandError>;

/// Command runner function type
pub type CommandRunner = Arc<dyn Fn(&Message, &BucketRegistry) -> CommandResult + Send + Sync>;

/// A named, invokable action contributed by a plugin
///
/// A command either carries a runner or redirects to another call. When
/// `redirect` is set the runner is never consulted.
#[derive(Clone)]
pub struct Command {
    pub call: String,
    pub description: Option<String>,
    redirect: Option<String>,
    runner: Option<CommandRunner>,
    src_plugin: Option<String>,
}

impl Command {
    pub fn new(call: impl Into<String>) -> Self {
        Self {
            call: call.into(),
            description: None,
            redirect: None,
            runner: None,
            src_plugin: None,
        }
    }

    /// An alias that resolves to `target` at lookup time
    pub fn alias(call: impl Into<String>, target: impl Into<String>) -> Self {
        let mut cmd = Self::new(call);
        cmd.redirect = Some(target.into());
        cmd
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_runner<F>(mut self, runner: F) -> Self
    where
        F: Fn(&Message, &BucketRegistry) -> CommandResult + Send + Sync + 'static,
    {
        self.runner = Some(Arc::new(runner));
        self
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn runner(&self) -> Option<&CommandRunner> {
        self.runner.as_ref()
    }

    /// Id of the plugin that registered this command
    pub fn src_plugin(&self) -> Option<&str> {
        self.src_plugin.as_deref()
    }

    /// Stamp the owning plugin. Only the loader does this.
    pub(crate) fn stamped(mut self, plugin_id: impl Into<String>) -> Self {
        self.src_plugin = Some(plugin_id.into());
        self
    }

    /// Invoke the runner, if any
    pub fn run(&self, message: &Message, buckets: &BucketRegistry) -> CommandResult {
        match &self.runner {
            Some(runner) => runner(message, buckets),
            None => Ok(None),
        }
    }

    /// Serializable view used when a command bucket is written to a snapshot
    pub fn descriptor(&self) -> serde_json::Value {
        serde_json::json!({
            "call": self.call,
            "redirect": self.redirect,
            "srcPlugin": self.src_plugin,
            "description": self.description,
        })
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("call", &self.call)
            .field("redirect", &self.redirect)
            .field("src_plugin", &self.src_plugin)
            .field("has_runner", &self.runner.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;

    #[test]
    fn test_alias_has_no_runner() {
        let cmd = Command::alias("p", "ping");
        assert_eq!(cmd.redirect(), Some("ping"));
        assert!(cmd.runner().is_none());
        assert!(cmd.src_plugin().is_none());
    }

    #[test]
    fn test_run_invokes_runner() {
        let cmd = Command::new("ping").with_runner(|_msg, _buckets| Ok(Some("pong".to_string())));
        let buckets = BucketRegistry::new();
        let msg = Message::new("c", User::new("u"), "!ping");

        let reply = cmd.run(&msg, &buckets).unwrap();
        assert_eq!(reply.as_deref(), Some("pong"));
    }

    #[test]
    fn test_descriptor_includes_owner() {
        let cmd = Command::alias("p", "ping").stamped("core");
        let desc = cmd.descriptor();
        assert_eq!(desc["call"], "p");
        assert_eq!(desc["redirect"], "ping");
        assert_eq!(desc["srcPlugin"], "core");
    }
}
