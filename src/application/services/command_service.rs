use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::services::BucketRegistry;
use crate::domain::entities::Command;

/// Id of the bucket holding every registered command
pub const COMMAND_BUCKET: &str = "command";

/// Longest redirect chain followed before giving up
pub const MAX_REDIRECT_DEPTH: usize = 16;

/// Resolves a typed call to a runnable command, following aliases
#[derive(Debug, Clone, Copy)]
pub struct CommandResolver {
    max_depth: usize,
}

impl CommandResolver {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_REDIRECT_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve `call` against the command bucket.
    ///
    /// Returns `Ok(None)` when any step of the chain is missing or the stored
    /// entry is not a command.
    pub fn resolve(&self, buckets: &BucketRegistry, call: &str) -> Result<Option<Arc<Command>>, CommandError> {
        let mut current = call.to_string();
        for _ in 0..=self.max_depth {
            let Some(entry) = buckets.get(COMMAND_BUCKET, &current)? else {
                return Ok(None);
            };
            let Some(command) = entry.as_command().cloned() else {
                return Ok(None);
            };
            match command.redirect() {
                Some(target) => current = target.to_string(),
                None => return Ok(Some(command)),
            }
        }

        Err(CommandError::RedirectCycle {
            call: call.to_string(),
            limit: self.max_depth,
        })
    }
}

impl Default for CommandResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::AddOptions;
    use crate::domain::entities::Bucket;

    fn registry_with(commands: Vec<Command>) -> BucketRegistry {
        let registry = BucketRegistry::new();
        registry.create(Bucket::new(COMMAND_BUCKET)).unwrap();
        for cmd in commands {
            let call = cmd.call.clone();
            registry
                .add_entry(COMMAND_BUCKET, call, cmd, AddOptions::strict())
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_resolve_direct_and_missing() {
        let registry = registry_with(vec![Command::new("ping")]);
        let resolver = CommandResolver::new();

        let cmd = resolver.resolve(&registry, "ping").unwrap().unwrap();
        assert_eq!(cmd.call, "ping");
        assert!(resolver.resolve(&registry, "pong").unwrap().is_none());
    }

    #[test]
    fn test_resolve_follows_redirect_chain() {
        let registry = registry_with(vec![
            Command::new("ping"),
            Command::alias("p", "ping"),
            Command::alias("pp", "p"),
        ]);

        let cmd = CommandResolver::new().resolve(&registry, "pp").unwrap().unwrap();
        assert_eq!(cmd.call, "ping");
    }

    #[test]
    fn test_dangling_redirect_is_not_found() {
        let registry = registry_with(vec![Command::alias("p", "gone")]);
        assert!(CommandResolver::new().resolve(&registry, "p").unwrap().is_none());
    }

    #[test]
    fn test_redirect_cycle_is_an_error() {
        let registry = registry_with(vec![Command::alias("a", "b"), Command::alias("b", "a")]);

        let err = CommandResolver::new().resolve(&registry, "a").unwrap_err();
        assert!(matches!(err, CommandError::RedirectCycle { ref call, limit } if call == "a" && limit == MAX_REDIRECT_DEPTH));
    }

    #[test]
    fn test_chain_at_limit_still_resolves() {
        let mut commands = vec![Command::new("c0")];
        for i in 1..=3 {
            commands.push(Command::alias(format!("c{}", i), format!("c{}", i - 1)));
        }
        let registry = registry_with(commands);

        let resolver = CommandResolver::new().with_max_depth(3);
        assert!(resolver.resolve(&registry, "c3").unwrap().is_some());

        let resolver = CommandResolver::new().with_max_depth(2);
        assert!(resolver.resolve(&registry, "c3").is_err());
    }

    #[test]
    fn test_missing_command_bucket_is_not_found() {
        let registry = BucketRegistry::new();
        assert!(CommandResolver::new().resolve(&registry, "ping").unwrap().is_none());
    }
}
