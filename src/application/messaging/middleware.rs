//! Message handler chain - raw handlers invoked on every inbound message

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use crate::application::errors::BotError;
use crate::application::services::BucketRegistry;
use crate::domain::entities::Message;

/// Handler result: an optional reply for the gateway
pub type HandlerResult = Result<Option<String>, BotError>;

/// Raw message handler contributed by a plugin
pub trait MessageHandler: Send + Sync {
    fn handle(&self, message: &Message, buckets: &BucketRegistry) -> HandlerResult;
}

impl<F> MessageHandler for F
where
    F: Fn(&Message, &BucketRegistry) -> HandlerResult + Send + Sync,
{
    fn handle(&self, message: &Message, buckets: &BucketRegistry) -> HandlerResult {
        self(message, buckets)
    }
}

/// Shared handle to a message handler
pub type Handler = Arc<dyn MessageHandler>;

/// Wrap a closure as a [`Handler`]
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Message, &BucketRegistry) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Ordered list of handlers: load order, then declaration order within a plugin
#[derive(Default)]
pub struct HandlerChain {
    handlers: RwLock<Vec<Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append handlers, preserving their order
    pub fn extend(&self, handlers: impl IntoIterator<Item = Handler>) {
        self.handlers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend(handlers);
    }

    pub fn len(&self) -> usize {
        self.handlers.read().map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every handler in order and collect their replies.
    ///
    /// A handler that errors or panics is logged and skipped; the rest still run.
    pub fn run(&self, message: &Message, buckets: &BucketRegistry) -> Vec<String> {
        let handlers = match self.handlers.read() {
            Ok(h) => h.clone(),
            Err(_) => {
                tracing::error!("Handler list lock poisoned, dropping message {}", message.id);
                return Vec::new();
            }
        };

        let mut replies = Vec::new();
        for (index, handler) in handlers.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| handler.handle(message, buckets))) {
                Ok(Ok(Some(reply))) => replies.push(reply),
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    tracing::warn!("[{}] Handler #{} failed: {}", message.chat_id, index, e);
                }
                Err(_) => {
                    tracing::error!("[{}] Handler #{} panicked", message.chat_id, index);
                }
            }
        }
        replies
    }
}
