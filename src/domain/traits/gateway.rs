use async_trait::async_trait;
use crate::application::errors::BotError;
use crate::domain::entities::Message;

/// Gateway trait - abstraction for the real-time messaging platform
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Connect and authenticate with the given credential
    async fn connect(&mut self, credential: &str) -> Result<(), BotError>;

    /// Wait for the next inbound message. `None` once the stream has ended.
    async fn next_message(&mut self) -> Option<Message>;

    /// Send a reply to a chat
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), BotError>;

    /// Get gateway info
    fn info(&self) -> GatewayInfo;

    /// The bot's own user id. Unknown before `connect` completes.
    fn own_identity(&self) -> Option<String> {
        self.info().id
    }
}

/// Gateway information
#[derive(Debug, Clone)]
pub struct GatewayInfo {
    pub id: Option<String>,
    pub name: String,
    pub platform: String,
}
