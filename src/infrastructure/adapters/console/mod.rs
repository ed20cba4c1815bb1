//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::{mpsc, Mutex};
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Gateway, GatewayInfo};
use crate::application::errors::BotError;

pub const CONSOLE_CHAT_ID: &str = "console";
pub const CONSOLE_USER_ID: &str = "local-user";
pub const CONSOLE_BOT_ID: &str = "console-bot";

type Input = Box<dyn AsyncBufRead + Send + Unpin>;

/// Console gateway: each stdin line is a message from the local user
pub struct ConsoleAdapter {
    lines: Mutex<Lines<Input>>,
    connected: bool,
    sender: Option<mpsc::Sender<String>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        let input: Input = Box::new(reader);
        Self {
            lines: Mutex::new(input.lines()),
            connected: false,
            sender: None,
        }
    }

    /// Mirror every sent reply into `sender`
    pub fn with_sender(mut self, sender: mpsc::Sender<String>) -> Self {
        self.sender = Some(sender);
        self
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for ConsoleAdapter {
    async fn connect(&mut self, _credential: &str) -> Result<(), BotError> {
        tracing::info!("Starting console gateway (dev mode)");
        self.connected = true;
        Ok(())
    }

    async fn next_message(&mut self) -> Option<Message> {
        loop {
            match self.lines.get_mut().next_line().await {
                Ok(Some(line)) => {
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    let author = User::new(CONSOLE_USER_ID).with_username("you");
                    return Some(Message::new(CONSOLE_CHAT_ID, author, text).with_platform("console"));
                }
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!("Failed to read console input: {}", e);
                    return None;
                }
            }
        }
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        if let Some(sender) = &self.sender {
            sender
                .send(text.to_string())
                .await
                .map_err(|e| BotError::Network(e.to_string()))?;
        }
        Ok(())
    }

    fn info(&self) -> GatewayInfo {
        GatewayInfo {
            id: self.connected.then(|| CONSOLE_BOT_ID.to_string()),
            name: "plugbot".to_string(),
            platform: "console".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_identity_known_only_after_connect() {
        let mut console = ConsoleAdapter::from_reader(BufReader::new(&b""[..]));
        assert!(console.own_identity().is_none());

        console.connect("unused").await.unwrap();
        assert_eq!(console.own_identity().as_deref(), Some(CONSOLE_BOT_ID));
    }

    #[tokio::test]
    async fn test_lines_become_messages() {
        let input = b"!ping\n\n   \nhello there\n";
        let mut console = ConsoleAdapter::from_reader(BufReader::new(&input[..]));

        let first = console.next_message().await.unwrap();
        assert_eq!(first.text, "!ping");
        assert_eq!(first.author_id(), CONSOLE_USER_ID);
        assert_eq!(first.platform, "console");

        let second = console.next_message().await.unwrap();
        assert_eq!(second.text, "hello there");

        assert!(console.next_message().await.is_none());
    }

    #[tokio::test]
    async fn test_send_message_mirrors_to_sender() {
        let (tx, mut rx) = mpsc::channel(4);
        let console = ConsoleAdapter::from_reader(BufReader::new(&b""[..])).with_sender(tx);

        console.send_message(CONSOLE_CHAT_ID, "pong").await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("pong"));
    }
}
