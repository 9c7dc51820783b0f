//! The bot backend seam and its HTTP implementation.
//!
//! The backend is a black box: `POST {botUrl}` with the session id, the
//! message text and an optional payload, answering with a JSON array of
//! message-shaped objects (without `sender`; the caller stamps them).

use async_trait::async_trait;
use hearth_core::{HearthError, Message, Result};
use reqwest::Client;
use serde::Serialize;

/// The request body for the message endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotRequest {
    /// Session identifier; the backend keys conversation state on it.
    pub sender: String,
    pub message: String,
    #[serde(rename = "customData", skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomData {
    pub payload: String,
}

impl BotRequest {
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
            custom_data: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.custom_data = Some(CustomData {
            payload: payload.into(),
        });
        self
    }
}

/// Transport to the bot backend. Mocked in controller tests.
#[async_trait]
pub trait BotBackend: Send + Sync {
    /// Sends one message and returns the bot's replies in server order.
    async fn send_message(&self, bot_url: &str, request: &BotRequest) -> Result<Vec<Message>>;
}

/// Production backend speaking HTTP via reqwest.
#[derive(Clone, Default)]
pub struct HttpBotBackend {
    client: Client,
}

impl HttpBotBackend {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl BotBackend for HttpBotBackend {
    async fn send_message(&self, bot_url: &str, request: &BotRequest) -> Result<Vec<Message>> {
        let response = self
            .client
            .post(bot_url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                HearthError::backend(None, format!("Backend request failed: {}", err))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read backend error body".to_string());
            return Err(HearthError::backend(Some(status.as_u16()), body));
        }

        response.json().await.map_err(|err| {
            HearthError::backend(
                Some(status.as_u16()),
                format!("Malformed backend response: {}", err),
            )
        })
    }
}
