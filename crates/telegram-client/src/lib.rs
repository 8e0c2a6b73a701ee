//! # Telegram Bot API client
//!
//! Raw HTTP client for the handful of Bot API methods the system needs:
//! `getUpdates` (group discovery), `sendMessage` and `sendPhoto` (replies
//! and publishing). Implements the core [`Publisher`] port. Any `ok: false`
//! response surfaces as a Delivery error carrying the upstream description.

mod types;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use telepost_core::{Publisher, Result, TelepostError};
use tracing::info;

pub use types::{ChatMemberUpdate, GroupChat, IncomingMessage, TelegramChat, Update};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Client for one bot token. Cheap to clone.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Points the client at a different API host (tests, local Bot API).
    pub fn with_api_url(token: &str, api_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        let request = match body {
            Some(body) => self.http.post(&url).json(&body),
            None => self.http.get(&url),
        };

        let response = request
            .send()
            .await
            .map_err(|e| TelepostError::Delivery(format!("telegram request failed: {}", e)))?
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| TelepostError::Delivery(format!("invalid telegram response: {}", e)))?;

        if !response.ok {
            return Err(TelepostError::Delivery(
                response
                    .description
                    .unwrap_or_else(|| "telegram rejected the request".to_string()),
            ));
        }
        response
            .result
            .ok_or_else(|| TelepostError::Delivery("telegram response had no result".to_string()))
    }

    /// Scans the bot's recent update history and returns the distinct
    /// groups/supergroups/channels it has seen. Direct messages are skipped.
    pub async fn list_groups(&self) -> Result<Vec<GroupChat>> {
        let updates: Vec<Update> = self.call("getUpdates?limit=100", None).await?;

        let mut seen = HashSet::new();
        let mut groups = Vec::new();
        for update in &updates {
            if let Some(chat) = update.chat() {
                if chat.is_group_like() && seen.insert(chat.id) {
                    groups.push(GroupChat {
                        id: chat.id,
                        title: chat.title.clone(),
                        kind: chat.kind.clone(),
                    });
                }
            }
        }

        info!(count = groups.len(), "discovered publishable chats");
        Ok(groups)
    }

    /// Sends a Markdown-formatted text message.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                Some(json!({
                    "chat_id": chat_id,
                    "text": text,
                    "parse_mode": "Markdown",
                })),
            )
            .await?;
        Ok(())
    }

    /// Sends a photo by URL with a Markdown-formatted caption.
    pub async fn send_photo(&self, chat_id: i64, photo_url: &str, caption: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "sendPhoto",
                Some(json!({
                    "chat_id": chat_id,
                    "photo": photo_url,
                    "caption": caption,
                    "parse_mode": "Markdown",
                })),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Publisher for TelegramClient {
    async fn send_post(&self, chat_id: i64, text: &str, poster_url: Option<&str>) -> Result<()> {
        match poster_url {
            Some(url) => self.send_photo(chat_id, url, text).await?,
            None => self.send_message(chat_id, text).await?,
        }
        info!(chat_id, with_poster = poster_url.is_some(), "post delivered");
        Ok(())
    }
}
