//! Telegram Bot API types: inbound updates and the chats they reference.
//!
//! The same `Update` shape is used for webhook payloads and for the
//! `getUpdates` scan that backs group discovery.

use serde::{Deserialize, Serialize};

/// One inbound Telegram update (webhook body or getUpdates element).
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub my_chat_member: Option<ChatMemberUpdate>,
}

impl Update {
    /// The chat this update concerns, whichever field carries it.
    pub fn chat(&self) -> Option<&TelegramChat> {
        self.message
            .as_ref()
            .map(|m| &m.chat)
            .or_else(|| self.my_chat_member.as_ref().map(|m| &m.chat))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub message_id: i64,
    pub chat: TelegramChat,
    #[serde(default)]
    pub text: Option<String>,
}

/// Membership change notification; carries the chat the bot was added to.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMemberUpdate {
    pub chat: TelegramChat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl TelegramChat {
    /// Direct messages are excluded from group discovery.
    pub fn is_group_like(&self) -> bool {
        matches!(self.kind.as_str(), "group" | "supergroup" | "channel")
    }
}

/// A publishable chat as surfaced to the wizard's group picker.
#[derive(Debug, Clone, Serialize)]
pub struct GroupChat {
    pub id: i64,
    pub title: Option<String>,
    pub kind: String,
}
