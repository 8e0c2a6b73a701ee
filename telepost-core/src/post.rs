//! The post entity: one row per generated post, append-only per conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::PostStatus;

/// A single post as it moves through the lifecycle. The "current" post of a
/// conversation is the most recently created row for that conversation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    /// Chat id in the bot flow, opaque session id in the web flow.
    pub conversation_id: String,
    /// Original brief; may be empty for image-only input.
    pub input_text: String,
    pub input_image_url: Option<String>,
    /// Latest AI-generated text, overwritten on each revision.
    pub generated_content: String,
    /// Last revision instruction supplied by the user.
    pub feedback: Option<String>,
    /// Set only once poster generation has succeeded.
    pub poster_url: Option<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Creates a fresh draft with a generated id and current timestamp.
    pub fn new_draft(
        conversation_id: &str,
        input_text: &str,
        input_image_url: Option<&str>,
        generated_content: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            input_text: input_text.to_string(),
            input_image_url: input_image_url.map(str::to_string),
            generated_content,
            feedback: None,
            poster_url: None,
            status: PostStatus::Draft,
            created_at: Utc::now(),
        }
    }
}
