//! Post record model for persistence.
//!
//! Maps to the `posts` table; converted to/from the core [`Post`] entity at
//! the repository boundary so the status string never leaks past it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use telepost_core::{Post, PostStatus, Result};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostRecord {
    pub id: String,
    pub conversation_id: String,
    pub input_text: String,
    pub input_image_url: Option<String>,
    pub generated_content: String,
    pub feedback: Option<String>,
    pub poster_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Post> for PostRecord {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            conversation_id: post.conversation_id.clone(),
            input_text: post.input_text.clone(),
            input_image_url: post.input_image_url.clone(),
            generated_content: post.generated_content.clone(),
            feedback: post.feedback.clone(),
            poster_url: post.poster_url.clone(),
            status: post.status.as_str().to_string(),
            created_at: post.created_at,
        }
    }
}

impl PostRecord {
    /// Converts the stored row back into the domain entity; fails on an
    /// unknown status string.
    pub fn into_post(self) -> Result<Post> {
        let status = PostStatus::parse(&self.status)?;
        Ok(Post {
            id: self.id,
            conversation_id: self.conversation_id,
            input_text: self.input_text,
            input_image_url: self.input_image_url,
            generated_content: self.generated_content,
            feedback: self.feedback,
            poster_url: self.poster_url,
            status,
            created_at: self.created_at,
        })
    }
}
