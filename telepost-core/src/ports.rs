//! Service ports consumed by the lifecycle engine.
//!
//! Production implementations live in the `storage`, `ai-gateway-client` and
//! `telegram-client` crates plus the app's poster store; tests substitute
//! in-memory stubs.

use async_trait::async_trait;

use crate::error::Result;
use crate::post::Post;
use crate::status::PostStatus;

/// Durable post record store. Guarded updates carry the set of statuses the
/// row must currently be in; matching zero rows is a `Conflict`, which is
/// what keeps a `posted` row immutable and rejects stale concurrent writes.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<()>;

    /// Most recent row for the conversation, any status.
    async fn latest(&self, conversation_id: &str) -> Result<Option<Post>>;

    /// Most recent row for the conversation among the given statuses.
    async fn latest_with_status(
        &self,
        conversation_id: &str,
        statuses: &[PostStatus],
    ) -> Result<Option<Post>>;

    /// Overwrites content and feedback on a row still in `draft`.
    async fn update_content(&self, id: &str, content: &str, feedback: &str) -> Result<()>;

    /// Stores the poster URL and moves the row to `poster_approved`,
    /// provided it is currently in one of `allowed`.
    async fn update_poster(&self, id: &str, poster_url: &str, allowed: &[PostStatus])
        -> Result<()>;

    /// Moves the row to `new_status`, provided it is currently in `allowed`.
    async fn update_status(
        &self,
        id: &str,
        allowed: &[PostStatus],
        new_status: PostStatus,
    ) -> Result<()>;
}

/// AI gateway: text generation for posts, image generation for posters.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates (or, with feedback, regenerates) post text from the brief.
    async fn generate_post(
        &self,
        input_text: &str,
        input_image_url: Option<&str>,
        feedback: Option<&str>,
    ) -> Result<String>;

    /// Generates poster image bytes (PNG) from the approved post content.
    async fn generate_poster(&self, post_content: &str, feedback: Option<&str>)
        -> Result<Vec<u8>>;
}

/// Stores poster bytes and returns a URL Telegram can fetch.
#[async_trait]
pub trait PosterStore: Send + Sync {
    async fn store_poster(&self, bytes: &[u8]) -> Result<String>;
}

/// Outbound message delivery for the finished post.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Sends a photo with caption when a poster URL is present, otherwise a
    /// plain text message.
    async fn send_post(&self, chat_id: i64, text: &str, poster_url: Option<&str>) -> Result<()>;
}
