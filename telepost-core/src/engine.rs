//! Lifecycle engine: the state machine both front-ends drive.
//!
//! Every operation follows the same shape: read the latest matching row,
//! perform at most one external call, then write the resulting transition.
//! Upstream failures are returned as typed errors before any write happens,
//! so a failed command can always be retried without corrupting the record.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{Result, TelepostError};
use crate::ports::{Generator, PostStore, PosterStore, Publisher};
use crate::post::Post;
use crate::status::{PostStatus, APPROVED_STATUSES};

/// Drives a post through `draft → post_approved → poster_approved → posted`.
/// Both the chat command adapter and the web wizard call into this engine;
/// all cross-request state lives in the [`PostStore`].
pub struct LifecycleEngine {
    store: Arc<dyn PostStore>,
    generator: Arc<dyn Generator>,
    posters: Arc<dyn PosterStore>,
    publisher: Arc<dyn Publisher>,
}

impl LifecycleEngine {
    pub fn new(
        store: Arc<dyn PostStore>,
        generator: Arc<dyn Generator>,
        posters: Arc<dyn PosterStore>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            store,
            generator,
            posters,
            publisher,
        }
    }

    /// Generates post text from a brief and creates a new draft row.
    ///
    /// Either a topic or a seed image is required. An existing active post
    /// for the conversation is superseded, not rejected: rows are
    /// append-only and the newest row is the current one.
    pub async fn create(
        &self,
        conversation_id: &str,
        input_text: &str,
        input_image_url: Option<&str>,
    ) -> Result<Post> {
        let input_text = input_text.trim();
        let input_image_url = input_image_url.map(str::trim).filter(|u| !u.is_empty());

        if input_text.is_empty() && input_image_url.is_none() {
            return Err(TelepostError::Validation(
                "either a topic or a seed image is required".to_string(),
            ));
        }

        if let Some(existing) = self.store.latest(conversation_id).await? {
            if !existing.status.is_terminal() {
                warn!(
                    conversation_id = %conversation_id,
                    superseded_id = %existing.id,
                    superseded_status = %existing.status,
                    "new post supersedes an active one"
                );
            }
        }

        let content = self
            .generator
            .generate_post(input_text, input_image_url, None)
            .await?;

        let post = Post::new_draft(conversation_id, input_text, input_image_url, content);
        self.store.insert(&post).await?;

        info!(conversation_id = %conversation_id, post_id = %post.id, "draft created");
        Ok(post)
    }

    /// Regenerates the current draft from its original input plus feedback.
    /// The status stays `draft`; the user may loop revisions freely.
    pub async fn revise(&self, conversation_id: &str, feedback: &str) -> Result<Post> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(TelepostError::Validation(
                "revision feedback is required".to_string(),
            ));
        }

        let mut post = self
            .store
            .latest_with_status(conversation_id, &[PostStatus::Draft])
            .await?
            .ok_or_else(|| TelepostError::NotFound("no draft to revise".to_string()))?;

        let content = self
            .generator
            .generate_post(
                &post.input_text,
                post.input_image_url.as_deref(),
                Some(feedback),
            )
            .await?;

        self.store
            .update_content(&post.id, &content, feedback)
            .await?;

        info!(conversation_id = %conversation_id, post_id = %post.id, "draft revised");
        post.generated_content = content;
        post.feedback = Some(feedback.to_string());
        Ok(post)
    }

    /// Approves the current draft: `draft → post_approved`.
    pub async fn approve_post(&self, conversation_id: &str) -> Result<Post> {
        let mut post = self
            .store
            .latest_with_status(conversation_id, &[PostStatus::Draft])
            .await?
            .ok_or_else(|| TelepostError::NotFound("no draft to approve".to_string()))?;

        self.store
            .update_status(&post.id, &[PostStatus::Draft], PostStatus::PostApproved)
            .await?;

        info!(conversation_id = %conversation_id, post_id = %post.id, "post approved");
        post.status = PostStatus::PostApproved;
        Ok(post)
    }

    /// Generates a poster for the approved post and stores its URL.
    /// Legal from `post_approved` and from `poster_approved` (re-roll); the
    /// result is `poster_approved` in both cases.
    pub async fn generate_poster(
        &self,
        conversation_id: &str,
        feedback: Option<&str>,
    ) -> Result<Post> {
        let mut post = self
            .store
            .latest_with_status(conversation_id, APPROVED_STATUSES)
            .await?
            .ok_or_else(|| {
                TelepostError::NotFound("no approved post; approve a draft first".to_string())
            })?;

        let bytes = self
            .generator
            .generate_poster(&post.generated_content, feedback)
            .await?;
        let poster_url = self.posters.store_poster(&bytes).await?;

        self.store
            .update_poster(&post.id, &poster_url, APPROVED_STATUSES)
            .await?;

        info!(
            conversation_id = %conversation_id,
            post_id = %post.id,
            poster_url = %poster_url,
            "poster generated"
        );
        post.poster_url = Some(poster_url);
        post.status = PostStatus::PosterApproved;
        Ok(post)
    }

    /// Publishes the approved post to the target chat, then marks it
    /// `posted`. A missing poster is not an error: the post goes out as a
    /// plain text message.
    pub async fn publish(&self, conversation_id: &str, chat_id: i64) -> Result<Post> {
        let mut post = self
            .store
            .latest_with_status(conversation_id, APPROVED_STATUSES)
            .await?
            .ok_or_else(|| {
                TelepostError::NotFound("no approved post to publish".to_string())
            })?;

        self.publisher
            .send_post(chat_id, &post.generated_content, post.poster_url.as_deref())
            .await?;

        if let Err(e) = self
            .store
            .update_status(&post.id, APPROVED_STATUSES, PostStatus::Posted)
            .await
        {
            // The message is already delivered; the row stays stale rather
            // than the send being repeated.
            error!(
                conversation_id = %conversation_id,
                post_id = %post.id,
                error = %e,
                "post delivered but status update failed"
            );
            return Err(e);
        }

        info!(conversation_id = %conversation_id, post_id = %post.id, chat_id, "post published");
        post.status = PostStatus::Posted;
        Ok(post)
    }

    /// Read-only: the current post for the conversation.
    pub async fn status(&self, conversation_id: &str) -> Result<Post> {
        self.store
            .latest(conversation_id)
            .await?
            .ok_or_else(|| TelepostError::NotFound("no posts yet".to_string()))
    }
}
