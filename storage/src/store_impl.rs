//! PostStore implementation backed by [`PostRepository`].
//!
//! Maps sqlx errors to the core taxonomy and turns a guarded update that
//! matched zero rows into a `Conflict`.

use async_trait::async_trait;
use telepost_core::{Post, PostStatus, PostStore, Result, TelepostError};

use crate::models::PostRecord;
use crate::post_repo::PostRepository;

fn db_err(e: sqlx::Error) -> TelepostError {
    TelepostError::Storage(e.to_string())
}

fn status_strs(statuses: &[PostStatus]) -> Vec<&'static str> {
    statuses.iter().map(PostStatus::as_str).collect()
}

#[async_trait]
impl PostStore for PostRepository {
    async fn insert(&self, post: &Post) -> Result<()> {
        self.save(&PostRecord::from(post)).await.map_err(db_err)
    }

    async fn latest(&self, conversation_id: &str) -> Result<Option<Post>> {
        self.latest_for_conversation(conversation_id)
            .await
            .map_err(db_err)?
            .map(PostRecord::into_post)
            .transpose()
    }

    async fn latest_with_status(
        &self,
        conversation_id: &str,
        statuses: &[PostStatus],
    ) -> Result<Option<Post>> {
        self.latest_with_status_in(conversation_id, &status_strs(statuses))
            .await
            .map_err(db_err)?
            .map(PostRecord::into_post)
            .transpose()
    }

    async fn update_content(&self, id: &str, content: &str, feedback: &str) -> Result<()> {
        let affected = PostRepository::update_content(self, id, content, feedback)
            .await
            .map_err(db_err)?;
        if affected == 0 {
            return Err(TelepostError::Conflict(
                "post is no longer a draft".to_string(),
            ));
        }
        Ok(())
    }

    async fn update_poster(
        &self,
        id: &str,
        poster_url: &str,
        allowed: &[PostStatus],
    ) -> Result<()> {
        let affected = PostRepository::update_poster(self, id, poster_url, &status_strs(allowed))
            .await
            .map_err(db_err)?;
        if affected == 0 {
            return Err(TelepostError::Conflict(
                "post is not in an approvable status".to_string(),
            ));
        }
        Ok(())
    }

    async fn update_status(
        &self,
        id: &str,
        allowed: &[PostStatus],
        new_status: PostStatus,
    ) -> Result<()> {
        let affected =
            PostRepository::update_status(self, id, &status_strs(allowed), new_status.as_str())
                .await
                .map_err(db_err)?;
        if affected == 0 {
            return Err(TelepostError::Conflict(format!(
                "post could not move to {}",
                new_status
            )));
        }
        Ok(())
    }
}
