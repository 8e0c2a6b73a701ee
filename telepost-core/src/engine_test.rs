//! Unit tests for LifecycleEngine against in-memory ports.
//!
//! Covers the full transition table: draft creation, revision loops,
//! approval, poster re-rolls, publishing with and without a poster, and the
//! no-mutation-after-failure contract.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::engine::LifecycleEngine;
use crate::error::{Result, TelepostError};
use crate::ports::{Generator, PostStore, PosterStore, Publisher};
use crate::post::Post;
use crate::status::PostStatus;

#[derive(Default)]
struct MemStore {
    rows: Mutex<Vec<Post>>,
}

impl MemStore {
    fn get(&self, id: &str) -> Option<Post> {
        self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl PostStore for MemStore {
    async fn insert(&self, post: &Post) -> Result<()> {
        self.rows.lock().unwrap().push(post.clone());
        Ok(())
    }

    async fn latest(&self, conversation_id: &str) -> Result<Option<Post>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|p| p.conversation_id == conversation_id)
            .cloned())
    }

    async fn latest_with_status(
        &self,
        conversation_id: &str,
        statuses: &[PostStatus],
    ) -> Result<Option<Post>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|p| p.conversation_id == conversation_id && statuses.contains(&p.status))
            .cloned())
    }

    async fn update_content(&self, id: &str, content: &str, feedback: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && p.status == PostStatus::Draft)
            .ok_or_else(|| TelepostError::Conflict("row is no longer a draft".to_string()))?;
        row.generated_content = content.to_string();
        row.feedback = Some(feedback.to_string());
        Ok(())
    }

    async fn update_poster(
        &self,
        id: &str,
        poster_url: &str,
        allowed: &[PostStatus],
    ) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && allowed.contains(&p.status))
            .ok_or_else(|| TelepostError::Conflict("row not in an allowed status".to_string()))?;
        row.poster_url = Some(poster_url.to_string());
        row.status = PostStatus::PosterApproved;
        Ok(())
    }

    async fn update_status(
        &self,
        id: &str,
        allowed: &[PostStatus],
        new_status: PostStatus,
    ) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && allowed.contains(&p.status))
            .ok_or_else(|| TelepostError::Conflict("row not in an allowed status".to_string()))?;
        row.status = new_status;
        Ok(())
    }
}

#[derive(Default)]
struct StubGenerator {
    fail_post: Mutex<Option<TelepostError>>,
    fail_poster: Mutex<Option<TelepostError>>,
    /// (input_text, input_image_url, feedback) of the last text request.
    last_post_request: Mutex<Option<(String, Option<String>, Option<String>)>>,
    post_calls: AtomicUsize,
    poster_calls: AtomicUsize,
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate_post(
        &self,
        input_text: &str,
        input_image_url: Option<&str>,
        feedback: Option<&str>,
    ) -> Result<String> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_post_request.lock().unwrap() = Some((
            input_text.to_string(),
            input_image_url.map(str::to_string),
            feedback.map(str::to_string),
        ));
        if let Some(err) = self.fail_post.lock().unwrap().take() {
            return Err(err);
        }
        match feedback {
            Some(f) => Ok(format!("revised: {} ({})", input_text, f)),
            None => Ok(format!("generated: {}", input_text)),
        }
    }

    async fn generate_poster(&self, _post_content: &str, _feedback: Option<&str>) -> Result<Vec<u8>> {
        self.poster_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_poster.lock().unwrap().take() {
            return Err(err);
        }
        Ok(vec![0x89, 0x50, 0x4e, 0x47])
    }
}

#[derive(Default)]
struct StubPosterStore {
    stored: AtomicUsize,
}

#[async_trait]
impl PosterStore for StubPosterStore {
    async fn store_poster(&self, _bytes: &[u8]) -> Result<String> {
        let n = self.stored.fetch_add(1, Ordering::SeqCst);
        Ok(format!("http://media.test/poster-{}.png", n))
    }
}

#[derive(Default)]
struct RecordingPublisher {
    fail: Mutex<Option<TelepostError>>,
    calls: AtomicUsize,
    /// (chat_id, text, poster_url) of the last send.
    last_send: Mutex<Option<(i64, String, Option<String>)>>,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn send_post(&self, chat_id: i64, text: &str, poster_url: Option<&str>) -> Result<()> {
        if let Some(err) = self.fail.lock().unwrap().take() {
            return Err(err);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_send.lock().unwrap() =
            Some((chat_id, text.to_string(), poster_url.map(str::to_string)));
        Ok(())
    }
}

struct Harness {
    store: Arc<MemStore>,
    generator: Arc<StubGenerator>,
    posters: Arc<StubPosterStore>,
    publisher: Arc<RecordingPublisher>,
    engine: LifecycleEngine,
}

fn harness() -> Harness {
    let store = Arc::new(MemStore::default());
    let generator = Arc::new(StubGenerator::default());
    let posters = Arc::new(StubPosterStore::default());
    let publisher = Arc::new(RecordingPublisher::default());
    let engine = LifecycleEngine::new(
        store.clone(),
        generator.clone(),
        posters.clone(),
        publisher.clone(),
    );
    Harness {
        store,
        generator,
        posters,
        publisher,
        engine,
    }
}

const CONV: &str = "chat-42";

#[tokio::test]
async fn create_generates_a_draft() {
    let h = harness();

    let post = h.engine.create(CONV, "Launch of product X", None).await.unwrap();

    assert_eq!(post.status, PostStatus::Draft);
    assert_eq!(post.generated_content, "generated: Launch of product X");
    assert_eq!(post.conversation_id, CONV);
    assert!(post.poster_url.is_none());
    assert_eq!(h.store.row_count(), 1);
}

#[tokio::test]
async fn create_requires_text_or_image() {
    let h = harness();

    let err = h.engine.create(CONV, "   ", None).await.unwrap_err();

    assert!(matches!(err, TelepostError::Validation(_)));
    assert_eq!(h.generator.post_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.row_count(), 0);
}

#[tokio::test]
async fn create_accepts_image_only_input() {
    let h = harness();

    let post = h
        .engine
        .create(CONV, "", Some("http://img.test/seed.jpg"))
        .await
        .unwrap();

    assert_eq!(post.status, PostStatus::Draft);
    assert_eq!(post.input_image_url.as_deref(), Some("http://img.test/seed.jpg"));
}

#[tokio::test]
async fn rate_limited_create_leaves_no_row() {
    let h = harness();
    *h.generator.fail_post.lock().unwrap() = Some(TelepostError::RateLimited);

    let err = h.engine.create(CONV, "topic", None).await.unwrap_err();

    assert!(matches!(err, TelepostError::RateLimited));
    assert_eq!(h.store.row_count(), 0);
}

#[tokio::test]
async fn revise_updates_content_and_keeps_draft() {
    let h = harness();
    let created = h.engine.create(CONV, "Launch of product X", None).await.unwrap();

    let revised = h.engine.revise(CONV, "make it shorter").await.unwrap();

    assert_eq!(revised.id, created.id);
    assert_eq!(revised.status, PostStatus::Draft);
    assert_eq!(revised.feedback.as_deref(), Some("make it shorter"));
    assert_eq!(
        revised.generated_content,
        "revised: Launch of product X (make it shorter)"
    );

    // Revision regenerates from the original brief plus feedback.
    let req = h.generator.last_post_request.lock().unwrap().clone().unwrap();
    assert_eq!(req.0, "Launch of product X");
    assert_eq!(req.2.as_deref(), Some("make it shorter"));

    let stored = h.store.get(&created.id).unwrap();
    assert_eq!(stored.status, PostStatus::Draft);
    assert_eq!(stored.generated_content, revised.generated_content);
}

#[tokio::test]
async fn revise_without_a_draft_is_not_found() {
    let h = harness();

    let err = h.engine.revise(CONV, "shorter please").await.unwrap_err();

    assert!(matches!(err, TelepostError::NotFound(_)));
    assert_eq!(h.generator.post_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn revise_after_approval_is_not_found() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();
    h.engine.approve_post(CONV).await.unwrap();

    let err = h.engine.revise(CONV, "shorter").await.unwrap_err();

    assert!(matches!(err, TelepostError::NotFound(_)));
}

#[tokio::test]
async fn failed_revision_leaves_the_draft_untouched() {
    let h = harness();
    let created = h.engine.create(CONV, "topic", None).await.unwrap();
    *h.generator.fail_post.lock().unwrap() =
        Some(TelepostError::Generation("upstream 500".to_string()));

    let err = h.engine.revise(CONV, "shorter").await.unwrap_err();

    assert!(matches!(err, TelepostError::Generation(_)));
    let stored = h.store.get(&created.id).unwrap();
    assert_eq!(stored.generated_content, created.generated_content);
    assert_eq!(stored.feedback, None);
    assert_eq!(stored.status, PostStatus::Draft);
}

#[tokio::test]
async fn approve_then_poster() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();

    let approved = h.engine.approve_post(CONV).await.unwrap();
    assert_eq!(approved.status, PostStatus::PostApproved);

    let postered = h.engine.generate_poster(CONV, None).await.unwrap();
    assert_eq!(postered.status, PostStatus::PosterApproved);
    assert!(postered.poster_url.is_some());
}

#[tokio::test]
async fn approve_without_a_draft_is_not_found() {
    let h = harness();

    let err = h.engine.approve_post(CONV).await.unwrap_err();

    assert!(matches!(err, TelepostError::NotFound(_)));
}

#[tokio::test]
async fn poster_reroll_stays_poster_approved() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();
    h.engine.approve_post(CONV).await.unwrap();

    let first = h.engine.generate_poster(CONV, None).await.unwrap();
    let second = h
        .engine
        .generate_poster(CONV, Some("brighter colors"))
        .await
        .unwrap();

    assert_eq!(first.status, PostStatus::PosterApproved);
    assert_eq!(second.status, PostStatus::PosterApproved);
    assert_ne!(first.poster_url, second.poster_url);
    assert_eq!(h.posters.stored.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn poster_from_draft_is_not_found() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();

    let err = h.engine.generate_poster(CONV, None).await.unwrap_err();

    assert!(matches!(err, TelepostError::NotFound(_)));
    assert_eq!(h.generator.poster_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_poster_generation_keeps_status_and_url() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();
    let approved = h.engine.approve_post(CONV).await.unwrap();
    *h.generator.fail_poster.lock().unwrap() =
        Some(TelepostError::Generation("no image generated".to_string()));

    let err = h.engine.generate_poster(CONV, None).await.unwrap_err();

    assert!(matches!(err, TelepostError::Generation(_)));
    let stored = h.store.get(&approved.id).unwrap();
    assert_eq!(stored.status, PostStatus::PostApproved);
    assert!(stored.poster_url.is_none());
}

#[tokio::test]
async fn publish_with_poster_sends_photo() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();
    h.engine.approve_post(CONV).await.unwrap();
    let postered = h.engine.generate_poster(CONV, None).await.unwrap();

    let published = h.engine.publish(CONV, 777).await.unwrap();

    assert_eq!(published.status, PostStatus::Posted);
    let (chat_id, text, poster) = h.publisher.last_send.lock().unwrap().clone().unwrap();
    assert_eq!(chat_id, 777);
    assert_eq!(text, published.generated_content);
    assert_eq!(poster, postered.poster_url);
}

#[tokio::test]
async fn publish_without_poster_sends_text_only() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();
    h.engine.approve_post(CONV).await.unwrap();

    let published = h.engine.publish(CONV, 777).await.unwrap();

    assert_eq!(published.status, PostStatus::Posted);
    let (_, _, poster) = h.publisher.last_send.lock().unwrap().clone().unwrap();
    assert!(poster.is_none());
}

#[tokio::test]
async fn publish_from_draft_makes_no_delivery_call() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();

    let err = h.engine.publish(CONV, 777).await.unwrap_err();

    assert!(matches!(err, TelepostError::NotFound(_)));
    assert_eq!(h.publisher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_delivery_keeps_post_unpublished() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();
    let approved = h.engine.approve_post(CONV).await.unwrap();
    *h.publisher.fail.lock().unwrap() =
        Some(TelepostError::Delivery("chat not found".to_string()));

    let err = h.engine.publish(CONV, 777).await.unwrap_err();

    assert!(matches!(err, TelepostError::Delivery(_)));
    let stored = h.store.get(&approved.id).unwrap();
    assert_eq!(stored.status, PostStatus::PostApproved);
}

#[tokio::test]
async fn published_post_is_immutable() {
    let h = harness();
    h.engine.create(CONV, "topic", None).await.unwrap();
    h.engine.approve_post(CONV).await.unwrap();
    h.engine.publish(CONV, 777).await.unwrap();

    // All transition guards exclude `posted`; each op reports NotFound.
    assert!(matches!(
        h.engine.revise(CONV, "again").await.unwrap_err(),
        TelepostError::NotFound(_)
    ));
    assert!(matches!(
        h.engine.approve_post(CONV).await.unwrap_err(),
        TelepostError::NotFound(_)
    ));
    assert!(matches!(
        h.engine.generate_poster(CONV, None).await.unwrap_err(),
        TelepostError::NotFound(_)
    ));
    assert!(matches!(
        h.engine.publish(CONV, 777).await.unwrap_err(),
        TelepostError::NotFound(_)
    ));
}

#[tokio::test]
async fn status_reports_the_latest_post() {
    let h = harness();
    assert!(matches!(
        h.engine.status(CONV).await.unwrap_err(),
        TelepostError::NotFound(_)
    ));

    h.engine.create(CONV, "first", None).await.unwrap();
    let second = h.engine.create(CONV, "second", None).await.unwrap();

    let current = h.engine.status(CONV).await.unwrap();
    assert_eq!(current.id, second.id);
    assert_eq!(current.input_text, "second");
}

#[tokio::test]
async fn conversations_are_isolated() {
    let h = harness();
    h.engine.create("chat-a", "topic a", None).await.unwrap();
    h.engine.create("chat-b", "topic b", None).await.unwrap();
    h.engine.approve_post("chat-a").await.unwrap();

    let b = h.engine.status("chat-b").await.unwrap();
    assert_eq!(b.status, PostStatus::Draft);
    let a = h.engine.status("chat-a").await.unwrap();
    assert_eq!(a.status, PostStatus::PostApproved);
}
