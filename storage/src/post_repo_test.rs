//! Unit tests for PostRepository and its PostStore implementation.
//!
//! Each test uses a fresh SQLite file in a temp dir; covers recency
//! ordering, status filtering and the guarded updates.

use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use telepost_core::{PostStatus, PostStore, TelepostError};

use crate::models::PostRecord;
use crate::post_repo::PostRepository;

async fn test_repo(dir: &TempDir) -> PostRepository {
    let url = format!("sqlite:{}/posts.db", dir.path().display());
    PostRepository::new(&url)
        .await
        .expect("Failed to create repository")
}

fn record(conversation_id: &str, status: &str, content: &str) -> PostRecord {
    PostRecord {
        id: Uuid::new_v4().to_string(),
        conversation_id: conversation_id.to_string(),
        input_text: "topic".to_string(),
        input_image_url: None,
        generated_content: content.to_string(),
        feedback: None,
        poster_url: None,
        status: status.to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn save_and_get_by_id() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;

    let rec = record("chat-1", "draft", "hello");
    repo.save(&rec).await.expect("Failed to save post");

    let loaded = repo.get_by_id(&rec.id).await.expect("Failed to query");
    let loaded = loaded.expect("post should exist");
    assert_eq!(loaded.generated_content, "hello");
    assert_eq!(loaded.status, "draft");

    assert!(repo.get_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn latest_picks_the_newest_row() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;

    let first = record("chat-1", "draft", "first");
    let mut second = record("chat-1", "draft", "second");
    // Identical timestamps: insertion order must still win.
    second.created_at = first.created_at;
    repo.save(&first).await.unwrap();
    repo.save(&second).await.unwrap();
    repo.save(&record("chat-2", "draft", "other conversation"))
        .await
        .unwrap();

    let latest = repo
        .latest_for_conversation("chat-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, second.id);
}

#[tokio::test]
async fn latest_with_status_filters() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;

    let draft = record("chat-1", "draft", "draft row");
    let approved = record("chat-1", "post_approved", "approved row");
    repo.save(&approved).await.unwrap();
    repo.save(&draft).await.unwrap();

    let found = repo
        .latest_with_status_in("chat-1", &["post_approved", "poster_approved"])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, approved.id);

    let none = repo
        .latest_with_status_in("chat-1", &["posted"])
        .await
        .unwrap();
    assert!(none.is_none());

    // An empty status set matches nothing rather than producing `IN ()`.
    let none = repo.latest_with_status_in("chat-1", &[]).await.unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn update_content_only_touches_drafts() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;

    let rec = record("chat-1", "draft", "v1");
    repo.save(&rec).await.unwrap();

    let affected = repo
        .update_content(&rec.id, "v2", "make it shorter")
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let loaded = repo.get_by_id(&rec.id).await.unwrap().unwrap();
    assert_eq!(loaded.generated_content, "v2");
    assert_eq!(loaded.feedback.as_deref(), Some("make it shorter"));

    repo.update_status(&rec.id, &["draft"], "post_approved")
        .await
        .unwrap();
    let affected = repo.update_content(&rec.id, "v3", "again").await.unwrap();
    assert_eq!(affected, 0);
}

#[tokio::test]
async fn update_poster_guards_on_status() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;

    let rec = record("chat-1", "draft", "content");
    repo.save(&rec).await.unwrap();

    // Not legal from draft.
    let affected = repo
        .update_poster(
            &rec.id,
            "http://m/poster.png",
            &["post_approved", "poster_approved"],
        )
        .await
        .unwrap();
    assert_eq!(affected, 0);

    repo.update_status(&rec.id, &["draft"], "post_approved")
        .await
        .unwrap();
    let affected = repo
        .update_poster(
            &rec.id,
            "http://m/poster.png",
            &["post_approved", "poster_approved"],
        )
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let loaded = repo.get_by_id(&rec.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, "poster_approved");
    assert_eq!(loaded.poster_url.as_deref(), Some("http://m/poster.png"));
}

#[tokio::test]
async fn posted_rows_reject_further_status_changes() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;

    let rec = record("chat-1", "posted", "done");
    repo.save(&rec).await.unwrap();

    let affected = repo
        .update_status(&rec.id, &["post_approved", "poster_approved"], "posted")
        .await
        .unwrap();
    assert_eq!(affected, 0);
}

#[tokio::test]
async fn store_impl_maps_guard_misses_to_conflict() {
    let dir = TempDir::new().unwrap();
    let repo = test_repo(&dir).await;

    let rec = record("chat-1", "posted", "done");
    repo.save(&rec).await.unwrap();

    let store: &dyn PostStore = &repo;
    let err = store
        .update_status(&rec.id, &[PostStatus::Draft], PostStatus::PostApproved)
        .await
        .unwrap_err();
    assert!(matches!(err, TelepostError::Conflict(_)));

    let latest = store.latest("chat-1").await.unwrap().unwrap();
    assert_eq!(latest.status, PostStatus::Posted);
}
