//! Chat adapter: maps bot commands onto lifecycle engine calls.
//!
//! Owns no state of its own; the conversation id is the chat id of the
//! incoming update. Engine errors become in-conversation replies — the
//! webhook transport always sees success.

use telegram_client::Update;
use telepost_core::{PostStatus, TelepostError};
use tracing::{error, info};

use crate::commands::{parse_command, Command};
use crate::state::AppState;

const HELP_TEXT: &str = "👋 *Welcome to TelePost Bot!*\n\n\
    I can generate engaging posts for your group.\n\n\
    Commands:\n\
    📝 `/newpost <topic>` — Generate a new post\n\
    ✅ `/approve` — Approve the latest draft\n\
    ✏️ `/revise <feedback>` — Revise with feedback\n\
    🖼 `/poster` — Generate a poster for approved post\n\
    📤 `/publish` — Publish the approved post here\n\
    📋 `/status` — Check current draft status";

/// Handles one inbound update end to end. Never returns an error: every
/// failure is either replied in-conversation or logged.
pub async fn handle_update(state: &AppState, update: Update) {
    let Some(message) = update.message else {
        return;
    };
    let Some(text) = message.text else {
        return;
    };
    let chat_id = message.chat.id;

    let Some(command) = parse_command(&text) else {
        return;
    };

    info!(chat_id, command = ?command, "bot command received");
    if let Err(e) = dispatch(state, chat_id, command).await {
        // Reply delivery itself failed; nothing more to do than log.
        error!(chat_id, error = %e, "failed to reply to chat");
    }
}

async fn dispatch(
    state: &AppState,
    chat_id: i64,
    command: Command,
) -> telepost_core::Result<()> {
    let conversation_id = chat_id.to_string();
    let reply = |text: String| {
        let telegram = state.telegram.clone();
        async move { telegram.send_message(chat_id, &text).await }
    };

    match command {
        Command::Start => reply(HELP_TEXT.to_string()).await,

        Command::NewPost(topic) => {
            if topic.is_empty() {
                return reply("⚠️ Please provide a topic: `/newpost your topic here`".into())
                    .await;
            }
            reply("⏳ Generating your post...".into()).await?;
            match state.engine.create(&conversation_id, &topic, None).await {
                Ok(post) => {
                    reply(format!(
                        "✨ *Draft Generated:*\n\n{}\n\n---\n\
                         ✅ `/approve` to approve\n\
                         ✏️ `/revise your feedback` to revise",
                        post.generated_content
                    ))
                    .await
                }
                Err(e) => reply(error_reply(&e)).await,
            }
        }

        Command::Approve => match state.engine.approve_post(&conversation_id).await {
            Ok(_) => {
                reply(
                    "✅ *Post approved!*\n\n\
                     🖼 `/poster` — Generate a poster image\n\
                     📤 `/publish` — Publish text-only now"
                        .into(),
                )
                .await
            }
            Err(TelepostError::NotFound(_)) => {
                reply("⚠️ No draft found. Use `/newpost <topic>` to create one.".into()).await
            }
            Err(e) => reply(error_reply(&e)).await,
        },

        Command::Revise(feedback) => {
            if feedback.is_empty() {
                return reply("⚠️ Please provide feedback: `/revise make it more casual`".into())
                    .await;
            }
            match state.engine.status(&conversation_id).await {
                Ok(post) if post.status == PostStatus::Draft => {}
                _ => {
                    return reply("⚠️ No draft to revise. Use `/newpost <topic>` first.".into())
                        .await;
                }
            }
            reply("⏳ Revising your post...".into()).await?;
            match state.engine.revise(&conversation_id, &feedback).await {
                Ok(post) => {
                    reply(format!(
                        "✨ *Revised Draft:*\n\n{}\n\n---\n\
                         ✅ `/approve` to approve\n\
                         ✏️ `/revise your feedback` to revise again",
                        post.generated_content
                    ))
                    .await
                }
                Err(e) => reply(error_reply(&e)).await,
            }
        }

        Command::Poster => {
            match state.engine.status(&conversation_id).await {
                Ok(post) if !matches!(post.status, PostStatus::Draft | PostStatus::Posted) => {}
                _ => {
                    return reply(
                        "⚠️ No approved post found. Approve a draft first with `/approve`.".into(),
                    )
                    .await;
                }
            }
            reply("🎨 Generating poster... this may take a moment.".into()).await?;
            match state.engine.generate_poster(&conversation_id, None).await {
                Ok(post) => {
                    if let Some(url) = post.poster_url.as_deref() {
                        state
                            .telegram
                            .send_photo(
                                chat_id,
                                url,
                                "🖼 *Your poster is ready!*\n\n📤 `/publish` to post with this poster",
                            )
                            .await
                    } else {
                        Ok(())
                    }
                }
                Err(e) => reply(format!("❌ Error generating poster: {}", display(&e))).await,
            }
        }

        Command::Publish => match state.engine.publish(&conversation_id, chat_id).await {
            Ok(_) => reply("🎉 *Post published successfully!*".into()).await,
            Err(TelepostError::NotFound(_)) => {
                reply("⚠️ No approved post to publish. Create and approve one first.".into())
                    .await
            }
            Err(e) => reply(format!("❌ Failed to publish: {}", display(&e))).await,
        },

        Command::Status => match state.engine.status(&conversation_id).await {
            Ok(post) => {
                let emoji = match post.status {
                    PostStatus::Draft => "📝",
                    PostStatus::PostApproved => "✅",
                    PostStatus::PosterApproved => "🖼",
                    PostStatus::Posted => "📤",
                };
                let poster_line = if post.poster_url.is_some() {
                    "🖼 Poster: Ready"
                } else {
                    "🖼 Poster: Not generated"
                };
                reply(format!(
                    "📋 *Latest Post Status:*\n\n\
                     {} Status: `{}`\n\
                     📅 Created: {}\n\
                     {}",
                    emoji,
                    post.status,
                    post.created_at.format("%Y-%m-%d %H:%M UTC"),
                    poster_line
                ))
                .await
            }
            Err(TelepostError::NotFound(_)) => {
                reply("📋 No posts yet. Use `/newpost <topic>` to get started!".into()).await
            }
            Err(e) => reply(error_reply(&e)).await,
        },

        Command::Unknown(_) => {
            reply("❓ Unknown command. Send `/start` to see available commands.".into()).await
        }
    }
}

fn display(e: &TelepostError) -> String {
    match e {
        TelepostError::RateLimited => "Rate limited, try again later.".to_string(),
        TelepostError::QuotaExhausted => "Credits exhausted.".to_string(),
        other => other.to_string(),
    }
}

fn error_reply(e: &TelepostError) -> String {
    format!("❌ Error: {}", display(e))
}
