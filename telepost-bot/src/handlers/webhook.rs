//! Telegram webhook surface.
//!
//! Always answers `200 {ok:true}` so Telegram never retries a delivery;
//! internal failures are logged, and user-facing errors were already
//! replied in-conversation by the chat adapter.

use actix_web::{web, HttpResponse};
use serde_json::json;
use telegram_client::Update;
use tracing::warn;

use crate::chat;
use crate::state::AppState;

/// POST /telegram/webhook
///
/// Takes the raw body so a malformed payload still reaches this handler
/// instead of being rejected by an extractor.
pub async fn telegram_webhook(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => chat::handle_update(&state, update).await,
        Err(e) => warn!(error = %e, "unparseable telegram update"),
    }

    HttpResponse::Ok().json(json!({ "ok": true }))
}
