//! Group discovery for the wizard's publish step.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/groups — chats the bot can publish to.
pub async fn list_groups(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let chats = state.telegram.list_groups().await?;
    Ok(HttpResponse::Ok().json(json!({ "chats": chats })))
}
