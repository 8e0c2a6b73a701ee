//! Web wizard actions.
//!
//! The wizard passes an opaque `session_id` which scopes the lifecycle the
//! same way a chat id does in the bot flow. Errors surface as JSON with the
//! taxonomy message verbatim (see [`crate::error::ApiError`]).

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use telepost_core::PostStatus;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub session_id: String,
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub input_image_url: Option<String>,
    /// Present on revision; the wizard re-submits with feedback.
    #[serde(default)]
    pub feedback: Option<String>,
}

/// POST /api/wizard/generate — create a draft, or revise the current one
/// when feedback is present.
pub async fn generate(
    state: web::Data<AppState>,
    req: web::Json<GenerateRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let post = match req.feedback.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        Some(feedback) => state.engine.revise(&req.session_id, feedback).await?,
        None => {
            state
                .engine
                .create(
                    &req.session_id,
                    req.input_text.as_deref().unwrap_or(""),
                    req.input_image_url.as_deref(),
                )
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(post))
}

#[derive(Debug, Deserialize)]
pub struct PosterRequest {
    pub session_id: String,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// POST /api/wizard/poster — approve-and-poster. The wizard's approve step
/// flows straight into poster generation, so a latest draft is approved
/// first; re-rolls (status already poster_approved) skip that.
pub async fn poster(
    state: web::Data<AppState>,
    req: web::Json<PosterRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let current = state.engine.status(&req.session_id).await?;
    if current.status == PostStatus::Draft {
        state.engine.approve_post(&req.session_id).await?;
    }

    let post = state
        .engine
        .generate_poster(&req.session_id, req.feedback.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "poster_url": post.poster_url,
        "post": post,
    })))
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub session_id: String,
    pub chat_id: i64,
}

/// POST /api/wizard/publish
pub async fn publish(
    state: web::Data<AppState>,
    req: web::Json<PublishRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let post = state.engine.publish(&req.session_id, req.chat_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "post": post,
    })))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub session_id: String,
}

/// GET /api/wizard/status?session_id=…
pub async fn status(
    state: web::Data<AppState>,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, ApiError> {
    let post = state.engine.status(&query.session_id).await?;
    Ok(HttpResponse::Ok().json(post))
}
