//! Serves stored poster files.

use actix_web::{web, HttpResponse};

use crate::state::AppState;

/// GET /media/{file}
pub async fn serve_poster(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let file_name = path.into_inner();
    // The route only matches a single segment, but keep the check explicit.
    if file_name.contains("..") || file_name.contains('/') {
        return HttpResponse::NotFound().finish();
    }

    match tokio::fs::read(state.media_dir.join(&file_name)).await {
        Ok(bytes) => HttpResponse::Ok().content_type("image/png").body(bytes),
        Err(_) => HttpResponse::NotFound().finish(),
    }
}
