//! HTTP handlers and route configuration.

mod groups;
mod health;
mod media;
mod webhook;
mod wizard;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/groups", web::get().to(groups::list_groups))
            .service(
                web::scope("/wizard")
                    .route("/generate", web::post().to(wizard::generate))
                    .route("/poster", web::post().to(wizard::poster))
                    .route("/publish", web::post().to(wizard::publish))
                    .route("/status", web::get().to(wizard::status)),
            ),
    )
    .route("/telegram/webhook", web::post().to(webhook::telegram_webhook))
    .route("/media/{file}", web::get().to(media::serve_poster));
}
