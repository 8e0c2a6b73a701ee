//! Wires configuration into clients, engine and HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;

use ai_gateway_client::AiGatewayClient;
use storage::PostRepository;
use telegram_client::TelegramClient;
use telepost_core::LifecycleEngine;

use crate::config::AppConfig;
use crate::handlers::configure_routes;
use crate::poster_store::FsPosterStore;
use crate::state::AppState;

/// Builds application state from config: repository, both upstream clients,
/// poster store, engine.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let repo = PostRepository::new(&config.database_url).await?;

    let gateway = AiGatewayClient::new(config.gateway_api_key.clone())
        .with_base_url(config.gateway_base_url.clone())
        .with_models(config.text_model.clone(), config.image_model.clone());

    let telegram = Arc::new(match &config.telegram_api_url {
        Some(url) => TelegramClient::with_api_url(&config.bot_token, url),
        None => TelegramClient::new(&config.bot_token),
    });

    let posters = FsPosterStore::new(&config.media_dir, &config.public_base_url)?;

    let engine = LifecycleEngine::new(
        Arc::new(repo),
        Arc::new(gateway),
        Arc::new(posters),
        telegram.clone(),
    );

    Ok(AppState {
        engine: Arc::new(engine),
        telegram,
        media_dir: PathBuf::from(&config.media_dir),
    })
}

/// Runs the HTTP server until shutdown.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&config).await?;

    info!("Starting TelePost server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
