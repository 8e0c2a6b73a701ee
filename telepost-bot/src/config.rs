//! Application configuration, loaded from environment variables.

use anyhow::{anyhow, Result};
use std::env;

pub struct AppConfig {
    pub bot_token: String,
    pub gateway_api_key: String,
    pub gateway_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL, used to build poster media links.
    pub public_base_url: String,
    pub media_dir: String,
    pub log_file: String,
    /// Optional Telegram Bot API base URL override (mock servers in tests).
    pub telegram_api_url: Option<String>,
}

impl AppConfig {
    /// Loads configuration from the environment. A token passed on the
    /// command line takes precedence over `BOT_TOKEN`.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow!("BOT_TOKEN not set"))?,
        };
        let gateway_api_key =
            env::var("AI_GATEWAY_API_KEY").map_err(|_| anyhow!("AI_GATEWAY_API_KEY not set"))?;
        let gateway_base_url = env::var("AI_GATEWAY_BASE_URL")
            .unwrap_or_else(|_| ai_gateway_client::DEFAULT_BASE_URL.to_string());
        let text_model = env::var("TEXT_MODEL")
            .unwrap_or_else(|_| ai_gateway_client::DEFAULT_TEXT_MODEL.to_string());
        let image_model = env::var("IMAGE_MODEL")
            .unwrap_or_else(|_| ai_gateway_client::DEFAULT_IMAGE_MODEL.to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./telepost.db".to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));
        let media_dir = env::var("MEDIA_DIR").unwrap_or_else(|_| "./media".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/telepost.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL").ok();

        Ok(Self {
            bot_token,
            gateway_api_key,
            gateway_base_url,
            text_model,
            image_model,
            database_url,
            host,
            port,
            public_base_url,
            media_dir,
            log_file,
            telegram_api_url,
        })
    }
}
