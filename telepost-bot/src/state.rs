//! Shared application state for HTTP handlers.

use std::path::PathBuf;
use std::sync::Arc;

use telegram_client::TelegramClient;
use telepost_core::LifecycleEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LifecycleEngine>,
    pub telegram: Arc<TelegramClient>,
    /// Where FsPosterStore writes poster files; served under /media.
    pub media_dir: PathBuf,
}
