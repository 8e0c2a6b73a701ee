//! Filesystem poster store.
//!
//! Poster bytes land in the media directory and are served back under
//! `/media/{file}`, giving Telegram a fetchable URL for sendPhoto.

use std::path::PathBuf;

use async_trait::async_trait;
use telepost_core::{PosterStore, Result, TelepostError};
use tracing::info;
use uuid::Uuid;

pub struct FsPosterStore {
    dir: PathBuf,
    public_base_url: String,
}

impl FsPosterStore {
    /// Creates the media directory if needed.
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PosterStore for FsPosterStore {
    async fn store_poster(&self, bytes: &[u8]) -> Result<String> {
        let file_name = format!("poster-{}.png", Uuid::new_v4());
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| TelepostError::Storage(format!("failed to store poster: {}", e)))?;

        let url = format!("{}/media/{}", self.public_base_url, file_name);
        info!(path = %path.display(), url = %url, "poster stored");
        Ok(url)
    }
}
