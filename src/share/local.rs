use super::ShareService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;

const SHAREABLE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Shares by exporting the file into a user-visible directory.
pub struct LocalShareClient {
    share_dir: PathBuf,
}

impl LocalShareClient {
    pub fn new(share_dir: PathBuf) -> Self {
        Self { share_dir }
    }
}

#[async_trait]
impl ShareService for LocalShareClient {
    fn can_share(&self, media_type: &str) -> bool {
        SHAREABLE_TYPES.contains(&media_type)
    }

    async fn share(
        &self,
        file_name: &str,
        data: &[u8],
        media_type: &str,
        title: &str,
        text: &str,
    ) -> Result<()> {
        tokio::fs::create_dir_all(&self.share_dir).await?;

        let target = self.share_dir.join(file_name);
        tokio::fs::write(&target, data).await.map_err(|e| {
            Error::Generic(format!("Failed to share to {}: {}", target.display(), e))
        })?;

        tracing::info!(
            "Shared {} ({}, {} bytes) as \"{}\" - {}",
            target.display(),
            media_type,
            data.len(),
            title,
            text
        );
        Ok(())
    }
}
