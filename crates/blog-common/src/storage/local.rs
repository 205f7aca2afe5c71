//! Local filesystem asset store
//!
//! Files land under `<upload_dir>/<prefix>/<uuid>.<ext>` and are served by the
//! web layer below the configured media URL.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use blog_core::{AssetKind, AssetRef, AssetStore, DomainError, NewAsset, RepoResult};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::StorageConfig;

/// Asset store writing to a local directory
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalAssetStore {
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.upload_dir, &config.media_url)
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a reference to a path inside the base directory
    fn resolve(&self, asset: &AssetRef) -> RepoResult<PathBuf> {
        let relative = Path::new(asset.as_str());
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !contained || asset.as_str().is_empty() {
            return Err(DomainError::StorageError(format!(
                "refusing asset reference outside upload dir: {asset}"
            )));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    #[instrument(skip(self, asset), fields(len = asset.bytes.len()))]
    async fn store(&self, kind: AssetKind, asset: NewAsset) -> RepoResult<AssetRef> {
        if asset.is_empty() {
            return Err(DomainError::ValidationError("Uploaded file is empty".to_string()));
        }
        // The stored extension follows the detected format, never the client's name
        let format = asset.image_format(kind)?;

        let reference = AssetRef::new(format!(
            "{}/{}.{}",
            kind.prefix(),
            Uuid::new_v4().simple(),
            format.extension()
        ));
        let path = self.resolve(&reference)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::StorageError(format!("Failed to create directory: {e}")))?;
        }
        tokio::fs::write(&path, &asset.bytes)
            .await
            .map_err(|e| DomainError::StorageError(format!("Failed to write file: {e}")))?;

        debug!(asset = %reference, "Stored asset");
        Ok(reference)
    }

    #[instrument(skip(self))]
    async fn delete(&self, asset: &AssetRef) -> RepoResult<()> {
        let path = self.resolve(asset)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(asset = %asset, "Deleted asset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::StorageError(format!("Failed to delete file: {e}"))),
        }
    }

    fn url_for(&self, asset: &AssetRef) -> String {
        format!("{}/{}", self.base_url, asset.as_str())
    }
}
