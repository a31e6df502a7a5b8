use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::{api::error, modules::media::storage::BlobStore};

/// Stores objects as files under `{root}/{bucket}/` and serves them from
/// `{base_url}/{bucket}/`. Meant for local development.
#[derive(Debug, Clone)]
pub struct StorageDisk {
    root: PathBuf,
    base_url: String,
    bucket: String,
}

impl StorageDisk {
    pub fn new(root: impl Into<PathBuf>, base_url: &str, bucket: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_path(&self, name: &str) -> Result<PathBuf, error::SystemError> {
        let relative = Path::new(name);
        let escapes = relative.components().any(|c| !matches!(c, std::path::Component::Normal(_)));
        if name.is_empty() || escapes {
            return Err(error::SystemError::bad_request(format!("Invalid object name '{name}'")));
        }
        Ok(self.root.join(&self.bucket).join(relative))
    }
}

#[async_trait::async_trait]
impl BlobStore for StorageDisk {
    async fn put(
        &self,
        name: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), error::SystemError> {
        let path = self.object_path(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // create_new: an existing object is never replaced
        let mut file = tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;

        tracing::debug!(object = name, path = %path.display(), "Object written to disk");
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, name)
    }
}
