use std::sync::Arc;

use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::api::error;
use crate::modules::media::{
    model::{PendingFile, UploadConfig},
    storage::BlobStore,
};

const TOKEN_LEN: usize = 8;

/// Uploads listing photographs into a per-owner namespace of the blob store.
#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn BlobStore + Send + Sync>,
    config: UploadConfig,
}

impl MediaService {
    pub fn new(storage: Arc<dyn BlobStore + Send + Sync>, config: UploadConfig) -> Self {
        Self { storage, config }
    }

    pub fn with_defaults(storage: Arc<dyn BlobStore + Send + Sync>) -> Self {
        Self::new(storage, UploadConfig::default())
    }

    /// Validate file type and size
    pub fn validate_file(&self, file: &PendingFile) -> Result<(), error::SystemError> {
        if file.bytes.is_empty() {
            return Err(error::SystemError::bad_request(format!(
                "File '{}' is empty",
                file.file_name
            )));
        }

        if file.bytes.len() > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File '{}' exceeds maximum allowed size of {} bytes",
                file.file_name, self.config.max_file_size
            )));
        }

        let mime_type = file.mime_type();
        if !self.config.allowed_mime_types.contains(&mime_type) {
            return Err(error::SystemError::bad_request(format!(
                "File type '{}' is not allowed",
                mime_type
            )));
        }

        Ok(())
    }

    /// `{owner}/{unix millis}_{random token}[.ext]`
    fn generate_object_name(&self, owner_id: &Uuid, file: &PendingFile) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();

        match file.extension() {
            Some(ext) => format!("{owner_id}/{millis}_{token}.{ext}"),
            None => format!("{owner_id}/{millis}_{token}"),
        }
    }

    /// Stores one file and returns its public URL.
    pub async fn upload(
        &self,
        owner_id: &Uuid,
        file: &PendingFile,
    ) -> Result<String, error::SystemError> {
        self.validate_file(file)?;

        let name = self.generate_object_name(owner_id, file);
        self.storage.put(&name, &file.bytes, &file.mime_type()).await?;

        tracing::info!(owner_id = %owner_id, object = %name, "Image uploaded");
        Ok(self.storage.public_url(&name))
    }

    /// Uploads `files` one after another; URLs come back in input order.
    ///
    /// Stops at the first failure. Objects stored before it stay in the blob
    /// store and are reported as orphaned in the `UploadFailure`.
    pub async fn upload_all(
        &self,
        owner_id: &Uuid,
        files: &[PendingFile],
    ) -> Result<Vec<String>, error::SystemError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let mut urls = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            match self.upload(owner_id, file).await {
                Ok(url) => urls.push(url),
                Err(source) => {
                    let remaining = files.len() - index;
                    tracing::warn!(
                        owner_id = %owner_id,
                        remaining,
                        orphaned = ?urls,
                        error = %source,
                        "Image upload failed part-way"
                    );
                    return Err(error::SystemError::UploadFailure {
                        remaining,
                        orphaned: urls,
                        source: Box::new(source),
                    });
                }
            }
        }

        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{jpeg, RecordingStore};

    #[tokio::test]
    async fn upload_all_of_nothing_touches_no_store() {
        let store = Arc::new(RecordingStore::default());
        let media = MediaService::with_defaults(store.clone());

        let urls = media.upload_all(&Uuid::now_v7(), &[]).await.unwrap();

        assert!(urls.is_empty());
        assert_eq!(store.put_calls(), 0);
    }

    #[tokio::test]
    async fn names_are_owner_scoped_unique_and_keep_extension() {
        let store = Arc::new(RecordingStore::default());
        let media = MediaService::with_defaults(store.clone());
        let owner = Uuid::now_v7();

        media.upload_all(&owner, &[jpeg("a.JPG"), jpeg("a.JPG")]).await.unwrap();

        let names = store.names();
        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
        for name in &names {
            assert!(name.starts_with(&format!("{owner}/")));
            assert!(name.ends_with(".jpg"));
        }
    }

    #[tokio::test]
    async fn upload_all_preserves_selection_order() {
        let store = Arc::new(RecordingStore::default());
        let media = MediaService::with_defaults(store.clone());
        let files = [jpeg("1.jpg"), jpeg("2.png"), jpeg("3.webp")];

        let urls = media.upload_all(&Uuid::now_v7(), &files).await.unwrap();

        let expected: Vec<String> =
            store.names().iter().map(|name| store.public_url(name)).collect();
        assert_eq!(urls, expected);
        assert!(urls[1].ends_with(".png"));
    }

    #[tokio::test]
    async fn failure_reports_remaining_and_orphans() {
        let store = Arc::new(RecordingStore::failing_after(2));
        let media = MediaService::with_defaults(store.clone());
        let files = [jpeg("1.jpg"), jpeg("2.jpg"), jpeg("3.jpg"), jpeg("4.jpg")];

        let err = media.upload_all(&Uuid::now_v7(), &files).await.unwrap_err();

        match err {
            error::SystemError::UploadFailure { remaining, orphaned, .. } => {
                assert_eq!(remaining, 2);
                assert_eq!(orphaned.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.names().len(), 2);
    }

    #[tokio::test]
    async fn rejects_non_images_and_oversize_files() {
        let store = Arc::new(RecordingStore::default());
        let media = MediaService::new(
            store.clone(),
            UploadConfig { max_file_size: 4, ..UploadConfig::default() },
        );
        let owner = Uuid::now_v7();

        let pdf = PendingFile::new("lease.pdf", vec![1, 2, 3]);
        assert!(matches!(media.upload(&owner, &pdf).await, Err(error::SystemError::Validation(_))));

        let big = PendingFile::new("big.jpg", vec![0; 5]);
        assert!(matches!(media.upload(&owner, &big).await, Err(error::SystemError::Validation(_))));

        let empty = PendingFile::new("empty.jpg", vec![]);
        assert!(media.validate_file(&empty).is_err());
        assert_eq!(store.put_calls(), 0);
    }
}
