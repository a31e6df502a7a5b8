use reqwest::{header, Client};

use crate::{api::error, modules::media::storage::BlobStore};

/// Client for an HTTP object-storage API laid out as
/// `{base}/storage/v1/object/{bucket}/{name}` with public reads under
/// `{base}/storage/v1/object/public/{bucket}/{name}`.
#[derive(Debug, Clone)]
pub struct StorageHttp {
    http_client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl StorageHttp {
    pub fn new(base_url: &str, api_key: &str, bucket: &str) -> Self {
        Self::with_client(Client::new(), base_url, api_key, bucket)
    }

    pub fn with_client(http_client: Client, base_url: &str, api_key: &str, bucket: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, name)
    }
}

#[async_trait::async_trait]
impl BlobStore for StorageHttp {
    async fn put(
        &self,
        name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), error::SystemError> {
        let response = self
            .http_client
            .post(self.object_url(name))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(object = name, status = status.as_u16(), "Object upload rejected");
            return Err(error::SystemError::Storage { status: status.as_u16(), message });
        }

        tracing::debug!(object = name, size = bytes.len(), "Object stored");
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, self.bucket, name)
    }
}
