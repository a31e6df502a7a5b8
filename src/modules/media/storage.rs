use crate::api::error;

/// Named-object blob store. Names are `/`-separated paths inside one bucket.
#[async_trait::async_trait]
pub trait BlobStore {
    /// Durably writes `bytes` under `name`. Must not overwrite an existing object.
    async fn put(
        &self,
        name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), error::SystemError>;

    /// Stable public URL of `name`. Does not check that the object exists.
    fn public_url(&self, name: &str) -> String;
}
