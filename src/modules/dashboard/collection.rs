use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::api::error;
use crate::modules::{
    draft::controller::DraftController,
    listing::{repository::ListingRepository, schema::Listing},
    session::provider::SessionProvider,
};

/// Cached view of the signed-in owner's listings.
///
/// Readers get an immutable snapshot; `refresh` builds a complete new list
/// before swapping it in, so no reader sees a half-updated cache.
pub struct ListingCollection {
    repo: Arc<dyn ListingRepository + Send + Sync>,
    cache: RwLock<Arc<Vec<Listing>>>,
    refresh_lock: Mutex<()>,
}

impl ListingCollection {
    pub fn new(repo: Arc<dyn ListingRepository + Send + Sync>) -> Self {
        Self { repo, cache: RwLock::new(Arc::new(Vec::new())), refresh_lock: Mutex::new(()) }
    }

    pub async fn listings(&self) -> Arc<Vec<Listing>> {
        self.cache.read().await.clone()
    }

    pub async fn refresh(
        &self,
        session: &dyn SessionProvider,
    ) -> Result<Arc<Vec<Listing>>, error::SystemError> {
        let owner_id = session
            .current_identity()
            .ok_or_else(|| error::SystemError::unauthenticated("Please login to continue"))?;

        let _writer = self.refresh_lock.lock().await;
        let listings = Arc::new(self.repo.list_by_owner(&owner_id).await?);
        *self.cache.write().await = listings.clone();

        tracing::debug!(owner_id = %owner_id, count = listings.len(), "Listings refreshed");
        Ok(listings)
    }

    /// Deletes through the draft controller, then reloads the cache.
    pub async fn delete_one(
        &self,
        drafts: &DraftController,
        id: &Uuid,
        session: &dyn SessionProvider,
    ) -> Result<Arc<Vec<Listing>>, error::SystemError> {
        drafts.delete(id, session).await?;
        tracing::info!(listing_id = %id, "Listing removed from dashboard");
        self.refresh(session).await
    }

    pub async fn sign_out(&self, session: &mut dyn SessionProvider) {
        let _writer = self.refresh_lock.lock().await;
        *self.cache.write().await = Arc::new(Vec::new());
        session.sign_out();
    }
}
