use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::error,
    modules::listing::{
        model::{ListingPatch, NewListing},
        repository::{ensure_owner, ListingRepository},
        schema::Listing,
    },
};

/// In-process listing store with the same contract as the Postgres one.
/// Rows are kept in insertion order.
#[derive(Default)]
pub struct ListingRepositoryMemory {
    rows: RwLock<Vec<Listing>>,
}

impl ListingRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed row as-is, bypassing validation.
    pub async fn seed(&self, listing: Listing) {
        self.rows.write().await.push(listing);
    }

    fn position(rows: &[Listing], id: &Uuid) -> Result<usize, error::SystemError> {
        rows.iter()
            .position(|row| row.id == *id)
            .ok_or_else(|| error::SystemError::not_found("Listing not found"))
    }
}

#[async_trait::async_trait]
impl ListingRepository for ListingRepositoryMemory {
    async fn create(
        &self,
        owner_id: &Uuid,
        listing: &NewListing,
    ) -> Result<Listing, error::SystemError> {
        listing.validate()?;

        let now = chrono::Utc::now();
        let row = Listing {
            id: Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)),
            owner_id: *owner_id,
            title: listing.title.clone(),
            location: listing.location.clone(),
            price: listing.price,
            property_type: listing.property_type,
            tenant_type: listing.tenant_type,
            owner_type: listing.owner_type,
            contact_number: listing.contact_number.clone(),
            images: listing.images.clone(),
            description: listing.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: &Uuid,
        owner_id: &Uuid,
        patch: &ListingPatch,
    ) -> Result<Listing, error::SystemError> {
        patch.validate()?;

        let mut rows = self.rows.write().await;
        let index = Self::position(&rows, id)?;
        let row = &mut rows[index];
        ensure_owner(&row.owner_id, owner_id)?;

        if let Some(title) = &patch.title {
            row.title = title.clone();
        }
        if let Some(location) = &patch.location {
            row.location = location.clone();
        }
        if let Some(price) = patch.price {
            row.price = price;
        }
        if let Some(property_type) = patch.property_type {
            row.property_type = property_type;
        }
        if let Some(tenant_type) = patch.tenant_type {
            row.tenant_type = tenant_type;
        }
        if let Some(owner_type) = patch.owner_type {
            row.owner_type = owner_type;
        }
        if let Some(contact_number) = &patch.contact_number {
            row.contact_number = contact_number.clone();
        }
        if let Some(images) = &patch.images {
            row.images = images.clone();
        }
        if let Some(description) = &patch.description {
            row.description = description.clone();
        }
        row.updated_at = chrono::Utc::now();

        Ok(row.clone())
    }

    async fn delete(&self, id: &Uuid, owner_id: &Uuid) -> Result<(), error::SystemError> {
        let mut rows = self.rows.write().await;
        let index = Self::position(&rows, id)?;
        ensure_owner(&rows[index].owner_id, owner_id)?;
        rows.remove(index);
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Listing>, error::SystemError> {
        let rows = self.rows.read().await;
        let mut owned: Vec<Listing> =
            rows.iter().rev().filter(|row| row.owner_id == *owner_id).cloned().collect();
        // Stable sort: equal timestamps stay newest-inserted first.
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Listing, error::SystemError> {
        let rows = self.rows.read().await;
        let index = Self::position(&rows, id)?;
        Ok(rows[index].clone())
    }
}
