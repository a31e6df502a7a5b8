use uuid::Uuid;

use crate::{
    api::error,
    modules::listing::{
        model::{ListingPatch, NewListing},
        schema::Listing,
    },
};

#[async_trait::async_trait]
pub trait ListingRepository {
    /// Inserts a listing owned by `owner_id`.
    async fn create(
        &self,
        owner_id: &Uuid,
        listing: &NewListing,
    ) -> Result<Listing, error::SystemError>;

    /// Merges `patch` over the row. `NotFound` when `id` is unknown,
    /// `Forbidden` when the row belongs to another owner.
    async fn update(
        &self,
        id: &Uuid,
        owner_id: &Uuid,
        patch: &ListingPatch,
    ) -> Result<Listing, error::SystemError>;

    /// Same ownership rules as `update`; deleting a missing row is an error.
    async fn delete(&self, id: &Uuid, owner_id: &Uuid) -> Result<(), error::SystemError>;

    /// Newest first.
    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Listing>, error::SystemError>;

    /// Unscoped read.
    async fn find_by_id(&self, id: &Uuid) -> Result<Listing, error::SystemError>;
}

/// Shared ownership gate for mutating operations.
pub fn ensure_owner(row_owner: &Uuid, caller: &Uuid) -> Result<(), error::SystemError> {
    if row_owner != caller {
        return Err(error::SystemError::forbidden(
            "You don't have permission to modify this listing",
        ));
    }
    Ok(())
}
