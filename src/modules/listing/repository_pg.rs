use uuid::Uuid;
use validator::Validate;

use crate::{
    api::error,
    modules::listing::{
        model::{ListingPatch, NewListing},
        repository::{ensure_owner, ListingRepository},
        schema::{Listing, ListingRow},
    },
};

#[derive(Clone)]
pub struct ListingRepositoryPg {
    pool: sqlx::PgPool,
}

impl ListingRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Locks the row for the rest of `tx` and checks who owns it.
    async fn lock_owned(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: &Uuid,
        owner_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let row_owner: Option<Uuid> =
            sqlx::query_scalar("SELECT owner_id FROM room_listings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        let row_owner =
            row_owner.ok_or_else(|| error::SystemError::not_found("Listing not found"))?;
        ensure_owner(&row_owner, owner_id)
    }
}

#[async_trait::async_trait]
impl ListingRepository for ListingRepositoryPg {
    async fn create(
        &self,
        owner_id: &Uuid,
        listing: &NewListing,
    ) -> Result<Listing, error::SystemError> {
        listing.validate()?;

        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            INSERT INTO room_listings (
                id, owner_id, title, location, price, property_type, tenant_type,
                owner_type, contact_number, images, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&listing.title)
        .bind(&listing.location)
        .bind(listing.price)
        .bind(listing.property_type.as_str())
        .bind(listing.tenant_type.as_str())
        .bind(listing.owner_type.as_str())
        .bind(&listing.contact_number)
        .bind(&listing.images)
        .bind(&listing.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(listing_id = %id, owner_id = %owner_id, "Listing created");
        Listing::try_from(row)
    }

    async fn update(
        &self,
        id: &Uuid,
        owner_id: &Uuid,
        patch: &ListingPatch,
    ) -> Result<Listing, error::SystemError> {
        patch.validate()?;

        let mut tx = self.pool.begin().await?;
        Self::lock_owned(&mut tx, id, owner_id).await?;

        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            UPDATE room_listings
            SET
                title          = COALESCE($3, title),
                location       = COALESCE($4, location),
                price          = COALESCE($5, price),
                property_type  = COALESCE($6, property_type),
                tenant_type    = COALESCE($7, tenant_type),
                owner_type     = COALESCE($8, owner_type),
                contact_number = COALESCE($9, contact_number),
                images         = COALESCE($10, images),
                description    = CASE WHEN $11::boolean THEN $12 ELSE description END,
                updated_at     = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(patch.title.as_deref()) // $3
        .bind(patch.location.as_deref()) // $4
        .bind(patch.price) // $5
        .bind(patch.property_type.map(|t| t.as_str())) // $6
        .bind(patch.tenant_type.map(|t| t.as_str())) // $7
        .bind(patch.owner_type.map(|t| t.as_str())) // $8
        .bind(patch.contact_number.as_deref()) // $9
        .bind(patch.images.as_deref()) // $10: replaces the whole array
        .bind(patch.description.is_some()) // $11: was description provided?
        .bind(patch.description.as_ref().and_then(|v| v.as_deref())) // $12
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(listing_id = %id, owner_id = %owner_id, "Listing updated");
        Listing::try_from(row)
    }

    async fn delete(&self, id: &Uuid, owner_id: &Uuid) -> Result<(), error::SystemError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_owned(&mut tx, id, owner_id).await?;

        sqlx::query("DELETE FROM room_listings WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(listing_id = %id, owner_id = %owner_id, "Listing deleted");
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Listing>, error::SystemError> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT * FROM room_listings
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Listing::try_from).collect()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Listing, error::SystemError> {
        let row = sqlx::query_as::<_, ListingRow>("SELECT * FROM room_listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Listing not found"))?;

        Listing::try_from(row)
    }
}
