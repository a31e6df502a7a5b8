use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::listing::schema::{OwnerType, PropertyType, TenantType};

/// Listing attributes accepted on create. Carries no `owner_id`:
/// the repository takes the owner from the caller's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewListing {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i64,
    pub property_type: PropertyType,
    pub tenant_type: TenantType,
    pub owner_type: OwnerType,
    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: String,
    #[validate(length(max = 10, message = "Maximum 10 images allowed"))]
    pub images: Vec<String>,
    pub description: Option<String>,
}

/// Partial update. `None` leaves a column alone; `images` replaces the whole
/// array when present; `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ListingPatch {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: Option<String>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: Option<i64>,
    pub property_type: Option<PropertyType>,
    pub tenant_type: Option<TenantType>,
    pub owner_type: Option<OwnerType>,
    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: Option<String>,
    #[validate(length(max = 10, message = "Maximum 10 images allowed"))]
    pub images: Option<Vec<String>>,
    pub description: Option<Option<String>>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        *self == ListingPatch::default()
    }
}

impl From<NewListing> for ListingPatch {
    fn from(listing: NewListing) -> Self {
        ListingPatch {
            title: Some(listing.title),
            location: Some(listing.location),
            price: Some(listing.price),
            property_type: Some(listing.property_type),
            tenant_type: Some(listing.tenant_type),
            owner_type: Some(listing.owner_type),
            contact_number: Some(listing.contact_number),
            images: Some(listing.images),
            description: Some(listing.description),
        }
    }
}
