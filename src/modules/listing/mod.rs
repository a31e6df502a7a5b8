pub mod model;
pub mod repository;
pub mod repository_memory;
pub mod repository_pg;
pub mod schema;

pub use model::{ListingPatch, NewListing};
pub use repository::ListingRepository;
pub use repository_memory::ListingRepositoryMemory;
pub use repository_pg::ListingRepositoryPg;
pub use schema::{Listing, OwnerType, PropertyType, TenantType};
