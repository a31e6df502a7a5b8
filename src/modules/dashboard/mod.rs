pub mod collection;

pub use collection::ListingCollection;
