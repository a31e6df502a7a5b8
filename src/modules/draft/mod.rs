pub mod controller;
pub mod model;

pub use controller::DraftController;
pub use model::{Draft, DraftState, ListingForm};
