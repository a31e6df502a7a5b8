pub mod dashboard;
pub mod draft;
pub mod listing;
pub mod media;
pub mod session;
