//! Listing and media synchronization for room-rental classifieds.
//!
//! A [`DraftController`](modules::draft::DraftController) edits one listing,
//! uploads its photographs through [`MediaService`](modules::media::MediaService)
//! and writes the record through a
//! [`ListingRepository`](modules::listing::ListingRepository). The
//! [`ListingCollection`](modules::dashboard::ListingCollection) keeps the
//! signed-in owner's listings cached for display.

pub mod api;
pub mod configs;
pub mod constants;
pub mod modules;
pub mod utils;

#[cfg(test)]
mod test;
