//! Edit session for one room listing.
//!
//! `save` turns the draft into store writes:
//!
//! 1. validate the form locally (no remote calls on failure)
//! 2. resolve the owner from the session
//! 3. upload pending photographs
//! 4. write `existing ++ uploaded` through the repository (create or update)
//!
//! Any failure after step 1 leaves the draft exactly as it was and puts the
//! controller back into `Editing`, so `save` can simply be called again. The
//! same holds when the `save` future is dropped before it completes.
use std::sync::Arc;

use uuid::Uuid;

use crate::api::error;
use crate::constants::MAX_LISTING_IMAGES;
use crate::modules::{
    draft::model::{Draft, DraftState, ListingForm},
    listing::{
        model::ListingPatch,
        repository::{ensure_owner, ListingRepository},
        schema::Listing,
    },
    media::{model::PendingFile, service::MediaService},
    session::provider::SessionProvider,
};

/// Row being edited: its id and the owner it was loaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EditTarget {
    id: Uuid,
    owner_id: Uuid,
}

pub struct DraftController {
    repo: Arc<dyn ListingRepository + Send + Sync>,
    media: Arc<MediaService>,
    state: DraftState,
    draft: Draft,
    target: Option<EditTarget>,
}

impl DraftController {
    pub fn with_dependencies(
        repo: Arc<dyn ListingRepository + Send + Sync>,
        media: Arc<MediaService>,
    ) -> Self {
        DraftController {
            repo,
            media,
            state: DraftState::Empty,
            draft: Draft::default(),
            target: None,
        }
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Id of the listing being edited; `None` for a new listing.
    pub fn listing_id(&self) -> Option<Uuid> {
        self.target.map(|t| t.id)
    }

    fn ensure_editing(&self) -> Result<(), error::SystemError> {
        match self.state {
            DraftState::Editing => Ok(()),
            other => Err(error::SystemError::invalid_state(format!(
                "Draft is not editable in state {other:?}"
            ))),
        }
    }

    /// Form fields for input handlers. Only available while editing.
    pub fn form_mut(&mut self) -> Result<&mut ListingForm, error::SystemError> {
        self.ensure_editing()?;
        Ok(&mut self.draft.form)
    }

    pub fn init_new(&mut self) {
        self.draft = Draft::default();
        self.target = None;
        self.state = DraftState::Editing;
    }

    pub fn init_from_listing(&mut self, listing: &Listing) {
        self.draft = Draft::from_listing(listing);
        self.target = Some(EditTarget { id: listing.id, owner_id: listing.owner_id });
        self.state = DraftState::Editing;
    }

    /// Fetches a listing for editing. Only its owner may open it.
    pub async fn load(
        &mut self,
        id: &Uuid,
        session: &dyn SessionProvider,
    ) -> Result<(), error::SystemError> {
        let owner_id = session
            .current_identity()
            .ok_or_else(|| error::SystemError::unauthenticated("Please login to continue"))?;

        let listing = self.repo.find_by_id(id).await?;
        ensure_owner(&listing.owner_id, &owner_id)?;

        self.init_from_listing(&listing);
        tracing::debug!(listing_id = %id, images = listing.images.len(), "Draft loaded");
        Ok(())
    }

    /// Drops the session without persisting anything.
    pub fn discard(&mut self) {
        self.draft = Draft::default();
        self.target = None;
        self.state = DraftState::Empty;
    }

    pub fn add_files(&mut self, files: Vec<PendingFile>) -> Result<(), error::SystemError> {
        self.ensure_editing()?;
        for file in &files {
            self.media.validate_file(file)?;
        }
        self.draft.add_files(files)
    }

    pub fn remove_pending_file(&mut self, index: usize) -> Option<PendingFile> {
        if self.state != DraftState::Editing {
            return None;
        }
        self.draft.remove_pending_file(index)
    }

    pub fn remove_existing_image(&mut self, index: usize) -> Option<String> {
        if self.state != DraftState::Editing {
            return None;
        }
        self.draft.remove_existing_image(index)
    }

    pub async fn save(
        &mut self,
        session: &dyn SessionProvider,
    ) -> Result<Listing, error::SystemError> {
        self.ensure_editing()?;
        self.draft.form.validate()?;
        if self.draft.total_images() > MAX_LISTING_IMAGES {
            return Err(error::SystemError::TooManyImages {
                limit: MAX_LISTING_IMAGES,
                attempted: self.draft.total_images(),
            });
        }

        let saving = SaveInProgress::begin(&mut self.state);
        let outcome = persist(
            self.repo.as_ref(),
            &self.media,
            &self.draft,
            self.target,
            session,
        )
        .await;
        match outcome {
            Ok(listing) => {
                saving.finish(DraftState::Saved);
                tracing::info!(
                    listing_id = %listing.id,
                    images = listing.images.len(),
                    "Listing saved"
                );
                Ok(listing)
            }
            Err(err) => {
                drop(saving);
                tracing::warn!(error = %err, orphaned = ?err.orphaned(), "Listing save failed");
                Err(err)
            }
        }
    }

    /// Deletes a listing of the signed-in owner. Independent of the draft.
    pub async fn delete(
        &self,
        id: &Uuid,
        session: &dyn SessionProvider,
    ) -> Result<(), error::SystemError> {
        let owner_id = session
            .current_identity()
            .ok_or_else(|| error::SystemError::unauthenticated("Please login to continue"))?;

        self.repo.delete(id, &owner_id).await
    }
}

/// Holds the controller in `Saving`; dropping it without `finish` returns
/// to `Editing`.
struct SaveInProgress<'a> {
    state: &'a mut DraftState,
}

impl<'a> SaveInProgress<'a> {
    fn begin(state: &'a mut DraftState) -> Self {
        *state = DraftState::Saving;
        SaveInProgress { state }
    }

    fn finish(self, outcome: DraftState) {
        *self.state = outcome;
    }
}

impl Drop for SaveInProgress<'_> {
    fn drop(&mut self) {
        if *self.state == DraftState::Saving {
            *self.state = DraftState::Editing;
        }
    }
}

async fn persist(
    repo: &(dyn ListingRepository + Send + Sync),
    media: &MediaService,
    draft: &Draft,
    target: Option<EditTarget>,
    session: &dyn SessionProvider,
) -> Result<Listing, error::SystemError> {
    let owner_id = session
        .current_identity()
        .ok_or_else(|| error::SystemError::unauthenticated("Please login to continue"))?;

    if let Some(target) = &target {
        ensure_owner(&target.owner_id, &owner_id)?;
    }

    let uploaded = media.upload_all(&owner_id, draft.pending_files()).await?;
    let listing = draft.form.to_new_listing(draft.merged_images(uploaded.clone()));

    let written = match &target {
        None => repo.create(&owner_id, &listing).await,
        Some(target) => repo.update(&target.id, &owner_id, &ListingPatch::from(listing)).await,
    };

    written.map_err(|err| err.after_upload(uploaded))
}
