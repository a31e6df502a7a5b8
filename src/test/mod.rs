#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use uuid::Uuid;

use crate::api::error;
use crate::modules::{
    listing::{
        model::{ListingPatch, NewListing},
        repository::ListingRepository,
        repository_memory::ListingRepositoryMemory,
        schema::{Listing, OwnerType, PropertyType, TenantType},
    },
    media::{model::PendingFile, storage::BlobStore},
};


pub fn jpeg(name: &str) -> PendingFile {
    PendingFile::new(name, vec![0xFF, 0xD8, 0xFF, 0xE0])
}

pub fn listing_input() -> NewListing {
    NewListing {
        title: "Room A".into(),
        location: "Sector 15".into(),
        price: 12000,
        property_type: PropertyType::OneBhk,
        tenant_type: TenantType::Bachelor,
        owner_type: OwnerType::DirectOwner,
        contact_number: "+911234567890".into(),
        images: vec![],
        description: None,
    }
}

/// Blob store that keeps object names in memory and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    names: Mutex<Vec<String>>,
    put_calls: AtomicUsize,
    fail_after: Option<usize>,
}

impl RecordingStore {
    /// Accepts `n` objects, then rejects every further put.
    pub fn failing_after(n: usize) -> Self {
        Self { fail_after: Some(n), ..Self::default() }
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl BlobStore for RecordingStore {
    async fn put(
        &self,
        name: &str,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), error::SystemError> {
        let call = self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|n| call >= n) {
            return Err(error::SystemError::Storage {
                status: 503,
                message: "store unavailable".into(),
            });
        }
        self.names.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!("https://cdn.test/room-images/{name}")
    }
}

/// Blob store whose uploads never complete.
pub struct StallingStore;

#[async_trait::async_trait]
impl BlobStore for StallingStore {
    async fn put(
        &self,
        _name: &str,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<(), error::SystemError> {
        std::future::pending().await
    }

    fn public_url(&self, name: &str) -> String {
        format!("https://cdn.test/room-images/{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RepoCall {
    Create { owner_id: Uuid, listing: NewListing },
    Update { id: Uuid, owner_id: Uuid, patch: ListingPatch },
    Delete { id: Uuid, owner_id: Uuid },
    ListByOwner { owner_id: Uuid },
    FindById { id: Uuid },
}

/// Memory repository that records every call and can fail writes on demand.
#[derive(Default)]
pub struct CountingRepository {
    pub inner: ListingRepositoryMemory,
    calls: Mutex<Vec<RepoCall>>,
    fail_writes: AtomicBool,
}

impl CountingRepository {
    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: RepoCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_writable(&self) -> Result<(), error::SystemError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(error::SystemError::DatabaseError("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ListingRepository for CountingRepository {
    async fn create(
        &self,
        owner_id: &Uuid,
        listing: &NewListing,
    ) -> Result<Listing, error::SystemError> {
        self.record(RepoCall::Create { owner_id: *owner_id, listing: listing.clone() });
        self.check_writable()?;
        self.inner.create(owner_id, listing).await
    }

    async fn update(
        &self,
        id: &Uuid,
        owner_id: &Uuid,
        patch: &ListingPatch,
    ) -> Result<Listing, error::SystemError> {
        self.record(RepoCall::Update { id: *id, owner_id: *owner_id, patch: patch.clone() });
        self.check_writable()?;
        self.inner.update(id, owner_id, patch).await
    }

    async fn delete(&self, id: &Uuid, owner_id: &Uuid) -> Result<(), error::SystemError> {
        self.record(RepoCall::Delete { id: *id, owner_id: *owner_id });
        self.check_writable()?;
        self.inner.delete(id, owner_id).await
    }

    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Listing>, error::SystemError> {
        self.record(RepoCall::ListByOwner { owner_id: *owner_id });
        self.inner.list_by_owner(owner_id).await
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Listing, error::SystemError> {
        self.record(RepoCall::FindById { id: *id });
        self.inner.find_by_id(id).await
    }
}
