//! Shared fixtures for the integration tests
#![allow(dead_code)]

use extension_requests::StorageError;
use extension_requests::files::{AttachmentStore, FileUpload, StoredFile};
use extension_requests::model::{CreatedBy, Request, TimeStamp};
use extension_requests::repository::{MemoryRequestRepository, RequestRepository};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const COMPANY_NUMBER: &str = "00006400";

pub fn created_on() -> TimeStamp<chrono::Utc> {
    TimeStamp::new_with(2019, 1, 2, 11, 38, 44)
}

pub fn dummy_request(id: &str) -> Request {
    let mut created_by = CreatedBy::new("Y2VkZWVlMzhlZWFjY2M4MzQ3MT");
    created_by.email = Some("demo@ch.gov.uk".to_string());

    Request::new(COMPANY_NUMBER, created_by, created_on()).with_id(id)
}

/// Decorator that counts calls so tests can assert how often the store was hit.
#[derive(Default)]
pub struct CountingRepository<R> {
    inner: R,
    reads: AtomicUsize,
    inserts: AtomicUsize,
    saves: AtomicUsize,
}

impl<R: RequestRepository> CountingRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
        }
    }
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
    pub fn writes(&self) -> usize {
        self.inserts() + self.saves()
    }
    /// Seeds a document without counting it.
    pub fn seed(&self, request: Request) -> Request {
        self.inner.insert(request).unwrap()
    }
    pub fn stored(&self, id: &str) -> Option<Request> {
        self.inner.find_by_id(id).unwrap()
    }
}

impl<R: RequestRepository> RequestRepository for CountingRepository<R> {
    fn find_by_id(&self, id: &str) -> Result<Option<Request>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id)
    }
    fn insert(&self, request: Request) -> Result<Request, StorageError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(request)
    }
    fn save(&self, request: Request) -> Result<Request, StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(request)
    }
    fn find_all_by_company_number(
        &self,
        company_number: &str,
    ) -> Result<Vec<Request>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all_by_company_number(company_number)
    }
}

pub type Counted = Arc<CountingRepository<MemoryRequestRepository>>;

pub fn counted() -> Counted {
    Arc::new(CountingRepository::new(MemoryRequestRepository::new()))
}

/// A store whose saves silently do nothing and hand back the old document.
#[derive(Default)]
pub struct LossyRepository {
    inner: MemoryRequestRepository,
}

impl LossyRepository {
    pub fn seeded(request: Request) -> Self {
        let repository = Self::default();
        repository.inner.insert(request).unwrap();
        repository
    }
}

impl RequestRepository for LossyRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Request>, StorageError> {
        self.inner.find_by_id(id)
    }
    fn insert(&self, request: Request) -> Result<Request, StorageError> {
        self.inner.insert(request)
    }
    fn save(&self, request: Request) -> Result<Request, StorageError> {
        let id = request.id().unwrap_or_default();
        Ok(self.inner.find_by_id(id)?.unwrap_or(request))
    }
    fn find_all_by_company_number(
        &self,
        company_number: &str,
    ) -> Result<Vec<Request>, StorageError> {
        self.inner.find_all_by_company_number(company_number)
    }
}

/// A store that can still be read but refuses every write.
#[derive(Default)]
pub struct FailingRepository {
    inner: MemoryRequestRepository,
}

impl FailingRepository {
    pub const FAILURE: &'static str = "disk full";

    pub fn seeded(request: Request) -> Self {
        let repository = Self::default();
        repository.inner.insert(request).unwrap();
        repository
    }
}

impl RequestRepository for FailingRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Request>, StorageError> {
        self.inner.find_by_id(id)
    }
    fn insert(&self, _: Request) -> Result<Request, StorageError> {
        Err(anyhow::anyhow!(Self::FAILURE).into())
    }
    fn save(&self, _: Request) -> Result<Request, StorageError> {
        Err(anyhow::anyhow!(Self::FAILURE).into())
    }
    fn find_all_by_company_number(
        &self,
        company_number: &str,
    ) -> Result<Vec<Request>, StorageError> {
        self.inner.find_all_by_company_number(company_number)
    }
}

/// Keeps uploaded bytes in memory.
#[derive(Default, Clone)]
pub struct MemoryFiles {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryFiles {
    pub fn count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl AttachmentStore for MemoryFiles {
    fn store(&self, attachment_id: &str, upload: FileUpload) -> Result<StoredFile, StorageError> {
        let size = upload.bytes.len() as u64;
        self.files
            .lock()
            .unwrap()
            .insert(attachment_id.to_string(), upload.bytes);
        Ok(StoredFile {
            name: upload.name,
            content_type: upload.content_type.unwrap_or_else(|| "text/plain".into()),
            size,
        })
    }
}

/// Generator that hands out `prefix-1`, `prefix-2`, ...
pub fn sequence_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync {
    let next = AtomicUsize::new(1);
    move || format!("{prefix}-{}", next.fetch_add(1, Ordering::SeqCst))
}
