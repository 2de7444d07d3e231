use super::{RequestRepository, ensure_id, stamp_etags};
use crate::error::StorageError;
use crate::model::Request;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-process repository with the same id and etag rules as the sled one.
#[derive(Debug, Default)]
pub struct MemoryRequestRepository {
    documents: RwLock<BTreeMap<String, Request>>,
}

impl MemoryRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Request>> {
        // a panic while holding the lock cannot leave a half written document
        self.documents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Request>> {
        self.documents
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn put(&self, mut request: Request, must_be_new: bool) -> Result<Request, StorageError> {
        let id = ensure_id(&mut request)?;
        let mut documents = self.write();
        if must_be_new && documents.contains_key(&id) {
            return Err(StorageError::DuplicateId(id));
        }
        stamp_etags(&mut request)?;
        documents.insert(id, request.clone());
        Ok(request)
    }
}

impl RequestRepository for MemoryRequestRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Request>, StorageError> {
        Ok(self.read().get(id).cloned())
    }

    fn insert(&self, request: Request) -> Result<Request, StorageError> {
        self.put(request, true)
    }

    fn save(&self, request: Request) -> Result<Request, StorageError> {
        self.put(request, false)
    }

    fn find_all_by_company_number(
        &self,
        company_number: &str,
    ) -> Result<Vec<Request>, StorageError> {
        Ok(self
            .read()
            .values()
            .filter(|request| request.company_number() == company_number)
            .cloned()
            .collect())
    }
}
