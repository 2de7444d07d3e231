//! Persistence port for the request aggregate.
//!
//! The aggregate is the unit of persistence: a request is always written
//! whole, reasons and attachments included. Writes return the durable
//! representation, including the id and etags the store assigns, so callers
//! can find what they just added without reading again.
use crate::error::StorageError;
use crate::model::Request;
use crate::utils::{REQUEST_ID_HRP, new_uuid_to_bech32};

mod memory;
mod sled_store;

pub use memory::MemoryRequestRepository;
pub use sled_store::SledRequestRepository;

pub trait RequestRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Option<Request>, StorageError>;

    /// Writes a request that must not exist yet, assigning an id if it has none.
    fn insert(&self, request: Request) -> Result<Request, StorageError>;

    /// Writes the whole aggregate, replacing any stored version.
    fn save(&self, request: Request) -> Result<Request, StorageError>;

    fn find_all_by_company_number(
        &self,
        company_number: &str,
    ) -> Result<Vec<Request>, StorageError>;
}

impl<R: RequestRepository + ?Sized> RequestRepository for std::sync::Arc<R> {
    fn find_by_id(&self, id: &str) -> Result<Option<Request>, StorageError> {
        (**self).find_by_id(id)
    }
    fn insert(&self, request: Request) -> Result<Request, StorageError> {
        (**self).insert(request)
    }
    fn save(&self, request: Request) -> Result<Request, StorageError> {
        (**self).save(request)
    }
    fn find_all_by_company_number(
        &self,
        company_number: &str,
    ) -> Result<Vec<Request>, StorageError> {
        (**self).find_all_by_company_number(company_number)
    }
}

/// Gives an unsaved request its id. Returns the id either way.
pub(crate) fn ensure_id(request: &mut Request) -> Result<String, StorageError> {
    if let Some(id) = request.id() {
        return Ok(id.to_string());
    }
    let id = new_uuid_to_bech32(REQUEST_ID_HRP)?;
    request.assign_id(id.clone());
    Ok(id)
}

/// Recomputes the etags of every reason and then of the request itself.
///
/// An etag is the sha256 of the entity's CBOR encoding with its own etag
/// cleared, so it changes whenever anything below it changes.
pub(crate) fn stamp_etags(request: &mut Request) -> Result<(), StorageError> {
    for reason in request.reasons_mut().iter_mut() {
        reason.set_etag(None);
        let etag = sha256::digest(&minicbor::to_vec(&*reason)?);
        reason.set_etag(Some(etag));
    }

    request.set_etag(None);
    let etag = sha256::digest(&minicbor::to_vec(&*request)?);
    request.set_etag(Some(etag));

    Ok(())
}
