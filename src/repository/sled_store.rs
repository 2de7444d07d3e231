use super::{RequestRepository, ensure_id, stamp_etags};
use crate::error::StorageError;
use crate::model::Request;
use sled::Batch;
use sled::transaction::{self, ConflictableTransactionResult, TransactionError};
use std::sync::Arc;

const REQUEST_PREFIX: &str = "request/";
const COMPANY_PREFIX: &str = "company/";

/// Requests as CBOR documents in sled, indexed by company number.
pub struct SledRequestRepository {
    instance: Arc<sled::Db>,
}

impl SledRequestRepository {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    fn request_key(id: &str) -> String {
        format!("{REQUEST_PREFIX}{id}")
    }

    fn company_prefix(company_number: &str) -> String {
        format!("{COMPANY_PREFIX}{company_number}/")
    }

    fn load(&self, id: &str) -> Result<Option<Request>, StorageError> {
        match self.instance.get(Self::request_key(id))? {
            Some(bytes) => Ok(Some(minicbor::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn index_key(request: &Request, id: &str) -> String {
        format!("{}{id}", Self::company_prefix(request.company_number()))
    }

    // document and index entry land together or not at all
    fn write(&self, mut request: Request) -> Result<Request, StorageError> {
        let id = ensure_id(&mut request)?;
        stamp_etags(&mut request)?;

        let mut batch = Batch::default();
        batch.insert(
            Self::request_key(&id).as_bytes(),
            minicbor::to_vec(&request)?,
        );
        batch.insert(Self::index_key(&request, &id).as_bytes(), Vec::<u8>::new());
        self.instance.apply_batch(batch)?;

        tracing::debug!(request_id = %id, reasons = request.reasons().len(), "Wrote request");

        Ok(request)
    }

    // existence check and both writes happen in one transaction, so of two
    // racing inserts with the same id exactly one wins
    fn write_new(&self, mut request: Request) -> Result<Request, StorageError> {
        let id = ensure_id(&mut request)?;
        stamp_etags(&mut request)?;

        let request_key = Self::request_key(&id);
        let index_key = Self::index_key(&request, &id);
        let document = minicbor::to_vec(&request)?;

        self.instance
            .transaction(|tx| -> ConflictableTransactionResult<(), StorageError> {
                if tx.get(request_key.as_bytes())?.is_some() {
                    return transaction::abort(StorageError::DuplicateId(id.clone()));
                }
                tx.insert(request_key.as_bytes(), document.clone())?;
                tx.insert(index_key.as_bytes(), Vec::<u8>::new())?;
                Ok(())
            })
            .map_err(|err| match err {
                TransactionError::Abort(err) => err,
                TransactionError::Storage(err) => StorageError::Sled(err),
            })?;

        tracing::debug!(request_id = %id, "Inserted request");

        Ok(request)
    }
}

impl RequestRepository for SledRequestRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Request>, StorageError> {
        self.load(id)
    }

    fn insert(&self, request: Request) -> Result<Request, StorageError> {
        self.write_new(request)
    }

    fn save(&self, request: Request) -> Result<Request, StorageError> {
        self.write(request)
    }

    fn find_all_by_company_number(
        &self,
        company_number: &str,
    ) -> Result<Vec<Request>, StorageError> {
        let prefix = Self::company_prefix(company_number);
        let mut requests = vec![];

        for entry in self.instance.scan_prefix(prefix.as_bytes()) {
            let (key, _) = entry?;
            let id = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
            if let Some(request) = self.load(&id)? {
                requests.push(request);
            }
        }

        Ok(requests)
    }
}
