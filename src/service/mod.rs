//! Service layer: load the aggregate, change it in memory, write it back whole
use crate::error::{Result, ServiceError};
use crate::model::Request;
use crate::repository::RequestRepository;

mod attachments;
mod reasons;
mod requests;

pub use attachments::{AttachmentsService, DOWNLOAD_PLACEHOLDER};
pub use reasons::ReasonsService;
pub use requests::RequestsService;

/// Loads a request or reports it missing. Every operation starts here.
fn load_request<R: RequestRepository + ?Sized>(
    repository: &R,
    request_id: &str,
) -> Result<Request> {
    match repository.find_by_id(request_id)? {
        Some(request) => Ok(request),
        None => {
            tracing::warn!(request_id, "Request not found");
            Err(ServiceError::RequestNotFound(request_id.to_string()))
        }
    }
}
