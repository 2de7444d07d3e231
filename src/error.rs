use std::convert::Infallible;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failures that abort an operation. Caller input problems are not errors,
/// they come back as [`crate::result::ServiceResult::Invalid`].
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("Request {0} not found")]
    RequestNotFound(String),
    #[error("Reason id {reason_id} not found in Request {request_id}")]
    ReasonNotFound {
        request_id: String,
        reason_id: String,
    },
    #[error("Reason {reason_id} not saved in database for request {request_id}")]
    ReasonNotPersisted {
        request_id: String,
        reason_id: String,
    },
    #[error(
        "Attachment {attachment_id} not saved in database for reason {reason_id} of request {request_id}"
    )]
    AttachmentNotPersisted {
        request_id: String,
        reason_id: String,
        attachment_id: String,
    },
    #[error("Generated id {id} is already in use in Request {request_id}")]
    IdInUse { request_id: String, id: String },
    #[error("{0}")]
    InvalidBuilderState(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("sled: {0}")]
    Sled(#[from] sled::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] minicbor::encode::Error<Infallible>),
    #[error("failed to decode document: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error("Request {0} already exists")]
    DuplicateId(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification used at the boundary to choose between a
/// structured rejection and an opaque internal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PersistenceInconsistency,
    InvalidBuilderState,
    Storage,
}

impl ServiceError {
    pub const LINKS_BEFORE_ID: &'static str = "Links cannot be set before ID";

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::RequestNotFound(_) | ServiceError::ReasonNotFound { .. } => {
                ErrorKind::NotFound
            }
            ServiceError::ReasonNotPersisted { .. }
            | ServiceError::AttachmentNotPersisted { .. } => ErrorKind::PersistenceInconsistency,
            ServiceError::InvalidBuilderState(_) | ServiceError::IdInUse { .. } => {
                ErrorKind::InvalidBuilderState
            }
            ServiceError::Storage(_) => ErrorKind::Storage,
        }
    }
    /// Whether the failure is the caller's to fix (a missing id) rather than ours.
    pub fn is_caller_facing(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
