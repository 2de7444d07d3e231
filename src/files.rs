//! Attachment file storage port and its sled adapter
use crate::error::StorageError;
use std::sync::Arc;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const FILE_PREFIX: &str = "attachment/";

/// An uploaded file as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// What the store reports back about a file it has taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

pub trait AttachmentStore: Send + Sync {
    fn store(&self, attachment_id: &str, upload: FileUpload) -> Result<StoredFile, StorageError>;
}

/// Keeps file bytes in the same sled database as the requests.
pub struct SledAttachmentStore {
    instance: Arc<sled::Db>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes,
        }
    }
}

impl SledAttachmentStore {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    pub fn load(&self, attachment_id: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let key = format!("{FILE_PREFIX}{attachment_id}");
        Ok(self.instance.get(key)?.map(|bytes| bytes.to_vec()))
    }
}

impl AttachmentStore for SledAttachmentStore {
    fn store(&self, attachment_id: &str, upload: FileUpload) -> Result<StoredFile, StorageError> {
        let size = upload.bytes.len() as u64;
        let key = format!("{FILE_PREFIX}{attachment_id}");
        self.instance.insert(key, upload.bytes)?;

        tracing::debug!(attachment_id, size, "Stored attachment file");

        Ok(StoredFile {
            name: upload.name,
            content_type: upload
                .content_type
                .filter(|content_type| !content_type.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            size,
        })
    }
}
