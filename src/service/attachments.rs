use super::load_request;
use crate::dto::AttachmentView;
use crate::error::{Result, ServiceError};
use crate::files::{AttachmentStore, FileUpload};
use crate::model::Attachment;
use crate::repository::RequestRepository;
use crate::result::{FieldError, ServiceResult};
use crate::utils::{IdGenerator, Uuid7Ids};

/// Returned by the download operation until downloads are supported.
pub const DOWNLOAD_PLACEHOLDER: &str = "Getting attachment";

pub struct AttachmentsService<R, S, G = Uuid7Ids> {
    repository: R,
    files: S,
    ids: G,
}

impl<R: RequestRepository, S: AttachmentStore> AttachmentsService<R, S> {
    pub fn new(repository: R, files: S) -> Self {
        Self::with_ids(repository, files, Uuid7Ids)
    }
}

impl<R: RequestRepository, S: AttachmentStore, G: IdGenerator> AttachmentsService<R, S, G> {
    pub fn with_ids(repository: R, files: S, ids: G) -> Self {
        Self {
            repository,
            files,
            ids,
        }
    }

    /// Stores `upload` and records it on the reason.
    ///
    /// `attachments_uri` is the collection the attachment is posted to; the
    /// new attachment's `self` link is `attachments_uri/<id>`.
    #[tracing::instrument(skip(self, upload), fields(file = %upload.name))]
    pub fn add_attachment(
        &self,
        request_id: &str,
        reason_id: &str,
        upload: FileUpload,
        attachments_uri: &str,
    ) -> Result<ServiceResult<AttachmentView>> {
        let mut request = load_request(&self.repository, request_id)?;

        if request.reason(reason_id).is_none() {
            tracing::warn!(request_id, reason_id, "Reason not found");
            return Err(ServiceError::ReasonNotFound {
                request_id: request_id.to_string(),
                reason_id: reason_id.to_string(),
            });
        }

        let errors = validate_upload(&upload);
        if !errors.is_empty() {
            return Ok(ServiceResult::Invalid(errors));
        }

        let attachment_id = self.ids.new_id();
        let taken = request
            .reason(reason_id)
            .is_some_and(|reason| reason.attachments().contains(&attachment_id));
        if taken {
            tracing::error!(
                request_id,
                reason_id,
                attachment_id = %attachment_id,
                "Generated attachment id is taken"
            );
            return Err(ServiceError::IdInUse {
                request_id: request_id.to_string(),
                id: attachment_id,
            });
        }

        let stored = self.files.store(&attachment_id, upload)?;
        let attachment = Attachment::new(attachment_id.clone(), stored, attachments_uri);

        if let Some(reason) = request.reason_mut(reason_id) {
            reason.add_attachment(attachment);
        }
        let saved = self.repository.save(request)?;

        let Some(persisted) = saved
            .reason(reason_id)
            .and_then(|reason| reason.attachments().get(&attachment_id))
        else {
            tracing::error!(
                request_id,
                reason_id,
                attachment_id = %attachment_id,
                "Saved request is missing the new attachment"
            );
            return Err(ServiceError::AttachmentNotPersisted {
                request_id: request_id.to_string(),
                reason_id: reason_id.to_string(),
                attachment_id,
            });
        };

        tracing::info!(request_id, reason_id, attachment_id = %attachment_id, "Attachment added");

        Ok(ServiceResult::Created(AttachmentView::from(persisted)))
    }

    /// Not supported. Always `false`, nothing is written.
    pub fn delete_attachment(&self, request_id: &str, attachment_id: &str) -> bool {
        tracing::debug!(request_id, attachment_id, "Attachment deletion is not implemented");
        false
    }

    pub fn download_attachment(&self, request_id: &str, attachment_id: &str) -> &'static str {
        tracing::debug!(request_id, attachment_id, "Attachment download is not implemented");
        DOWNLOAD_PLACEHOLDER
    }
}

fn validate_upload(upload: &FileUpload) -> Vec<FieldError> {
    let mut errors = vec![];
    if upload.name.trim().is_empty() {
        errors.push(FieldError::new("$.file.name", "file name must not be blank"));
    }
    if upload.bytes.is_empty() {
        errors.push(FieldError::new("$.file", "file must not be empty"));
    }
    errors
}
