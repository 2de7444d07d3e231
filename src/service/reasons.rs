use super::load_request;
use crate::builder::ReasonBuilder;
use crate::dto::{CreateReason, ReasonPatch, ReasonView};
use crate::error::{Result, ServiceError};
use crate::model::Request;
use crate::repository::RequestRepository;
use crate::result::{FieldError, ListResponse, ServiceResult};
use crate::utils::{IdGenerator, Uuid7Ids};

/// Reasons of a request. Each mutation is one read and, when something
/// changed, one write of the whole request.
pub struct ReasonsService<R, G = Uuid7Ids> {
    repository: R,
    ids: G,
}

impl<R: RequestRepository> ReasonsService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_ids(repository, Uuid7Ids)
    }
}

impl<R: RequestRepository, G: IdGenerator> ReasonsService<R, G> {
    pub fn with_ids(repository: R, ids: G) -> Self {
        Self { repository, ids }
    }

    /// Adds a reason built from the populated fields of `payload`.
    ///
    /// The created reason is read back from what the store returned, so the
    /// view carries the etag the store assigned.
    #[tracing::instrument(skip(self, payload))]
    pub fn add_reason(
        &self,
        request_id: &str,
        payload: CreateReason,
        request_uri: &str,
    ) -> Result<ServiceResult<ReasonView>> {
        let mut request = load_request(&self.repository, request_id)?;

        if let (Some(start_on), Some(end_on)) = (payload.start_on, payload.end_on) {
            if start_on > end_on {
                return Ok(ServiceResult::Invalid(vec![FieldError::new(
                    "$.end_on",
                    "end_on must not be before start_on",
                )]));
            }
        }

        let mut builder = ReasonBuilder::blank()
            .with_id(self.ids.new_id())
            .with_links(request_uri)
            .with_start_on(payload.start_on)
            .with_end_on(payload.end_on);
        if let Some(reason) = payload.reason {
            builder = builder.with_reason(reason);
        }
        if let Some(additional_text) = payload.additional_text {
            builder = builder.with_additional_text(additional_text);
        }
        let reason = builder.build();
        let reason_id = reason.id().to_string();

        if !request.add_reason(reason) {
            tracing::error!(request_id, reason_id = %reason_id, "Generated reason id is taken");
            return Err(ServiceError::IdInUse {
                request_id: request_id.to_string(),
                id: reason_id,
            });
        }
        let saved = self.repository.save(request)?;

        let Some(persisted) = saved.reason(&reason_id) else {
            tracing::error!(
                request_id,
                reason_id = %reason_id,
                "Saved request is missing the new reason"
            );
            return Err(ServiceError::ReasonNotPersisted {
                request_id: request_id.to_string(),
                reason_id,
            });
        };

        tracing::info!(request_id, reason_id = %reason_id, "Reason added");

        Ok(ServiceResult::Created(ReasonView::from(persisted)))
    }

    pub fn list_reasons(
        &self,
        request_id: &str,
    ) -> Result<ServiceResult<ListResponse<ReasonView>>> {
        let request = load_request(&self.repository, request_id)?;

        Ok(ServiceResult::Found(
            request.reasons().iter().map(ReasonView::from).collect(),
        ))
    }

    /// Overwrites the fields present in `patch` on one reason.
    #[tracing::instrument(skip(self, patch))]
    pub fn patch_reason(
        &self,
        request_id: &str,
        reason_id: &str,
        patch: ReasonPatch,
    ) -> Result<()> {
        let mut request = load_request(&self.repository, request_id)?;

        let Some(reason) = request.reason_mut(reason_id) else {
            tracing::warn!(request_id, reason_id, "Reason not found");
            return Err(ServiceError::ReasonNotFound {
                request_id: request_id.to_string(),
                reason_id: reason_id.to_string(),
            });
        };
        reason.apply_patch(patch);

        self.repository.save(request)?;
        tracing::info!(request_id, reason_id, "Reason patched");

        Ok(())
    }

    /// Removes a reason if present. A request without reasons is returned
    /// as loaded and not written.
    #[tracing::instrument(skip(self))]
    pub fn remove_reason(&self, request_id: &str, reason_id: &str) -> Result<Request> {
        let mut request = load_request(&self.repository, request_id)?;

        if request.reasons().is_empty() {
            return Ok(request);
        }

        let removed = request.remove_reason(reason_id).is_some();
        let saved = self.repository.save(request)?;
        tracing::info!(request_id, reason_id, removed, "Reasons rewritten");

        Ok(saved)
    }
}
