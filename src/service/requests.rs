use super::load_request;
use crate::dto::{CreateRequest, RequestView};
use crate::error::Result;
use crate::identity::UserIdentity;
use crate::model::Request;
use crate::repository::RequestRepository;
use crate::result::{FieldError, ListResponse, ServiceResult};
use crate::utils::{Clock, SystemClock};

pub struct RequestsService<R, C = SystemClock> {
    repository: R,
    clock: C,
}

impl<R: RequestRepository> RequestsService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<R: RequestRepository, C: Clock> RequestsService<R, C> {
    pub fn with_clock(repository: R, clock: C) -> Self {
        Self { repository, clock }
    }

    /// Opens a new request for a company.
    ///
    /// The store assigns the id on insert, so the self link can only be
    /// derived afterwards and is written with a second save.
    #[tracing::instrument(skip(self, payload, identity))]
    pub fn create_request(
        &self,
        payload: CreateRequest,
        identity: &UserIdentity,
        company_number: &str,
        requests_uri: &str,
    ) -> Result<ServiceResult<RequestView>> {
        let mut errors = vec![];
        let created_by = identity.created_by();
        if created_by.is_none() {
            errors.push(FieldError::new("$.created_by.id", "user identity is required"));
        }
        if let (Some(start_on), Some(end_on)) = (
            payload.accounting_period_start_on,
            payload.accounting_period_end_on,
        ) {
            if start_on > end_on {
                errors.push(FieldError::new(
                    "$.accounting_period_end_on",
                    "accounting period must not end before it starts",
                ));
            }
        }
        let Some(created_by) = created_by.filter(|_| errors.is_empty()) else {
            return Ok(ServiceResult::Invalid(errors));
        };

        let request = Request::new(company_number, created_by, self.clock.now())
            .with_accounting_period(
                payload.accounting_period_start_on,
                payload.accounting_period_end_on,
            );

        let mut inserted = self.repository.insert(request)?;
        inserted.assign_self_link(requests_uri)?;
        let saved = self.repository.save(inserted)?;

        tracing::info!(request_id = saved.id().unwrap_or_default(), "Request created");

        Ok(ServiceResult::Created(RequestView::from(&saved)))
    }

    pub fn get_request(&self, request_id: &str) -> Result<ServiceResult<RequestView>> {
        let request = load_request(&self.repository, request_id)?;
        Ok(ServiceResult::Found(RequestView::from(&request)))
    }

    pub fn list_requests(
        &self,
        company_number: &str,
    ) -> Result<ServiceResult<ListResponse<RequestView>>> {
        let requests = self.repository.find_all_by_company_number(company_number)?;
        Ok(ServiceResult::Found(
            requests.iter().map(RequestView::from).collect(),
        ))
    }

    /// Deleting requests is not supported. Always `false`, nothing is written.
    pub fn delete_request(&self, request_id: &str) -> bool {
        tracing::debug!(request_id, "Request deletion is not implemented");
        false
    }
}
