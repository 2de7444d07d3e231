//! Outcomes of service calls that completed normally
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Found,
    Created,
    Invalid,
}

/// A completed call. Fatal conditions are not represented here, they are
/// returned as [`crate::error::ServiceError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult<T> {
    /// Data read, nothing changed.
    Found(T),
    /// A new child was persisted. The view carries its self link.
    Created(T),
    /// The payload was rejected before anything was written.
    Invalid(Vec<FieldError>),
}

/// One validation failure, located by JSON path in the caller's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub error: String,
    pub location: String,
    pub location_type: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total_results: usize,
}

impl<T> ServiceResult<T> {
    pub fn status(&self) -> ResultStatus {
        match self {
            ServiceResult::Found(_) => ResultStatus::Found,
            ServiceResult::Created(_) => ResultStatus::Created,
            ServiceResult::Invalid(_) => ResultStatus::Invalid,
        }
    }
    pub fn data(&self) -> Option<&T> {
        match self {
            ServiceResult::Found(data) | ServiceResult::Created(data) => Some(data),
            ServiceResult::Invalid(_) => None,
        }
    }
    pub fn into_data(self) -> Option<T> {
        match self {
            ServiceResult::Found(data) | ServiceResult::Created(data) => Some(data),
            ServiceResult::Invalid(_) => None,
        }
    }
    pub fn errors(&self) -> &[FieldError] {
        match self {
            ServiceResult::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

impl FieldError {
    pub fn new(location: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            location: location.into(),
            location_type: "json-path".to_string(),
            error_type: "ch:validation".to_string(),
        }
    }
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            total_results: items.len(),
            items,
        }
    }
}

impl<T> FromIterator<T> for ListResponse<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
