//! Caller payloads and the external views projected from persisted entities
use crate::model::{Attachment, CreatedBy, Links, Reason, Request, RequestStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateRequest {
    pub accounting_period_start_on: Option<NaiveDate>,
    pub accounting_period_end_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateReason {
    pub reason: Option<String>,
    pub additional_text: Option<String>,
    pub start_on: Option<NaiveDate>,
    pub end_on: Option<NaiveDate>,
}

/// Partial update of a reason. `None` leaves a field alone; for dates
/// `Some(None)`, an explicit JSON `null`, clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReasonPatch {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub additional_text: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub start_on: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub end_on: Option<Option<NaiveDate>>,
}

// only called when the key is in the document, absent keys hit `default`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentView {
    pub id: String,
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub links: Links,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_on: Option<NaiveDate>,
    pub links: Links,
    pub attachments: Vec<AttachmentView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub company_number: String,
    pub status: RequestStatus,
    pub created_on: DateTime<Utc>,
    pub created_by: CreatedBy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounting_period_start_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounting_period_end_on: Option<NaiveDate>,
    pub links: Links,
    pub reasons: Vec<ReasonView>,
}

impl From<&Attachment> for AttachmentView {
    fn from(entity: &Attachment) -> Self {
        Self {
            id: entity.id().to_string(),
            name: entity.name().to_string(),
            content_type: entity.content_type().to_string(),
            size: entity.size(),
            links: entity.links().clone(),
        }
    }
}

impl From<&Reason> for ReasonView {
    fn from(entity: &Reason) -> Self {
        Self {
            id: entity.id().to_string(),
            etag: entity.etag().map(str::to_string),
            reason: entity.reason().map(str::to_string),
            additional_text: entity.additional_text().map(str::to_string),
            start_on: entity.start_on(),
            end_on: entity.end_on(),
            links: entity.links().clone(),
            attachments: entity.attachments().iter().map(AttachmentView::from).collect(),
        }
    }
}

impl From<&Request> for RequestView {
    fn from(entity: &Request) -> Self {
        Self {
            id: entity.id().unwrap_or_default().to_string(),
            etag: entity.etag().map(str::to_string),
            company_number: entity.company_number().to_string(),
            status: entity.status(),
            created_on: entity.created_on().to_datetime_utc(),
            created_by: entity.created_by().clone(),
            accounting_period_start_on: entity.accounting_period_start_on(),
            accounting_period_end_on: entity.accounting_period_end_on(),
            links: entity.links().clone(),
            reasons: entity.reasons().iter().map(ReasonView::from).collect(),
        }
    }
}
