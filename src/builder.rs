//! Staged construction of new reasons.
//!
//! A reason's self link is derived from its id, so the builder only offers
//! `with_links` once an id is in place. [`ReasonBuilder::blank`] starts in the
//! [`Unidentified`] stage, [`ReasonBuilder::with_id`] moves it to
//! [`Identified`]. Asking for links too early is a compile error:
//!
//! ```compile_fail
//! use extension_requests::builder::ReasonBuilder;
//! ReasonBuilder::blank().with_links("/requests/R1/reasons");
//! ```
use crate::model::{CalendarDate, Children, Links, Reason};
use crate::utils::{IdGenerator, Uuid7Ids, derive_link};
use chrono::NaiveDate;

/// Stage of a builder that has no id yet.
#[derive(Debug, Default)]
pub struct Unidentified;

/// Stage of a builder whose id is fixed.
#[derive(Debug)]
pub struct Identified {
    id: String,
}

// used for constructing new reasons only, nothing here clears a value
#[derive(Debug)]
pub struct ReasonBuilder<S> {
    stage: S,
    links: Links,
    reason: Option<String>,
    additional_text: Option<String>,
    start_on: Option<CalendarDate>,
    end_on: Option<CalendarDate>,
}

impl ReasonBuilder<Unidentified> {
    /// A builder without an id. Call [`with_id`](Self::with_id) before links.
    pub fn blank() -> Self {
        Self {
            stage: Unidentified,
            links: Links::default(),
            reason: None,
            additional_text: None,
            start_on: None,
            end_on: None,
        }
    }
    pub fn with_id(self, id: impl Into<String>) -> ReasonBuilder<Identified> {
        ReasonBuilder {
            stage: Identified { id: id.into() },
            links: self.links,
            reason: self.reason,
            additional_text: self.additional_text,
            start_on: self.start_on,
            end_on: self.end_on,
        }
    }
}

impl ReasonBuilder<Identified> {
    /// A builder with a freshly generated id.
    pub fn new() -> Self {
        Self::generated(&Uuid7Ids)
    }
    pub fn generated(ids: &dyn IdGenerator) -> Self {
        ReasonBuilder::blank().with_id(ids.new_id())
    }
    pub fn id(&self) -> &str {
        &self.stage.id
    }
    /// Sets the self link to `request_uri/<id>`.
    pub fn with_links(mut self, request_uri: &str) -> Self {
        self.links = Links::with_self(derive_link(request_uri, &self.stage.id));
        self
    }
    pub fn build(self) -> Reason {
        Reason {
            id: self.stage.id,
            etag: None,
            reason: self.reason,
            additional_text: self.additional_text,
            start_on: self.start_on,
            end_on: self.end_on,
            links: self.links,
            attachments: Children::default(),
        }
    }
}

impl Default for ReasonBuilder<Identified> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ReasonBuilder<S> {
    /// Ignored when blank.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        if let Some(reason) = non_blank(reason.into()) {
            self.reason = Some(reason);
        }
        self
    }
    /// Ignored when blank.
    pub fn with_additional_text(mut self, additional_text: impl Into<String>) -> Self {
        if let Some(additional_text) = non_blank(additional_text.into()) {
            self.additional_text = Some(additional_text);
        }
        self
    }
    pub fn with_start_on(mut self, start_on: Option<NaiveDate>) -> Self {
        if let Some(date) = start_on {
            self.start_on = Some(date.into());
        }
        self
    }
    pub fn with_end_on(mut self, end_on: Option<NaiveDate>) -> Self {
        if let Some(date) = end_on {
            self.end_on = Some(date.into());
        }
        self
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
