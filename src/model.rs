//! The extension request aggregate: a request, its reasons and their attachments
use crate::dto::ReasonPatch;
use crate::error::ServiceError;
use crate::files::StoredFile;
use crate::utils::derive_link;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use minicbor::{Decode, Encode};

const DOWNLOAD_SUFFIX: &str = "download";

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

/// A calendar day with no time or zone, e.g. an accounting period boundary.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct CalendarDate(NaiveDate);

#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[n(0)]
    Open,
}

#[derive(Encode, Decode, Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Links {
    #[n(0)]
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[n(1)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CreatedBy {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub email: Option<String>,
    #[n(2)]
    pub forename: Option<String>,
    #[n(3)]
    pub surname: Option<String>,
}

/// Children that are addressed by a unique string key within their parent.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Insertion ordered children of an aggregate node, looked up by key.
#[derive(Debug, Clone, PartialEq)]
pub struct Children<T>(Vec<T>);

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct Attachment {
    #[n(0)]
    pub(crate) id: String,
    #[n(1)]
    pub(crate) name: String,
    #[n(2)]
    pub(crate) content_type: String,
    #[n(3)]
    pub(crate) size: u64,
    #[n(4)]
    pub(crate) links: Links,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct Reason {
    #[n(0)]
    pub(crate) id: String,
    #[n(1)]
    pub(crate) etag: Option<String>,
    #[n(2)]
    pub(crate) reason: Option<String>,
    #[n(3)]
    pub(crate) additional_text: Option<String>,
    #[n(4)]
    pub(crate) start_on: Option<CalendarDate>,
    #[n(5)]
    pub(crate) end_on: Option<CalendarDate>,
    #[n(6)]
    pub(crate) links: Links,
    #[n(7)]
    pub(crate) attachments: Children<Attachment>,
}

/// Aggregate root. Persisted and loaded as one document, children included.
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct Request {
    #[n(0)]
    id: Option<String>,
    #[n(1)]
    etag: Option<String>,
    #[n(2)]
    company_number: String,
    #[n(3)]
    status: RequestStatus,
    #[n(4)]
    created_on: TimeStamp<Utc>,
    #[n(5)]
    created_by: CreatedBy,
    #[n(6)]
    accounting_period_start_on: Option<CalendarDate>,
    #[n(7)]
    accounting_period_end_on: Option<CalendarDate>,
    #[n(8)]
    links: Links,
    #[n(9)]
    reasons: Children<Reason>,
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .unwrap_or_default()
            .into()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl CalendarDate {
    pub fn to_naive_date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        CalendarDate(value)
    }
}

impl RequestStatus {
    pub fn description(&self) -> &'static str {
        match self {
            RequestStatus::Open => "Open",
        }
    }
}

impl Links {
    pub fn with_self(link: String) -> Self {
        Self {
            self_link: Some(link),
            download: None,
        }
    }
}

impl CreatedBy {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            forename: None,
            surname: None,
        }
    }
}

impl<T> Default for Children<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: Keyed> Children<T> {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.0.iter_mut()
    }
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|child| child.key() == key)
    }
    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.0.iter_mut().find(|child| child.key() == key)
    }
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
    /// Appends at the end. A child whose key is already taken is not added
    /// and `false` is returned.
    pub fn push(&mut self, child: T) -> bool {
        if self.contains(child.key()) {
            return false;
        }
        self.0.push(child);
        true
    }
    /// Removes the child with `key`, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let position = self.0.iter().position(|child| child.key() == key)?;
        Some(self.0.remove(position))
    }
}

impl<'a, T> IntoIterator for &'a Children<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Keyed for Reason {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Attachment {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Attachment {
    /// Builds an attachment record for a stored file. `self` is derived from the
    /// attachments collection URI and the id, `download` hangs off `self`.
    pub fn new(id: impl Into<String>, file: StoredFile, attachments_uri: &str) -> Self {
        let id = id.into();
        let self_link = derive_link(attachments_uri, &id);
        let download = derive_link(&self_link, DOWNLOAD_SUFFIX);

        Self {
            id,
            name: file.name,
            content_type: file.content_type,
            size: file.size,
            links: Links {
                self_link: Some(self_link),
                download: Some(download),
            },
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
    pub fn size(&self) -> u64 {
        self.size
    }
    pub fn links(&self) -> &Links {
        &self.links
    }
}

impl Reason {
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
    pub fn additional_text(&self) -> Option<&str> {
        self.additional_text.as_deref()
    }
    pub fn start_on(&self) -> Option<NaiveDate> {
        self.start_on.map(CalendarDate::to_naive_date)
    }
    pub fn end_on(&self) -> Option<NaiveDate> {
        self.end_on.map(CalendarDate::to_naive_date)
    }
    pub fn links(&self) -> &Links {
        &self.links
    }
    pub fn attachments(&self) -> &Children<Attachment> {
        &self.attachments
    }
    /// `false` when the attachment id is already on this reason.
    pub fn add_attachment(&mut self, attachment: Attachment) -> bool {
        self.attachments.push(attachment)
    }
    /// Overwrites the fields present in `patch`. An explicit `null` date clears it.
    pub fn apply_patch(&mut self, patch: ReasonPatch) {
        if let Some(reason) = patch.reason {
            self.reason = Some(reason);
        }
        if let Some(additional_text) = patch.additional_text {
            self.additional_text = Some(additional_text);
        }
        if let Some(start_on) = patch.start_on {
            self.start_on = start_on.map(CalendarDate::from);
        }
        if let Some(end_on) = patch.end_on {
            self.end_on = end_on.map(CalendarDate::from);
        }
    }
    pub(crate) fn set_etag(&mut self, etag: Option<String>) {
        self.etag = etag;
    }
}

impl Request {
    /// A new, unsaved request. The store assigns the id on first write.
    pub fn new(
        company_number: impl Into<String>,
        created_by: CreatedBy,
        created_on: TimeStamp<Utc>,
    ) -> Self {
        Self {
            id: None,
            etag: None,
            company_number: company_number.into(),
            status: RequestStatus::Open,
            created_on,
            created_by,
            accounting_period_start_on: None,
            accounting_period_end_on: None,
            links: Links::default(),
            reasons: Children::default(),
        }
    }
    /// Pre-assigns the id of an unsaved request. An id that is already set is kept.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.assign_id(id.into());
        self
    }
    pub fn with_accounting_period(
        mut self,
        start_on: Option<NaiveDate>,
        end_on: Option<NaiveDate>,
    ) -> Self {
        self.accounting_period_start_on = start_on.map(CalendarDate::from);
        self.accounting_period_end_on = end_on.map(CalendarDate::from);
        self
    }
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }
    pub fn company_number(&self) -> &str {
        &self.company_number
    }
    pub fn status(&self) -> RequestStatus {
        self.status
    }
    pub fn created_on(&self) -> &TimeStamp<Utc> {
        &self.created_on
    }
    pub fn created_by(&self) -> &CreatedBy {
        &self.created_by
    }
    pub fn accounting_period_start_on(&self) -> Option<NaiveDate> {
        self.accounting_period_start_on.map(CalendarDate::to_naive_date)
    }
    pub fn accounting_period_end_on(&self) -> Option<NaiveDate> {
        self.accounting_period_end_on.map(CalendarDate::to_naive_date)
    }
    pub fn links(&self) -> &Links {
        &self.links
    }
    pub fn reasons(&self) -> &Children<Reason> {
        &self.reasons
    }
    pub fn reason(&self, reason_id: &str) -> Option<&Reason> {
        self.reasons.get(reason_id)
    }
    pub fn reason_mut(&mut self, reason_id: &str) -> Option<&mut Reason> {
        self.reasons.get_mut(reason_id)
    }
    /// `false` when the reason id is already on this request.
    pub fn add_reason(&mut self, reason: Reason) -> bool {
        self.reasons.push(reason)
    }
    pub fn remove_reason(&mut self, reason_id: &str) -> Option<Reason> {
        self.reasons.remove(reason_id)
    }
    /// Derives the self link from the assigned id.
    ///
    /// The id comes from the store, so a request that was never written has
    /// nothing to link to. That is a caller bug and is reported as such.
    pub fn assign_self_link(&mut self, requests_uri: &str) -> Result<(), ServiceError> {
        let id = self
            .id
            .as_deref()
            .ok_or(ServiceError::InvalidBuilderState(
                ServiceError::LINKS_BEFORE_ID,
            ))?;
        self.links = Links::with_self(derive_link(requests_uri, id));
        Ok(())
    }
    pub(crate) fn assign_id(&mut self, id: String) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }
    pub(crate) fn set_etag(&mut self, etag: Option<String>) {
        self.etag = etag;
    }
    pub(crate) fn reasons_mut(&mut self) -> &mut Children<Reason> {
        &mut self.reasons
    }
}

impl<C> Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

// days since 0001-01-01
impl<C> Encode<C> for CalendarDate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.i32(chrono::Datelike::num_days_from_ce(&self.0))?.ok()
    }
}

impl<'b, C> Decode<'b, C> for CalendarDate {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let days = d.i32()?;

        NaiveDate::from_num_days_from_ce_opt(days)
            .map(CalendarDate)
            .ok_or(minicbor::decode::Error::message(
                "failed to convert day count to a calendar date",
            ))
    }
}

impl<C, T: Encode<C>> Encode<C> for Children<T> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        self.0.encode(e, ctx)
    }
}

impl<'b, C, T: Decode<'b, C>> Decode<'b, C> for Children<T> {
    fn decode(d: &mut minicbor::Decoder<'b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
        Vec::<T>::decode(d, ctx).map(Children)
    }
}
