//! Identifier, link and clock helpers shared by the services and the stores
use crate::model::TimeStamp;
use bech32::Bech32m;
use chrono::Utc;
use uuid7::uuid7;

/// Human readable prefix of store-assigned request identifiers.
pub const REQUEST_ID_HRP: &str = "req";

/// Supplies fresh identifiers for reasons and attachments.
///
/// Any `Fn() -> String` is a generator, which lets tests pin identifiers.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// Default generator, time ordered UUIDv7 strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Uuid7Ids;

impl IdGenerator for Uuid7Ids {
    fn new_id(&self) -> String {
        uuid7().to_string()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn new_id(&self) -> String {
        self()
    }
}

/// Supplies the current time. Injected so creation times are reproducible.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimeStamp<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeStamp<Utc> {
        TimeStamp::new()
    }
}

impl<F> Clock for F
where
    F: Fn() -> TimeStamp<Utc> + Send + Sync,
{
    fn now(&self) -> TimeStamp<Utc> {
        self()
    }
}

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Joins a parent URI and a child id with exactly one `/`.
pub fn derive_link(parent_uri: &str, id: &str) -> String {
    format!("{}/{}", parent_uri.trim_end_matches('/'), id)
}
