//! Who is asking: the creator identity carried by inbound request headers
use crate::model::CreatedBy;
use std::collections::HashMap;

pub const ERIC_IDENTITY: &str = "ERIC-Identity";
pub const ERIC_AUTHORISED_USER: &str = "ERIC-Authorised-User";

/// Caller identity as extracted. Every part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: Option<String>,
    pub email: Option<String>,
    pub forename: Option<String>,
    pub surname: Option<String>,
}

/// Yields the caller identity from some inbound context.
pub trait IdentityExtractor<Ctx: ?Sized> {
    fn extract(&self, context: &Ctx) -> UserIdentity;
}

/// Reads the identity headers set by the API gateway.
///
/// `ERIC-Authorised-User` looks like `demo@ch.gov.uk; forename=Demo; surname=User`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EricHeaderParser;

impl UserIdentity {
    /// The creator record, when a user id is present.
    pub fn created_by(&self) -> Option<CreatedBy> {
        let id = self.id.clone()?;
        Some(CreatedBy {
            id,
            email: self.email.clone(),
            forename: self.forename.clone(),
            surname: self.surname.clone(),
        })
    }
}

impl EricHeaderParser {
    fn header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }
}

impl IdentityExtractor<HashMap<String, String>> for EricHeaderParser {
    fn extract(&self, headers: &HashMap<String, String>) -> UserIdentity {
        let mut identity = UserIdentity {
            id: Self::header(headers, ERIC_IDENTITY).map(str::to_string),
            ..UserIdentity::default()
        };

        let Some(user) = Self::header(headers, ERIC_AUTHORISED_USER) else {
            return identity;
        };

        for (index, part) in user.split(';').map(str::trim).enumerate() {
            match part.split_once('=') {
                Some((key, value)) if key.trim().eq_ignore_ascii_case("forename") => {
                    identity.forename = Some(value.trim().to_string());
                }
                Some((key, value)) if key.trim().eq_ignore_ascii_case("surname") => {
                    identity.surname = Some(value.trim().to_string());
                }
                None if index == 0 && !part.is_empty() => {
                    identity.email = Some(part.to_string());
                }
                _ => {}
            }
        }

        identity
    }
}
