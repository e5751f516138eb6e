use anyhow::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::object::{TypedParameter, UntypedObject};

const COMPLETE: &str = "COMPLETE";
const DECLINED: &str = "DECLINED";
const ERROR: &str = "ERROR";

/// Outcome the SDK reports for an authentication.
///
/// Unknown statuses are preserved verbatim rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthenticationStatus {
    Complete,
    Declined,
    Error,
    Other(String),
}

impl AuthenticationStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthenticationStatus::Complete)
    }
}

impl From<String> for AuthenticationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            COMPLETE => AuthenticationStatus::Complete,
            DECLINED => AuthenticationStatus::Declined,
            ERROR => AuthenticationStatus::Error,
            _ => AuthenticationStatus::Other(s),
        }
    }
}

impl From<AuthenticationStatus> for String {
    fn from(s: AuthenticationStatus) -> Self {
        match s {
            AuthenticationStatus::Complete => COMPLETE.into(),
            AuthenticationStatus::Declined => DECLINED.into(),
            AuthenticationStatus::Error => ERROR.into(),
            AuthenticationStatus::Other(o) => o,
        }
    }
}

impl std::fmt::Display for AuthenticationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationStatus::Complete => COMPLETE,
            AuthenticationStatus::Declined => DECLINED,
            AuthenticationStatus::Error => ERROR,
            AuthenticationStatus::Other(o) => o,
        }
        .fmt(f)
    }
}

impl TypedParameter for AuthenticationStatus {
    const KEY: &'static str = "status";
}

impl TryFrom<Json> for AuthenticationStatus {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self, Error> {
        serde_json::from_value(value)
            .map(String::into)
            .map_err(Error::from)
    }
}

impl From<AuthenticationStatus> for Json {
    fn from(value: AuthenticationStatus) -> Self {
        Json::String(value.into())
    }
}

#[derive(Debug, Clone)]
struct IdToken(String);

impl TypedParameter for IdToken {
    const KEY: &'static str = "idToken";
}

impl TryFrom<Json> for IdToken {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self, Error> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<IdToken> for Json {
    fn from(value: IdToken) -> Self {
        Json::String(value.0)
    }
}

#[derive(Debug, Clone)]
struct SrcCorrelationId(String);

impl TypedParameter for SrcCorrelationId {
    const KEY: &'static str = "srcCorrelationId";
}

impl TryFrom<Json> for SrcCorrelationId {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self, Error> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<SrcCorrelationId> for Json {
    fn from(value: SrcCorrelationId) -> Self {
        Json::String(value.0)
    }
}

/// The Core-facing result of one authentication.
///
/// A fixed subset of the SDK response; everything else the SDK returns is
/// dropped. Total over any response object: an absent or unreadable status
/// surfaces as `Other("UNKNOWN")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResult {
    pub status: AuthenticationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_correlation_id: Option<String>,
}

impl From<UntypedObject> for AuthenticationResult {
    fn from(response: UntypedObject) -> Self {
        let status = response
            .get::<AuthenticationStatus>()
            .and_then(Result::ok)
            .unwrap_or_else(|| AuthenticationStatus::Other("UNKNOWN".to_string()));
        let id_token = response
            .get::<IdToken>()
            .and_then(Result::ok)
            .map(|IdToken(t)| t);
        let src_correlation_id = response
            .get::<SrcCorrelationId>()
            .and_then(Result::ok)
            .map(|SrcCorrelationId(id)| id);
        Self {
            status,
            id_token,
            src_correlation_id,
        }
    }
}
