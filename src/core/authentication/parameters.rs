use serde::{Deserialize, Serialize};
use serde_json::Number;

const THREE_DS: &str = "3ds";
const PASSKEY: &str = "passkey";

const LOGIN: &str = "login";
const PAYMENT: &str = "payment";
const ENROLL: &str = "enroll";

/// Caller-requested authentication method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthMethod {
    ThreeDs,
    Passkey,
    Other(String),
}

impl AuthMethod {
    /// The SDK method type this request maps to. Anything unrecognized falls
    /// back to 3-D Secure.
    pub fn method_type(&self) -> AuthenticationMethodType {
        match self {
            AuthMethod::Passkey => AuthenticationMethodType::ManagedAuthentication,
            AuthMethod::ThreeDs | AuthMethod::Other(_) => AuthenticationMethodType::ThreeDs,
        }
    }
}

impl From<String> for AuthMethod {
    fn from(s: String) -> Self {
        match s.as_str() {
            THREE_DS => AuthMethod::ThreeDs,
            PASSKEY => AuthMethod::Passkey,
            _ => AuthMethod::Other(s),
        }
    }
}

impl From<&str> for AuthMethod {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<AuthMethod> for String {
    fn from(m: AuthMethod) -> Self {
        match m {
            AuthMethod::ThreeDs => THREE_DS.into(),
            AuthMethod::Passkey => PASSKEY.into(),
            AuthMethod::Other(o) => o,
        }
    }
}

/// Caller-supplied reason for the authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthReason {
    Login,
    Payment,
    Enroll,
    Other(String),
}

impl AuthReason {
    /// The SDK reason this request maps to. Anything unrecognized falls back
    /// to a transaction authentication.
    pub fn reason(&self) -> AuthenticationReason {
        match self {
            AuthReason::Enroll => AuthenticationReason::EnrolFinancialInstrument,
            AuthReason::Login | AuthReason::Payment | AuthReason::Other(_) => {
                AuthenticationReason::TransactionAuthentication
            }
        }
    }
}

impl From<String> for AuthReason {
    fn from(s: String) -> Self {
        match s.as_str() {
            LOGIN => AuthReason::Login,
            PAYMENT => AuthReason::Payment,
            ENROLL => AuthReason::Enroll,
            _ => AuthReason::Other(s),
        }
    }
}

impl From<&str> for AuthReason {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<AuthReason> for String {
    fn from(r: AuthReason) -> Self {
        match r {
            AuthReason::Login => LOGIN.into(),
            AuthReason::Payment => PAYMENT.into(),
            AuthReason::Enroll => ENROLL.into(),
            AuthReason::Other(o) => o,
        }
    }
}

/// `authenticationMethodType` values the SDK understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationMethodType {
    #[serde(rename = "3DS")]
    ThreeDs,
    #[serde(rename = "MANAGED_AUTHENTICATION")]
    ManagedAuthentication,
}

/// `authenticationReasons` values the SDK understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationReason {
    #[serde(rename = "TRANSACTION_AUTHENTICATION")]
    TransactionAuthentication,
    #[serde(rename = "ENROL_FINANCIAL_INSTRUMENT")]
    EnrolFinancialInstrument,
}

/// `authenticationSubject` is always the cardholder in this integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationSubject {
    #[serde(rename = "CARDHOLDER")]
    Cardholder,
}

/// Monetary amount of the transaction being authenticated.
///
/// The value is kept as a JSON number so the caller's exact decimal text
/// survives the string coercion the SDK payload requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub value: Number,
    pub currency: String,
}

impl Amount {
    pub fn new(value: impl Into<Number>, currency: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency: currency.into(),
        }
    }
}

/// Caller-supplied transaction parameters merged with the fetched brand-info.
///
/// The optional descriptors override what the Core API reports for the
/// merchant; unset fields fall back to the brand-info values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionParams {
    pub auth_method: AuthMethod,
    pub auth_reason: AuthReason,
    pub amount: Amount,
    #[serde(default)]
    pub acquirer_merchant_id: Option<String>,
    #[serde(default)]
    pub acquirer_bin: Option<String>,
    #[serde(default)]
    pub dpa_name: Option<String>,
    #[serde(default)]
    pub dpa_uri: Option<String>,
    #[serde(default)]
    pub merchant_category_code: Option<String>,
    #[serde(default)]
    pub merchant_country_code: Option<String>,
}

impl TransactionParams {
    pub fn new(
        auth_method: impl Into<AuthMethod>,
        auth_reason: impl Into<AuthReason>,
        amount: Amount,
    ) -> Self {
        Self {
            auth_method: auth_method.into(),
            auth_reason: auth_reason.into(),
            amount,
            acquirer_merchant_id: None,
            acquirer_bin: None,
            dpa_name: None,
            dpa_uri: None,
            merchant_category_code: None,
            merchant_country_code: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_methods_fall_back_to_three_ds() {
        for raw in ["webauthn", "frictionless", "3DS", ""] {
            assert_eq!(
                AuthMethod::from(raw).method_type(),
                AuthenticationMethodType::ThreeDs,
                "method: {raw:?}"
            );
        }
        assert_eq!(
            AuthMethod::from("passkey").method_type(),
            AuthenticationMethodType::ManagedAuthentication
        );
    }

    #[test]
    fn unrecognized_reasons_fall_back_to_transaction_authentication() {
        for raw in ["checkout", "LOGIN", "signup", ""] {
            assert_eq!(
                AuthReason::from(raw).reason(),
                AuthenticationReason::TransactionAuthentication,
                "reason: {raw:?}"
            );
        }
        assert_eq!(
            AuthReason::from("enroll").reason(),
            AuthenticationReason::EnrolFinancialInstrument
        );
    }

    #[test]
    fn sdk_literals_serialize_to_the_wire_strings() {
        assert_eq!(
            serde_json::to_value(AuthenticationMethodType::ManagedAuthentication).unwrap(),
            "MANAGED_AUTHENTICATION"
        );
        assert_eq!(
            serde_json::to_value(AuthenticationReason::EnrolFinancialInstrument).unwrap(),
            "ENROL_FINANCIAL_INSTRUMENT"
        );
        assert_eq!(
            serde_json::to_value(AuthenticationSubject::Cardholder).unwrap(),
            "CARDHOLDER"
        );
    }
}
