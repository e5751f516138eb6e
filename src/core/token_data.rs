use anyhow::{bail, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};

use super::object::{TypedParameter, UntypedObject};

/// The brand-info body returned by the Core API for one token.
///
/// The body is carried verbatim (no schema validation at the HTTP layer);
/// the typed accessors below read the canonical field set the payload
/// translator needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreTokenData(UntypedObject);

impl CoreTokenData {
    /// Read a typed field, if present.
    pub fn get<T: TypedParameter>(&self) -> Option<Result<T>> {
        self.0.get()
    }

    pub fn as_object(&self) -> &UntypedObject {
        &self.0
    }

    pub fn into_inner(self) -> UntypedObject {
        self.0
    }
}

impl TryFrom<Json> for CoreTokenData {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        match value {
            Json::Object(map) => Ok(Self(map.into())),
            other => bail!("expected the brand-info body to be a JSON object, found: {other}"),
        }
    }
}

impl From<CoreTokenData> for Json {
    fn from(value: CoreTokenData) -> Self {
        value.0.into()
    }
}

/// `srcDigitalCardId` — the SDK-side identity of the token being authenticated.
#[derive(Debug, Clone)]
pub struct SrcDigitalCardId(pub String);

impl TypedParameter for SrcDigitalCardId {
    const KEY: &'static str = "srcDigitalCardId";
}

impl TryFrom<Json> for SrcDigitalCardId {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<SrcDigitalCardId> for Json {
    fn from(value: SrcDigitalCardId) -> Self {
        Json::String(value.0)
    }
}

#[derive(Debug, Clone)]
pub struct ServiceId(pub String);

impl TypedParameter for ServiceId {
    const KEY: &'static str = "serviceId";
}

impl TryFrom<Json> for ServiceId {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<ServiceId> for Json {
    fn from(value: ServiceId) -> Self {
        Json::String(value.0)
    }
}

#[derive(Debug, Clone)]
pub struct SrcClientId(pub String);

impl TypedParameter for SrcClientId {
    const KEY: &'static str = "srcClientId";
}

impl TryFrom<Json> for SrcClientId {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<SrcClientId> for Json {
    fn from(value: SrcClientId) -> Self {
        Json::String(value.0)
    }
}

#[derive(Debug, Clone)]
pub struct AcquirerMerchantId(pub String);

impl TypedParameter for AcquirerMerchantId {
    const KEY: &'static str = "acquirerMerchantId";
}

impl TryFrom<Json> for AcquirerMerchantId {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<AcquirerMerchantId> for Json {
    fn from(value: AcquirerMerchantId) -> Self {
        Json::String(value.0)
    }
}

#[derive(Debug, Clone)]
pub struct AcquirerBin(pub String);

impl TypedParameter for AcquirerBin {
    const KEY: &'static str = "acquirerBIN";
}

impl TryFrom<Json> for AcquirerBin {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<AcquirerBin> for Json {
    fn from(value: AcquirerBin) -> Self {
        Json::String(value.0)
    }
}

#[derive(Debug, Clone)]
pub struct DpaName(pub String);

impl TypedParameter for DpaName {
    const KEY: &'static str = "dpaName";
}

impl TryFrom<Json> for DpaName {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<DpaName> for Json {
    fn from(value: DpaName) -> Self {
        Json::String(value.0)
    }
}

#[derive(Debug, Clone)]
pub struct DpaUri(pub String);

impl TypedParameter for DpaUri {
    const KEY: &'static str = "dpaUri";
}

impl TryFrom<Json> for DpaUri {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<DpaUri> for Json {
    fn from(value: DpaUri) -> Self {
        Json::String(value.0)
    }
}

#[derive(Debug, Clone)]
pub struct MerchantCategoryCode(pub String);

impl TypedParameter for MerchantCategoryCode {
    const KEY: &'static str = "merchantCategoryCode";
}

impl TryFrom<Json> for MerchantCategoryCode {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<MerchantCategoryCode> for Json {
    fn from(value: MerchantCategoryCode) -> Self {
        Json::String(value.0)
    }
}

#[derive(Debug, Clone)]
pub struct MerchantCountryCode(pub String);

impl TypedParameter for MerchantCountryCode {
    const KEY: &'static str = "merchantCountryCode";
}

impl TryFrom<Json> for MerchantCountryCode {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(Self(serde_json::from_value(value)?))
    }
}

impl From<MerchantCountryCode> for Json {
    fn from(value: MerchantCountryCode) -> Self {
        Json::String(value.0)
    }
}

/// `billingAddress` — cardholder billing address as the Core API reports it.
///
/// Every field falls back to the empty string so the translated payload never
/// carries an absent key, only empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingAddress {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
}

impl TypedParameter for BillingAddress {
    const KEY: &'static str = "billingAddress";
}

impl TryFrom<Json> for BillingAddress {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

impl From<BillingAddress> for Json {
    fn from(a: BillingAddress) -> Self {
        json!({
            "line1": a.line1,
            "line2": a.line2,
            "city": a.city,
            "state": a.state,
            "zip": a.zip,
            "countryCode": a.country_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_address_defaults_every_missing_field_to_empty() {
        let address: BillingAddress = serde_json::from_value(json!({})).unwrap();
        assert_eq!(address, BillingAddress::default());
        assert_eq!(address.line1, "");
        assert_eq!(address.country_code, "");
    }

    #[test]
    fn billing_address_keeps_present_fields() {
        let address: BillingAddress = serde_json::from_value(json!({
            "line1": "Av. Winston Churchill 1099",
            "city": "Santo Domingo",
            "countryCode": "DO"
        }))
        .unwrap();
        assert_eq!(address.line1, "Av. Winston Churchill 1099");
        assert_eq!(address.city, "Santo Domingo");
        assert_eq!(address.country_code, "DO");
        assert_eq!(address.zip, "");
    }

    #[test]
    fn brand_info_body_must_be_an_object() {
        assert!(CoreTokenData::try_from(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn typed_reads_pull_canonical_fields() {
        let data = CoreTokenData::try_from(json!({
            "srcDigitalCardId": "dc-123",
            "serviceId": "svc-1",
            "srcClientId": "client-1",
            "acquirerBIN": "545250"
        }))
        .unwrap();
        let SrcDigitalCardId(id) = data.get().unwrap().unwrap();
        assert_eq!(id, "dc-123");
        let AcquirerBin(bin) = data.get().unwrap().unwrap();
        assert_eq!(bin, "545250");
        assert!(data.get::<DpaName>().is_none());
    }
}
