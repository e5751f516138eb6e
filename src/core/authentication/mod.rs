use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::Error;

use super::object::TypedParameter;
use super::token_data::{
    AcquirerBin, AcquirerMerchantId, BillingAddress, CoreTokenData, DpaName, DpaUri,
    MerchantCategoryCode, MerchantCountryCode, ServiceId, SrcClientId, SrcDigitalCardId,
};

use self::parameters::{
    AuthenticationMethodType, AuthenticationReason, AuthenticationSubject, TransactionParams,
};

pub mod parameters;

/// The authentication request the SDK expects.
///
/// The nested shape and camelCase wire names are fixed by the SDK; two fresh
/// correlation identifiers are generated for every construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationPayload {
    pub src_correlation_id: Uuid,
    pub service_id: String,
    pub src_client_id: String,
    pub trace_id: Uuid,
    pub account_reference: AccountReference,
    pub authentication_method: AuthenticationMethod,
    pub authentication_context: AuthenticationContext,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReference {
    pub src_digital_card_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationMethod {
    pub authentication_method_type: AuthenticationMethodType,
    pub authentication_subject: AuthenticationSubject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationContext {
    pub authentication_reasons: Vec<AuthenticationReason>,
    pub acquirer_merchant_id: String,
    #[serde(rename = "acquirerBIN")]
    pub acquirer_bin: String,
    pub dpa_data: DpaData,
    pub dpa_transaction_options: DpaTransactionOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpaData {
    pub dpa_name: String,
    pub dpa_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpaTransactionOptions {
    pub transaction_amount: TransactionAmount,
    pub dpa_locale: String,
    pub three_ds_input_data: ThreeDsInputData,
    pub merchant_category_code: String,
    pub merchant_country_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAmount {
    /// The amount as text; the SDK rejects JSON numbers here.
    pub transaction_amount: String,
    pub transaction_currency_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDsInputData {
    pub billing_address: BillingAddress,
}

impl AuthenticationPayload {
    /// Translate the fetched brand-info and the caller's transaction
    /// parameters into the SDK's request shape.
    ///
    /// Pure construction: no network or client state is touched. Fails with
    /// [Error::InvalidInput] when the brand-info is missing one of the
    /// identifiers the SDK requires.
    pub fn from_parts(
        data: &CoreTokenData,
        params: &TransactionParams,
        config: &Config,
    ) -> Result<Self, Error> {
        let ServiceId(service_id) = required(data)?;
        let SrcClientId(src_client_id) = required(data)?;
        let SrcDigitalCardId(src_digital_card_id) = required(data)?;

        let billing_address = optional::<BillingAddress>(data).unwrap_or_default();

        let acquirer_merchant_id = params
            .acquirer_merchant_id
            .clone()
            .or_else(|| optional::<AcquirerMerchantId>(data).map(|AcquirerMerchantId(v)| v))
            .unwrap_or_default();
        let acquirer_bin = params
            .acquirer_bin
            .clone()
            .or_else(|| optional::<AcquirerBin>(data).map(|AcquirerBin(v)| v))
            .unwrap_or_default();
        let dpa_name = params
            .dpa_name
            .clone()
            .or_else(|| optional::<DpaName>(data).map(|DpaName(v)| v))
            .unwrap_or_default();
        let dpa_uri = params
            .dpa_uri
            .clone()
            .or_else(|| optional::<DpaUri>(data).map(|DpaUri(v)| v))
            .unwrap_or_default();
        let merchant_category_code = params
            .merchant_category_code
            .clone()
            .or_else(|| optional::<MerchantCategoryCode>(data).map(|MerchantCategoryCode(v)| v))
            .unwrap_or_default();
        let merchant_country_code = params
            .merchant_country_code
            .clone()
            .or_else(|| optional::<MerchantCountryCode>(data).map(|MerchantCountryCode(v)| v))
            .unwrap_or_default();

        Ok(Self {
            src_correlation_id: Uuid::new_v4(),
            service_id,
            src_client_id,
            trace_id: Uuid::new_v4(),
            account_reference: AccountReference {
                src_digital_card_id,
            },
            authentication_method: AuthenticationMethod {
                authentication_method_type: params.auth_method.method_type(),
                authentication_subject: AuthenticationSubject::Cardholder,
            },
            authentication_context: AuthenticationContext {
                authentication_reasons: vec![params.auth_reason.reason()],
                acquirer_merchant_id,
                acquirer_bin,
                dpa_data: DpaData { dpa_name, dpa_uri },
                dpa_transaction_options: DpaTransactionOptions {
                    transaction_amount: TransactionAmount {
                        transaction_amount: params.amount.value.to_string(),
                        transaction_currency_code: params.amount.currency.clone(),
                    },
                    dpa_locale: config.locale.clone(),
                    three_ds_input_data: ThreeDsInputData { billing_address },
                    merchant_category_code,
                    merchant_country_code,
                },
            },
        })
    }
}

fn required<T: TypedParameter>(data: &CoreTokenData) -> Result<T, Error> {
    data.get::<T>()
        .ok_or_else(|| Error::InvalidInput(format!("brand-info is missing '{}'", T::KEY)))?
        .map_err(|e| Error::InvalidInput(format!("brand-info field '{}' is invalid: {e}", T::KEY)))
}

fn optional<T: TypedParameter>(data: &CoreTokenData) -> Option<T> {
    data.get::<T>().and_then(Result::ok)
}
