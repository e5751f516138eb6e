use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::BaseUrl;
use crate::core::token_data::CoreTokenData;
use crate::core::util::{base_request, AsyncHttpClient};
use crate::error::Error;

/// Identifiers forming the path to one token's brand metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBrandRequest {
    pub manager_code: String,
    pub merchant_code: String,
    pub token_code: String,
}

impl TokenBrandRequest {
    pub fn new(
        manager_code: impl Into<String>,
        merchant_code: impl Into<String>,
        token_code: impl Into<String>,
    ) -> Self {
        Self {
            manager_code: manager_code.into(),
            merchant_code: merchant_code.into(),
            token_code: token_code.into(),
        }
    }

    /// All three identifiers must be non-empty before any network access.
    fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("manager_code", &self.manager_code),
            ("merchant_code", &self.merchant_code),
            ("token_code", &self.token_code),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidInput(format!("'{name}' must not be empty")));
            }
        }
        Ok(())
    }
}

/// The one Core API call this wrapper performs.
#[derive(Debug, Clone)]
pub(crate) struct CoreApiClient {
    base: BaseUrl,
    http: Arc<dyn AsyncHttpClient + Send + Sync>,
}

impl CoreApiClient {
    pub(crate) fn new(base: BaseUrl, http: Arc<dyn AsyncHttpClient + Send + Sync>) -> Self {
        Self { base, http }
    }

    pub(crate) async fn fetch_token_brand_info(
        &self,
        request: &TokenBrandRequest,
    ) -> Result<CoreTokenData, Error> {
        request.validate()?;

        let url = self.brand_info_url(request)?;
        debug!(%url, "fetching token brand-info");

        let http_request = base_request()
            .method("GET")
            .uri(url.as_str())
            .body(vec![])
            .map_err(|e| Error::CoreApi(format!("unable to build the brand-info request: {e}")))?;

        let response = self
            .http
            .execute(http_request)
            .await
            .map_err(|e| Error::CoreApi(format!("brand-info request failed: {e:#}")))?;

        let status = response.status();
        let body = response.into_body();
        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(Error::CoreApi(format!(
                "brand-info request returned {status}: {text}"
            )));
        }

        let json: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| Error::CoreApi(format!("brand-info response is not valid JSON: {e}")))?;
        CoreTokenData::try_from(json).map_err(|e| Error::CoreApi(format!("{e:#}")))
    }

    fn brand_info_url(&self, request: &TokenBrandRequest) -> Result<Url, Error> {
        self.base
            .join(&format!(
                "tr-tsp-api-core/v1/private/manager/{}/merchant/{}/token/{}/brand-info",
                request.manager_code, request.merchant_code, request.token_code
            ))
            .map_err(|e| Error::InvalidInput(format!("unable to construct the brand-info url: {e}")))
    }
}
