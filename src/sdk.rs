use std::fmt::Debug;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use serde_json::Value as Json;
use tracing::debug;
use url::Url;

use crate::core::authentication::AuthenticationPayload;
use crate::core::object::UntypedObject;
use crate::core::util::{base_request, AsyncHttpClient};
use crate::error::SdkFailure;

const AUTHENTICATE_PATH: &str = "/srci/authenticate";

/// A handle on the SRC SDK.
///
/// The SDK's internal authentication protocol is opaque; this trait is the
/// whole surface the wrapper touches. Deployments with their own transport
/// implement it and hand the handle to
/// [SrcClientBuilder::with_sdk](crate::client::SrcClientBuilder::with_sdk).
#[async_trait]
pub trait SrcSdk: Debug {
    async fn authenticate(
        &self,
        payload: AuthenticationPayload,
    ) -> Result<UntypedObject, SdkFailure>;
}

/// Obtains an [SrcSdk] handle for the environment-keyed script resource.
#[async_trait]
pub trait SdkLoader: Debug {
    async fn load(&self, script: &Url) -> Result<Arc<dyn SrcSdk + Send + Sync>>;
}

/// The default loader: fetches the SDK script resource once and, when it is
/// reachable, yields an [HttpSrcSdk] pointed at the script's origin. A failed
/// fetch is the load-failure signal.
#[derive(Debug, Clone)]
pub struct RemoteSdkLoader {
    http: Arc<dyn AsyncHttpClient + Send + Sync>,
}

impl RemoteSdkLoader {
    pub fn new(http: Arc<dyn AsyncHttpClient + Send + Sync>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SdkLoader for RemoteSdkLoader {
    async fn load(&self, script: &Url) -> Result<Arc<dyn SrcSdk + Send + Sync>> {
        let request = base_request()
            .method("GET")
            .uri(script.as_str())
            .body(vec![])
            .context("unable to build the SDK script request")?;

        let response = self
            .http
            .execute(request)
            .await
            .context("failed to fetch the SDK script resource")?;

        let status = response.status();
        if !status.is_success() {
            bail!("SDK script fetch was unsuccessful (status: {status})");
        }
        debug!(%script, "SRC SDK script resource loaded");

        Ok(Arc::new(HttpSrcSdk::new(
            authenticate_endpoint(script),
            self.http.clone(),
        )))
    }
}

/// An [SrcSdk] that submits the authentication payload to the SDK origin over
/// HTTP.
#[derive(Debug, Clone)]
pub struct HttpSrcSdk {
    endpoint: Url,
    http: Arc<dyn AsyncHttpClient + Send + Sync>,
}

impl HttpSrcSdk {
    pub fn new(endpoint: Url, http: Arc<dyn AsyncHttpClient + Send + Sync>) -> Self {
        Self { endpoint, http }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SrcSdk for HttpSrcSdk {
    async fn authenticate(
        &self,
        payload: AuthenticationPayload,
    ) -> Result<UntypedObject, SdkFailure> {
        let body = serde_json::to_vec(&payload).map_err(|e| {
            SdkFailure::message(format!("unable to serialize authentication payload: {e}"))
        })?;

        let request = base_request()
            .method("POST")
            .uri(self.endpoint.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .map_err(|e| {
                SdkFailure::message(format!("unable to build authentication request: {e}"))
            })?;

        let response = self.http.execute(request).await.map_err(|e| SdkFailure {
            code: Some("NETWORK_ERROR".to_string()),
            message: format!("network request failed: {e:#}"),
        })?;

        let status = response.status();
        let body = response.into_body();
        if !status.is_success() {
            return Err(failure_from_response(status, &body));
        }

        serde_json::from_slice::<Json>(&body)
            .ok()
            .and_then(|json| UntypedObject::try_from(json).ok())
            .ok_or_else(|| {
                SdkFailure::message(format!("SDK returned a malformed response (status: {status})"))
            })
    }
}

fn authenticate_endpoint(script: &Url) -> Url {
    let mut endpoint = script.clone();
    endpoint.set_path(AUTHENTICATE_PATH);
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    endpoint
}

/// Upstream failures arrive as `{"code": ..., "message": ...}` when the SDK
/// is structured about them; anything else is folded into the message.
fn failure_from_response(status: http::StatusCode, body: &[u8]) -> SdkFailure {
    if let Ok(failure) = serde_json::from_slice::<SdkFailure>(body) {
        return failure;
    }
    let text = String::from_utf8_lossy(body);
    SdkFailure::message(format!("SDK invocation returned {status}: {text}"))
}
