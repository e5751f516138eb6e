use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use http::{Request, Response};
use serde_json::{json, Value as Json};
use url::Url;

use core_passkeys::client::AuthenticateParams;
use core_passkeys::core::authentication::parameters::{Amount, TransactionParams};
use core_passkeys::core::authentication::AuthenticationPayload;
use core_passkeys::core::object::UntypedObject;
use core_passkeys::core::token_data::CoreTokenData;
use core_passkeys::core::util::AsyncHttpClient;
use core_passkeys::sdk::{SdkLoader, SrcSdk};
use core_passkeys::{
    AuthenticationStatus, Config, Environment, ErrorCode, SdkFailure, SrcClient, TokenBrandRequest,
};

/// Serves one canned response and records every request it sees.
#[derive(Debug)]
struct MockHttpClient {
    status: u16,
    body: Json,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockHttpClient {
    fn new(status: u16, body: Json) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AsyncHttpClient for MockHttpClient {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        self.requests
            .lock()
            .unwrap()
            .push((request.method().to_string(), request.uri().to_string()));
        Ok(Response::builder()
            .status(self.status)
            .body(serde_json::to_vec(&self.body)?)?)
    }
}

#[derive(Debug)]
struct MockSdk {
    response: Result<Json, SdkFailure>,
    calls: AtomicUsize,
}

impl MockSdk {
    fn completing() -> Arc<Self> {
        Arc::new(Self {
            response: Ok(json!({
                "status": "COMPLETE",
                "idToken": "tok-1",
                "srcCorrelationId": "corr-1"
            })),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(failure: SdkFailure) -> Arc<Self> {
        Arc::new(Self {
            response: Err(failure),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SrcSdk for MockSdk {
    async fn authenticate(
        &self,
        _payload: AuthenticationPayload,
    ) -> Result<UntypedObject, SdkFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(json) => Ok(UntypedObject::try_from(json.clone()).unwrap()),
            Err(failure) => Err(failure.clone()),
        }
    }
}

#[derive(Debug)]
struct MockLoader {
    sdk: Arc<MockSdk>,
    loads: AtomicUsize,
    failures_left: AtomicUsize,
}

impl MockLoader {
    fn new(sdk: Arc<MockSdk>) -> Arc<Self> {
        Arc::new(Self {
            sdk,
            loads: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(0),
        })
    }

    fn failing_first(sdk: Arc<MockSdk>, failures: usize) -> Arc<Self> {
        Arc::new(Self {
            sdk,
            loads: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(failures),
        })
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SdkLoader for MockLoader {
    async fn load(&self, _script: &Url) -> Result<Arc<dyn SrcSdk + Send + Sync>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            bail!("script failed to load");
        }
        Ok(self.sdk.clone())
    }
}

fn brand_info_body() -> Json {
    json!({
        "srcDigitalCardId": "dc-123",
        "serviceId": "svc-1",
        "srcClientId": "client-1",
        "acquirerMerchantId": "acq-m-1",
        "acquirerBIN": "545250",
        "dpaName": "Example Checkout",
        "dpaUri": "https://checkout.example.com",
        "merchantCategoryCode": "5411",
        "merchantCountryCode": "DO",
        "billingAddress": { "line1": "Av. 27 de Febrero 247", "countryCode": "DO" }
    })
}

fn transaction() -> TransactionParams {
    TransactionParams::new("passkey", "payment", Amount::new(1500u32, "DOP"))
}

fn authenticate_params() -> AuthenticateParams {
    AuthenticateParams {
        token: TokenBrandRequest::new("azul", "m-1", "t-1"),
        transaction: transaction(),
    }
}

fn client(http: Arc<MockHttpClient>, loader: Arc<MockLoader>) -> SrcClient {
    SrcClient::builder()
        .with_config(Config::default())
        .with_http_client(http)
        .with_sdk_loader(loader)
        .build()
        .unwrap()
}

#[tokio::test]
async fn empty_identifier_fails_before_any_network_call() {
    let http = MockHttpClient::new(200, brand_info_body());
    let client = client(http.clone(), MockLoader::new(MockSdk::completing()));

    let err = client
        .fetch_token_brand_info(&TokenBrandRequest::new("", "m-1", "t-1"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidInput);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn brand_info_hits_the_sandbox_url_and_surfaces_404() {
    let http = MockHttpClient::new(404, json!({ "error": "not found" }));
    let client = client(http.clone(), MockLoader::new(MockSdk::completing()));

    let err = client
        .fetch_token_brand_info(&TokenBrandRequest::new("azul", "m-1", "t-1"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::CoreApiError);
    assert!(err.to_string().contains("404"), "got: {err}");

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "GET");
    assert_eq!(
        requests[0].1,
        "https://api-sandbox.tr-tsp.net/tr-tsp-api-core/v1/private/manager/azul/merchant/m-1/token/t-1/brand-info"
    );
}

#[tokio::test]
async fn authenticate_before_initialization_never_reaches_the_sdk() {
    let sdk = MockSdk::completing();
    let loader = MockLoader::new(sdk.clone());
    let client = client(MockHttpClient::new(200, brand_info_body()), loader.clone());

    let data = CoreTokenData::try_from(brand_info_body()).unwrap();
    let err = client.authenticate(&data, &transaction()).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotInitialized);
    assert_eq!(loader.loads(), 0);
    assert_eq!(sdk.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn execute_authenticate_runs_the_whole_flow_once() {
    let http = MockHttpClient::new(200, brand_info_body());
    let sdk = MockSdk::completing();
    let loader = MockLoader::new(sdk.clone());
    let client = client(http.clone(), loader.clone());

    let result = client
        .execute_authenticate(&authenticate_params())
        .await
        .unwrap();

    assert_eq!(result.status, AuthenticationStatus::Complete);
    assert_eq!(result.id_token.as_deref(), Some("tok-1"));
    assert_eq!(result.src_correlation_id.as_deref(), Some("corr-1"));
    assert_eq!(loader.loads(), 1);
    assert_eq!(sdk.calls.load(Ordering::SeqCst), 1);
    assert_eq!(http.requests().len(), 1);

    // A second call reuses the loaded SDK handle.
    client
        .execute_authenticate(&authenticate_params())
        .await
        .unwrap();
    assert_eq!(loader.loads(), 1);
    assert_eq!(http.requests().len(), 2);
}

#[tokio::test]
async fn failed_initialization_short_circuits_before_the_core_api() {
    let http = MockHttpClient::new(200, brand_info_body());
    let sdk = MockSdk::completing();
    let loader = MockLoader::failing_first(sdk, usize::MAX);
    let client = client(http.clone(), loader.clone());

    let err = client
        .execute_authenticate(&authenticate_params())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::SdkLoadError);
    assert!(!client.is_ready());
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn initialization_retries_after_a_failed_load() {
    let loader = MockLoader::failing_first(MockSdk::completing(), 1);
    let client = client(MockHttpClient::new(200, brand_info_body()), loader.clone());

    let err = client.initialize().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SdkLoadError);
    assert!(!client.is_ready());
    assert_eq!(loader.loads(), 1);

    client.initialize().await.unwrap();
    assert!(client.is_ready());
    assert_eq!(loader.loads(), 2);
}

#[tokio::test]
async fn concurrent_initialization_shares_one_load() {
    let loader = MockLoader::new(MockSdk::completing());
    let client = client(MockHttpClient::new(200, brand_info_body()), loader.clone());

    let (a, b, c) = tokio::join!(client.initialize(), client.initialize(), client.initialize());
    a.unwrap();
    b.unwrap();
    c.unwrap();

    assert!(client.is_ready());
    assert_eq!(loader.loads(), 1);

    // Late duplicate is a warning-only no-op.
    client.initialize().await.unwrap();
    assert_eq!(loader.loads(), 1);
}

#[tokio::test]
async fn sdk_network_failure_is_classified_as_network_error() {
    let http = MockHttpClient::new(200, brand_info_body());
    let sdk = MockSdk::failing(SdkFailure::message("network request failed"));
    let client = client(http, MockLoader::new(sdk));

    let err = client
        .execute_authenticate(&authenticate_params())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NetworkError);
    assert!(err.to_string().contains("network request failed"));
}

#[tokio::test]
async fn structured_sdk_code_wins_over_the_message_text() {
    let sdk = MockSdk::failing(SdkFailure::new("TIMEOUT", "network request failed"));
    let client = client(
        MockHttpClient::new(200, brand_info_body()),
        MockLoader::new(sdk),
    );

    let err = client
        .execute_authenticate(&authenticate_params())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Timeout);
}

#[tokio::test]
async fn declined_authentication_is_a_result_not_an_error() {
    let sdk = Arc::new(MockSdk {
        response: Ok(json!({ "status": "DECLINED" })),
        calls: AtomicUsize::new(0),
    });
    let client = client(
        MockHttpClient::new(200, brand_info_body()),
        MockLoader::new(sdk),
    );

    let result = client
        .execute_authenticate(&authenticate_params())
        .await
        .unwrap();
    assert_eq!(result.status, AuthenticationStatus::Declined);
    assert!(!result.status.is_success());
}

#[test]
fn builder_rejects_the_production_placeholder() {
    let err = SrcClient::builder()
        .with_config(Config {
            environment: Environment::Production,
            ..Config::default()
        })
        .build()
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn a_pre_supplied_sdk_handle_starts_ready() {
    let sdk = MockSdk::completing();
    let client = SrcClient::builder()
        .with_http_client(MockHttpClient::new(200, brand_info_body()))
        .with_sdk(sdk.clone())
        .build()
        .unwrap();

    assert!(client.is_ready());
    client.initialize().await.unwrap();

    let result = client
        .execute_authenticate(&authenticate_params())
        .await
        .unwrap();
    assert_eq!(result.status, AuthenticationStatus::Complete);
    assert_eq!(sdk.calls.load(Ordering::SeqCst), 1);
}
