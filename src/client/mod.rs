use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::{Config, Endpoints};
use crate::core::authentication::parameters::TransactionParams;
use crate::core::authentication::AuthenticationPayload;
use crate::core::response::AuthenticationResult;
use crate::core::token_data::CoreTokenData;
use crate::core::util::{AsyncHttpClient, ReqwestClient};
use crate::error::Error;
use crate::sdk::{RemoteSdkLoader, SdkLoader, SrcSdk};

use self::core_api::CoreApiClient;
pub use self::core_api::TokenBrandRequest;

mod core_api;

/// Everything `execute_authenticate` needs for one end-to-end call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateParams {
    #[serde(flatten)]
    pub token: TokenBrandRequest,
    #[serde(flatten)]
    pub transaction: TransactionParams,
}

/// The passkeys wrapper client.
///
/// Owns all long-lived state: the configuration, the resolved endpoints and
/// the lazily loaded SDK handle. Cheap to clone; clones share the SDK handle.
///
/// The client has exactly two states, uninitialized and ready, with a single
/// one-way transition on the first successful [initialize](SrcClient::initialize).
/// A failed initialization leaves it uninitialized and the next call retries.
#[derive(Debug, Clone)]
pub struct SrcClient {
    config: Config,
    endpoints: Endpoints,
    api: CoreApiClient,
    loader: Arc<dyn SdkLoader + Send + Sync>,
    sdk: Arc<OnceCell<Arc<dyn SrcSdk + Send + Sync>>>,
}

impl SrcClient {
    /// Build a new client.
    pub fn builder() -> SrcClientBuilder {
        SrcClientBuilder::default()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Load the SRC SDK if it is not loaded yet.
    ///
    /// Idempotent and safe under concurrent invocation: the first caller runs
    /// the loader, concurrent callers await the same in-flight load, and a
    /// caller arriving after completion gets a no-op with a warning.
    pub async fn initialize(&self) -> Result<(), Error> {
        if self.sdk.initialized() {
            warn!("SRC SDK already initialized; ignoring duplicate initialize call");
            return Ok(());
        }
        self.ensure_initialized().await
    }

    /// Whether the SDK handle is loaded and authentication calls can proceed.
    pub fn is_ready(&self) -> bool {
        self.sdk.initialized()
    }

    /// The loaded SDK handle.
    pub fn sdk(&self) -> Result<Arc<dyn SrcSdk + Send + Sync>, Error> {
        self.sdk.get().cloned().ok_or(Error::NotInitialized)
    }

    /// Fetch the brand metadata for one token from the Core API.
    pub async fn fetch_token_brand_info(
        &self,
        request: &TokenBrandRequest,
    ) -> Result<CoreTokenData, Error> {
        self.api.fetch_token_brand_info(request).await
    }

    /// Authenticate with brand-info data the caller already holds.
    ///
    /// Requires the client to be ready; fails with [Error::NotInitialized]
    /// before touching the SDK otherwise.
    pub async fn authenticate(
        &self,
        data: &CoreTokenData,
        params: &TransactionParams,
    ) -> Result<AuthenticationResult, Error> {
        let sdk = self.sdk()?;
        let payload = AuthenticationPayload::from_parts(data, params, &self.config)?;
        debug!(correlation_id = %payload.src_correlation_id, "invoking SRC SDK authenticate");
        let response = sdk.authenticate(payload).await?;
        Ok(AuthenticationResult::from(response))
    }

    /// The end-to-end call: initialize if needed, fetch brand-info, translate,
    /// invoke the SDK, translate back.
    ///
    /// Every failure propagates unchanged; a failed initialization
    /// short-circuits before the Core API is contacted.
    pub async fn execute_authenticate(
        &self,
        params: &AuthenticateParams,
    ) -> Result<AuthenticationResult, Error> {
        self.ensure_initialized().await?;
        let data = self.fetch_token_brand_info(&params.token).await?;
        self.authenticate(&data, &params.transaction).await
    }

    async fn ensure_initialized(&self) -> Result<(), Error> {
        self.sdk
            .get_or_try_init(|| async {
                let script = self.endpoints.sdk_script();
                debug!(%script, "loading the SRC SDK");
                let handle = self
                    .loader
                    .load(script)
                    .await
                    .map_err(|e| Error::SdkLoad(format!("{e:#}")))?;
                debug!("SRC SDK ready");
                Ok::<_, Error>(handle)
            })
            .await?;
        Ok(())
    }
}

/// Builder struct for [SrcClient].
#[derive(Debug, Clone, Default)]
pub struct SrcClientBuilder {
    config: Option<Config>,
    endpoints: Option<Endpoints>,
    http_client: Option<Arc<dyn AsyncHttpClient + Send + Sync>>,
    sdk_loader: Option<Arc<dyn SdkLoader + Send + Sync>>,
    sdk: Option<Arc<dyn SrcSdk + Send + Sync>>,
}

impl SrcClientBuilder {
    /// Build the client.
    ///
    /// Fails when the configuration resolves to endpoints that do not exist,
    /// notably a production environment with no explicit [Endpoints].
    pub fn build(self) -> Result<SrcClient, Error> {
        let config = self.config.unwrap_or_default();

        let endpoints = match self.endpoints {
            Some(endpoints) => endpoints,
            None => Endpoints::for_environment(&config.environment)?,
        };

        let http: Arc<dyn AsyncHttpClient + Send + Sync> = match self.http_client {
            Some(http) => http,
            None => Arc::new(
                ReqwestClient::new()
                    .map_err(|e| Error::InvalidInput(format!("unable to build http client: {e:#}")))?,
            ),
        };

        let loader: Arc<dyn SdkLoader + Send + Sync> = match self.sdk_loader {
            Some(loader) => loader,
            None => Arc::new(RemoteSdkLoader::new(http.clone())),
        };

        let sdk = match self.sdk {
            Some(handle) => OnceCell::new_with(Some(handle)),
            None => OnceCell::new(),
        };

        Ok(SrcClient {
            api: CoreApiClient::new(endpoints.core_api().clone(), http),
            config,
            endpoints,
            loader,
            sdk: Arc::new(sdk),
        })
    }

    /// Set the wrapper configuration. Defaults to the sandbox environment and
    /// the `en_US` locale.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the environment-keyed endpoints. Required for production.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Set the HTTP transport used for the Core API and the default SDK
    /// loader.
    pub fn with_http_client(mut self, http_client: Arc<dyn AsyncHttpClient + Send + Sync>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Set the loader that obtains the SDK handle on first initialization.
    pub fn with_sdk_loader(mut self, sdk_loader: Arc<dyn SdkLoader + Send + Sync>) -> Self {
        self.sdk_loader = Some(sdk_loader);
        self
    }

    /// Adopt an already-constructed SDK handle verbatim; the client starts
    /// ready and no loading takes place.
    pub fn with_sdk(mut self, sdk: Arc<dyn SrcSdk + Send + Sync>) -> Self {
        self.sdk = Some(sdk);
        self
    }
}
