use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

const LOCAL: &str = "local";
const DEVELOPMENT: &str = "development";
const SANDBOX: &str = "sandbox";
const PRODUCTION: &str = "production";

const DEFAULT_LOCALE: &str = "en_US";

const LOCAL_CORE_API_URL: &str = "http://localhost:8080/";
const SANDBOX_CORE_API_URL: &str = "https://api-sandbox.tr-tsp.net/";

const SANDBOX_SDK_SCRIPT_URL: &str =
    "https://sandbox.src.mastercard.com/sdk/srcsdk.mastercard.js";
const PRODUCTION_SDK_SCRIPT_URL: &str = "https://src.mastercard.com/sdk/srcsdk.mastercard.js";

/// Deployment environment the client talks to.
///
/// Unrecognized values are preserved and behave like [Environment::Sandbox]
/// for endpoint selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    Local,
    Development,
    Sandbox,
    Production,
    Other(String),
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Sandbox
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.as_str() {
            LOCAL => Environment::Local,
            DEVELOPMENT => Environment::Development,
            SANDBOX => Environment::Sandbox,
            PRODUCTION => Environment::Production,
            _ => Environment::Other(s),
        }
    }
}

impl From<Environment> for String {
    fn from(e: Environment) -> Self {
        match e {
            Environment::Local => LOCAL.into(),
            Environment::Development => DEVELOPMENT.into(),
            Environment::Sandbox => SANDBOX.into(),
            Environment::Production => PRODUCTION.into(),
            Environment::Other(o) => o,
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.to_owned().into())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => LOCAL,
            Environment::Development => DEVELOPMENT,
            Environment::Sandbox => SANDBOX,
            Environment::Production => PRODUCTION,
            Environment::Other(o) => o,
        }
        .fmt(f)
    }
}

/// Client configuration supplied by the caller at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub environment: Environment,
    /// BCP 47-ish locale forwarded to the SDK as `dpaLocale`, e.g. `en_US` or `es_CL`.
    pub locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// A url that is always a base (can be safely join()'ed with further path
/// elements without mangling).
#[derive(Deserialize, Serialize, Debug, Clone, Hash, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct BaseUrl(Url);

impl std::ops::Deref for BaseUrl {
    type Target = Url;

    fn deref(&self) -> &Url {
        &self.0
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = url::ParseError;

    fn try_from(mut url: String) -> Result<Self, Self::Error> {
        // Make URL a base.
        if !url.ends_with('/') {
            url += "/"
        }
        url.parse().map(Self)
    }
}

/// Resolved endpoints for one environment.
///
/// The Core API base and the SDK script resource are configured independently.
/// There is no built-in production Core API URL; production callers construct
/// [Endpoints] explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    core_api: BaseUrl,
    sdk_script: Url,
}

impl Endpoints {
    pub fn new(core_api: BaseUrl, sdk_script: Url) -> Self {
        Self {
            core_api,
            sdk_script,
        }
    }

    /// Built-in endpoints for `environment`.
    ///
    /// `local`/`development` use the local Core API; `sandbox` and anything
    /// unrecognized use the sandbox Core API; `production` has no safe default
    /// and fails with [Error::InvalidInput].
    pub fn for_environment(environment: &Environment) -> Result<Self, Error> {
        let core_api = match environment {
            Environment::Local | Environment::Development => LOCAL_CORE_API_URL,
            Environment::Production => {
                return Err(Error::InvalidInput(
                    "no default Core API endpoint is configured for the production \
                     environment; supply explicit Endpoints to the builder"
                        .to_string(),
                ))
            }
            Environment::Sandbox | Environment::Other(_) => SANDBOX_CORE_API_URL,
        };
        let core_api = BaseUrl::try_from(core_api.to_string())
            .map_err(|e| Error::InvalidInput(format!("invalid default Core API url: {e}")))?;
        Ok(Self {
            core_api,
            sdk_script: Self::sdk_script_url(environment)?,
        })
    }

    /// The environment-keyed SDK script resource: production gets the
    /// production script, every other environment gets the sandbox script.
    pub fn sdk_script_url(environment: &Environment) -> Result<Url, Error> {
        let url = match environment {
            Environment::Production => PRODUCTION_SDK_SCRIPT_URL,
            _ => SANDBOX_SDK_SCRIPT_URL,
        };
        url.parse()
            .map_err(|e| Error::InvalidInput(format!("invalid SDK script url: {e}")))
    }

    pub fn core_api(&self) -> &BaseUrl {
        &self.core_api
    }

    pub fn sdk_script(&self) -> &Url {
        &self.sdk_script
    }
}
