use serde::{Deserialize, Serialize};
use tracing::warn;

/// Machine-readable code carried by every [Error].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    CoreApiError,
    NotInitialized,
    SdkLoadError,
    NetworkError,
    Timeout,
    AuthFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::CoreApiError => "CORE_API_ERROR",
            ErrorCode::NotInitialized => "NOT_INITIALIZED",
            ErrorCode::SdkLoadError => "SDK_LOAD_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::AuthFailed => "AUTH_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

/// The single error surface of the crate.
///
/// Failures are never recovered internally; every operation wraps its failure
/// into one of these variants and returns it to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Core API request failed: {0}")]
    CoreApi(String),

    #[error("the client has not been initialized")]
    NotInitialized,

    #[error("failed to load the SRC SDK: {0}")]
    SdkLoad(String),

    #[error("network failure during authentication: {0}")]
    Network(String),

    #[error("authentication timed out: {0}")]
    Timeout(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),
}

impl Error {
    /// Stable error-family name callers can surface alongside [Error::code],
    /// matching the `name` the wrapped platform reports.
    pub const NAME: &'static str = "CorePasskeysError";

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidInput(_) => ErrorCode::InvalidInput,
            Error::CoreApi(_) => ErrorCode::CoreApiError,
            Error::NotInitialized => ErrorCode::NotInitialized,
            Error::SdkLoad(_) => ErrorCode::SdkLoadError,
            Error::Network(_) => ErrorCode::NetworkError,
            Error::Timeout(_) => ErrorCode::Timeout,
            Error::AuthFailed(_) => ErrorCode::AuthFailed,
        }
    }
}

/// A failure reported by the SRC SDK.
///
/// `code` is the SDK's structured reason when it provides one. The message is
/// always preserved verbatim in the resulting [Error].
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct SdkFailure {
    pub code: Option<String>,
    pub message: String,
}

impl SdkFailure {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl From<SdkFailure> for Error {
    fn from(failure: SdkFailure) -> Self {
        if let Some(code) = failure.code.as_deref() {
            return match code.to_ascii_uppercase().as_str() {
                "NETWORK_ERROR" => Error::Network(failure.message),
                "TIMEOUT" => Error::Timeout(failure.message),
                "INVALID_INPUT" | "VALIDATION_ERROR" => Error::InvalidInput(failure.message),
                _ => Error::AuthFailed(failure.message),
            };
        }

        // Message-substring classification is a last resort and can
        // misclassify on unexpected wording.
        warn!("SDK failure carried no structured code; classifying by message text");
        let lowered = failure.message.to_ascii_lowercase();
        if lowered.contains("network") || lowered.contains("fetch") {
            Error::Network(failure.message)
        } else if lowered.contains("timeout") || lowered.contains("timed out") {
            Error::Timeout(failure.message)
        } else if lowered.contains("invalid") || lowered.contains("validation") {
            Error::InvalidInput(failure.message)
        } else {
            Error::AuthFailed(failure.message)
        }
    }
}
