//! Client-side wrapper for passkey/3-D Secure authentication of Core-managed
//! payment tokens through the Mastercard SRC SDK.
//!
//! The wrapper does exactly five things: it lazily loads the environment-keyed
//! SDK, fetches a token's brand metadata from the Core API, translates that
//! metadata (plus the caller's transaction parameters) into the SDK's
//! authentication payload, invokes the SDK, and translates the response back
//! into a small Core-facing result.
//!
//! # Usage
//!
//! All state lives in a [`SrcClient`] built once and cloned freely:
//!
//! ```ignore
//! use core_passkeys::{Config, Environment, SrcClient};
//! use core_passkeys::client::{AuthenticateParams, TokenBrandRequest};
//! use core_passkeys::core::authentication::parameters::{Amount, TransactionParams};
//!
//! let client = SrcClient::builder()
//!     .with_config(Config {
//!         environment: Environment::Sandbox,
//!         locale: "es_CL".to_string(),
//!     })
//!     .build()?;
//!
//! // End-to-end: initializes on first use, fetches brand-info, authenticates.
//! let result = client
//!     .execute_authenticate(&AuthenticateParams {
//!         token: TokenBrandRequest::new("azul", "m-1", "t-1"),
//!         transaction: TransactionParams::new("passkey", "payment", Amount::new(1500u32, "DOP")),
//!     })
//!     .await?;
//!
//! if result.status.is_success() {
//!     // hand result.id_token back to the Core platform
//! }
//! ```
//!
//! Callers that already hold brand-info data can skip the fetch:
//!
//! ```ignore
//! client.initialize().await?;
//! let result = client.authenticate(&core_data, &transaction).await?;
//! ```
//!
//! # Bringing your own SDK
//!
//! The SDK handle is opaque behind the [`sdk::SrcSdk`] trait. The default
//! [`sdk::RemoteSdkLoader`] fetches the environment-keyed script resource and
//! talks to the script's origin over HTTP; deployments with a different
//! transport implement [`sdk::SrcSdk`] (or [`sdk::SdkLoader`]) and pass it to
//! the builder. The same seam is what tests use.
//!
//! # Errors
//!
//! Every failure surfaces as the single [`Error`] type carrying a
//! machine-readable [`ErrorCode`]; nothing is retried or recovered
//! internally. See [`error`] for the taxonomy.

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod sdk;

pub use client::{AuthenticateParams, SrcClient, SrcClientBuilder, TokenBrandRequest};
pub use config::{Config, Endpoints, Environment};
pub use core::response::{AuthenticationResult, AuthenticationStatus};
pub use error::{Error, ErrorCode, SdkFailure};
