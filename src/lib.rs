//! elizaOS Twitter REST v1 client
//!
//! Async client for the Twitter REST API v1 with the OAuth 1.0a PIN
//! ("out of band") authorization flow.
//!
//! # Features
//!
//! - Named wrappers for the v1 timeline, status, user, direct message and
//!   account endpoints
//! - HMAC-SHA1 and PLAINTEXT request signing
//! - Calls made before authorization are queued and replayed once the user
//!   grants access
//! - Pluggable transport, signer, consent surface and PIN extraction
//!
//! # Example
//!
//! ```rust,no_run
//! use elizaos_twitter_v1::{CallArgs, LogSurface, TwitterClient, TwitterConfig};
//!
//! # async fn example() -> elizaos_twitter_v1::Result<()> {
//! let config = TwitterConfig::new("consumer-key", "consumer-secret")
//!     .with_access_token("access-token", "access-secret")
//!     .with_ssl(true);
//! let client = TwitterClient::new(config, LogSurface)?;
//!
//! let (args, outcome) = CallArgs::channel();
//! client.home_timeline(args.param("count", 20)).await;
//! if let Ok(Ok(tweets)) = outcome.await {
//!     println!("{tweets}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod callback;
pub mod client;
pub mod config;
pub mod consent;
pub mod endpoints;
pub mod error;
pub mod flow;
pub mod oauth;
pub mod params;
pub mod transport;
pub mod types;

mod queue;

use serde_json::Value;

pub use crate::callback::{AuthCallbacks, CallArgs, Completion};
pub use crate::client::{TwitterClient, TwitterClientBuilder};
pub use crate::config::{ResponseFormat, TwitterConfig};
pub use crate::consent::{ConsentSurface, LogSurface, OAuthPinExtractor, PinExtractor};
pub use crate::endpoints::{Endpoint, HttpVerb, ENDPOINTS};
pub use crate::error::{Result, TwitterError};
pub use crate::flow::AuthState;
pub use crate::oauth::{DefaultSigner, OAuthRequest, OAuthSigner, SignatureMethod, TokenPair};
pub use crate::params::Params;
pub use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use crate::types::{Dispatched, ProfileImageSize};

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Make a single REST call with a throwaway client and wait for its outcome.
///
/// `config` should carry a stored access token; with `autoAuthorize` on and
/// no token the call would wait on a consent surface nobody drives, so
/// authorization is switched off here.
pub async fn request(
    config: TwitterConfig,
    path: &str,
    verb: HttpVerb,
    params: impl Into<Params>,
) -> Result<Value> {
    let client = TwitterClient::new(config.with_auto_authorize(false), LogSurface)?;
    let (args, outcome) = CallArgs::channel();
    client.request(path, verb, args.params(params)).await;
    outcome
        .await
        .map_err(|_| TwitterError::transport("request finished without an outcome"))?
}
