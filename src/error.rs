//! Error types for the Twitter REST client and the OAuth authorization flow.

use thiserror::Error;

use crate::transport::HttpResponse;

/// Result type for Twitter client operations.
pub type Result<T> = std::result::Result<T, TwitterError>;

/// Error types for Twitter client operations.
///
/// Every call-level failure is delivered to the call's `on_failure`
/// callback rather than returned; only construction-time problems come back
/// through [`Result`].
#[derive(Error, Debug)]
pub enum TwitterError {
    /// No endpoint is registered under this name
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// A `:placeholder` in the URL template had no matching parameter
    #[error("Missing required parameter: {0}")]
    MissingRequiredParameter(String),

    /// The OAuth request token step failed
    #[error("Request token failed: {0}")]
    TokenRequestFailed(String),

    /// The user did not grant access on the consent page
    #[error("User denied authorization")]
    UserDeniedAuthorization,

    /// The OAuth access token step failed
    #[error("Access token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The API answered with a status other than 200
    #[error("Twitter API error ({}): {}", .response.status, .response.body)]
    HttpRequestFailed {
        /// Raw response
        response: HttpResponse,
    },

    /// The API answered 200 but the body was not valid JSON
    #[error("Could not decode response: {message}")]
    ResponseDecodeFailed {
        /// Decoder message
        message: String,
        /// Raw response
        response: HttpResponse,
    },

    /// The call was queued and authorization ended without success
    #[error("Authorization abandoned before the queued call could run")]
    AuthorizationAbandoned,

    /// `authorize` was called while another session was still running
    #[error("Authorization already in progress")]
    AuthorizationInProgress,

    /// The transport did not answer within the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The transport could not complete the request
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request signing failed
    #[error("Signature error: {0}")]
    Signature(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TwitterError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// The raw HTTP response attached to this error, if the request got that far.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::HttpRequestFailed { response } | Self::ResponseDecodeFailed { response, .. } => {
                Some(response)
            }
            _ => None,
        }
    }

    /// HTTP status of the attached response, if any.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }
}

impl From<reqwest::Error> for TwitterError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
