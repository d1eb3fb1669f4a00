//! Client configuration.
//!
//! Options keep the camelCase names older Twitter client libraries used
//! (`consumerKey`, `autoAuthorize`, `restAPI`, ...) when deserialized, so a
//! host can load them straight from its own settings file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TwitterError};
use crate::oauth::SignatureMethod;

pub const DEFAULT_REST_API: &str = "api.twitter.com/1/";
pub const DEFAULT_REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://api.twitter.com/oauth/authorize";
pub const DEFAULT_ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Response body format. JSON is the only one the client can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
}

impl ResponseFormat {
    /// Suffix appended to every REST path.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }
}

/// Configuration for [`crate::TwitterClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TwitterConfig {
    /// Consumer key (API key)
    pub consumer_key: String,
    /// Consumer secret (API secret)
    pub consumer_secret: String,
    /// Stored access token, if the host persisted one
    pub access_key: Option<String>,
    /// Stored access token secret
    pub access_secret: Option<String>,
    /// Queue calls and start authorization when no access token is present
    pub auto_authorize: bool,
    /// Use `https://` for REST calls
    #[serde(rename = "useSSL")]
    pub use_ssl: bool,
    /// Host and version prefix of the REST API, without scheme
    #[serde(rename = "restAPI")]
    pub rest_api: String,
    pub response_format: ResponseFormat,
    pub signature_method: SignatureMethod,
    #[serde(rename = "requestTokenURL")]
    pub request_token_url: String,
    #[serde(rename = "authorizeURL")]
    pub authorize_url: String,
    #[serde(rename = "accessTokenURL")]
    pub access_token_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: String::new(),
            access_key: None,
            access_secret: None,
            auto_authorize: false,
            use_ssl: false,
            rest_api: DEFAULT_REST_API.to_string(),
            response_format: ResponseFormat::Json,
            signature_method: SignatureMethod::HmacSha1,
            request_token_url: DEFAULT_REQUEST_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            access_token_url: DEFAULT_ACCESS_TOKEN_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TwitterConfig {
    /// Create a configuration with default endpoints.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            ..Self::default()
        }
    }

    /// Check the options a client cannot work without.
    pub fn validate(&self) -> Result<()> {
        if self.consumer_key.is_empty() {
            return Err(TwitterError::config("consumerKey is required"));
        }
        if self.consumer_secret.is_empty() {
            return Err(TwitterError::config("consumerSecret is required"));
        }
        if self.rest_api.is_empty() {
            return Err(TwitterError::config("restAPI must not be empty"));
        }
        if self.rest_api.contains("://") {
            return Err(TwitterError::config(
                "restAPI is a host and path prefix; use useSSL to pick the scheme",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(TwitterError::config("timeoutSecs must be positive"));
        }
        if self.access_key.is_some() != self.access_secret.is_some() {
            return Err(TwitterError::config(
                "accessKey and accessSecret must be given together",
            ));
        }
        Ok(())
    }

    /// Set a stored access token pair.
    pub fn with_access_token(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.access_key = Some(key.into());
        self.access_secret = Some(secret.into());
        self
    }

    pub fn with_auto_authorize(mut self, enabled: bool) -> Self {
        self.auto_authorize = enabled;
        self
    }

    pub fn with_ssl(mut self, enabled: bool) -> Self {
        self.use_ssl = enabled;
        self
    }

    pub fn with_rest_api(mut self, rest_api: impl Into<String>) -> Self {
        let mut rest_api = rest_api.into();
        if !rest_api.ends_with('/') {
            rest_api.push('/');
        }
        self.rest_api = rest_api;
        self
    }

    pub fn with_signature_method(mut self, method: SignatureMethod) -> Self {
        self.signature_method = method;
        self
    }

    /// Point all three OAuth endpoints somewhere else.
    pub fn with_oauth_urls(
        mut self,
        request_token_url: impl Into<String>,
        authorize_url: impl Into<String>,
        access_token_url: impl Into<String>,
    ) -> Self {
        self.request_token_url = request_token_url.into();
        self.authorize_url = authorize_url.into();
        self.access_token_url = access_token_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `http://` or `https://` followed by the REST prefix.
    pub fn rest_base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        let separator = if self.rest_api.ends_with('/') { "" } else { "/" };
        format!("{scheme}://{}{separator}", self.rest_api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_twitter_v1() {
        let config = TwitterConfig::new("key", "secret");
        assert_eq!(config.rest_api, "api.twitter.com/1/");
        assert_eq!(config.request_token_url, DEFAULT_REQUEST_TOKEN_URL);
        assert_eq!(config.signature_method, SignatureMethod::HmacSha1);
        assert!(!config.auto_authorize);
        assert!(!config.use_ssl);
        assert_eq!(config.rest_base_url(), "http://api.twitter.com/1/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ssl_switches_scheme() {
        let config = TwitterConfig::new("key", "secret").with_ssl(true);
        assert_eq!(config.rest_base_url(), "https://api.twitter.com/1/");
    }

    #[test]
    fn rest_api_gets_trailing_slash() {
        let config = TwitterConfig::new("key", "secret").with_rest_api("127.0.0.1:9000/1");
        assert_eq!(config.rest_api, "127.0.0.1:9000/1/");
    }

    #[test]
    fn rest_base_url_adds_missing_slash() {
        let config: TwitterConfig = serde_json::from_str(
            r#"{"consumerKey":"ck","consumerSecret":"cs","restAPI":"api.example.com/1"}"#,
        )
        .unwrap();
        assert_eq!(config.rest_base_url(), "http://api.example.com/1/");

        let mut config = TwitterConfig::new("key", "secret");
        config.rest_api = "api.example.com/1.1".to_string();
        assert_eq!(config.rest_base_url(), "http://api.example.com/1.1/");
    }

    #[test]
    fn validate_rejects_bad_options() {
        assert!(TwitterConfig::new("", "secret").validate().is_err());
        assert!(TwitterConfig::new("key", "").validate().is_err());
        assert!(TwitterConfig::new("key", "secret")
            .with_rest_api("https://api.twitter.com/1/")
            .validate()
            .is_err());
        assert!(TwitterConfig::new("key", "secret")
            .with_timeout_secs(0)
            .validate()
            .is_err());

        let mut half_token = TwitterConfig::new("key", "secret");
        half_token.access_key = Some("token".to_string());
        assert!(half_token.validate().is_err());
    }

    #[test]
    fn deserializes_camel_case_option_names() {
        let config: TwitterConfig = serde_json::from_str(
            r#"{
                "consumerKey": "ck",
                "consumerSecret": "cs",
                "accessKey": "ak",
                "accessSecret": "as",
                "autoAuthorize": true,
                "useSSL": true,
                "restAPI": "api.example.com/1/",
                "responseFormat": "json",
                "signatureMethod": "PLAINTEXT",
                "requestTokenURL": "https://example.com/rt",
                "authorizeURL": "https://example.com/a",
                "accessTokenURL": "https://example.com/at"
            }"#,
        )
        .unwrap();

        assert_eq!(config.consumer_key, "ck");
        assert_eq!(config.access_secret.as_deref(), Some("as"));
        assert!(config.auto_authorize);
        assert!(config.use_ssl);
        assert_eq!(config.rest_api, "api.example.com/1/");
        assert_eq!(config.signature_method, SignatureMethod::Plaintext);
        assert_eq!(config.access_token_url, "https://example.com/at");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn unknown_response_format_is_rejected() {
        let result: std::result::Result<TwitterConfig, _> =
            serde_json::from_str(r#"{"consumerKey":"ck","consumerSecret":"cs","responseFormat":"xml"}"#);
        assert!(result.is_err());
    }
}
