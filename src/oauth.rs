//! OAuth 1.0a request signing.
//!
//! Parameters travel in the query string or form body rather than an
//! `Authorization` header, so signing works on the full parameter list of an
//! [`OAuthRequest`] and appends `oauth_signature` to it.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use url::Url;

use crate::endpoints::HttpVerb;
use crate::error::{Result, TwitterError};

pub const OAUTH_VERSION: &str = "1.0";

/// Signature method announced in `oauth_signature_method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignatureMethod {
    #[default]
    #[serde(rename = "HMAC-SHA1")]
    HmacSha1,
    #[serde(rename = "PLAINTEXT")]
    Plaintext,
}

impl SignatureMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HMAC-SHA1",
            Self::Plaintext => "PLAINTEXT",
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = TwitterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "HMAC-SHA1" => Ok(Self::HmacSha1),
            "PLAINTEXT" => Ok(Self::Plaintext),
            other => Err(TwitterError::config(format!(
                "Unsupported signature method: {other}"
            ))),
        }
    }
}

/// A request as seen by the signer: verb, URL without query, and every
/// parameter that will be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRequest {
    pub verb: HttpVerb,
    pub url: String,
    pub parameters: Vec<(String, String)>,
}

impl OAuthRequest {
    pub fn new(verb: HttpVerb, url: impl Into<String>) -> Self {
        Self {
            verb,
            url: url.into(),
            parameters: Vec::new(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.push((key.into(), value.into()));
    }

    /// Replace every value stored under `key` with a single `value`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.parameters.retain(|(k, _)| k != key);
        self.parameters.push((key.to_string(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Secrets used to build the signing key.
#[derive(Debug, Clone, Copy)]
pub struct SigningKeys<'a> {
    pub consumer_secret: &'a str,
    /// Access token secret, request token secret, or empty while no token exists yet
    pub token_secret: &'a str,
}

/// Attaches the per-request OAuth values and the signature.
pub trait OAuthSigner: Send + Sync {
    fn attach_timestamp_and_nonce(&self, request: &mut OAuthRequest);

    fn sign(&self, request: &mut OAuthRequest, keys: &SigningKeys<'_>) -> Result<()>;
}

/// Signer for `HMAC-SHA1` and `PLAINTEXT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSigner {
    method: SignatureMethod,
}

impl DefaultSigner {
    pub fn new(method: SignatureMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> SignatureMethod {
        self.method
    }
}

impl OAuthSigner for DefaultSigner {
    fn attach_timestamp_and_nonce(&self, request: &mut OAuthRequest) {
        request.set("oauth_timestamp", Utc::now().timestamp().to_string());
        request.set("oauth_nonce", generate_nonce());
        request.set("oauth_version", OAUTH_VERSION);
    }

    fn sign(&self, request: &mut OAuthRequest, keys: &SigningKeys<'_>) -> Result<()> {
        request.parameters.retain(|(k, _)| k != "oauth_signature");
        request.set("oauth_signature_method", self.method.as_str());

        let key = signing_key(keys);
        let signature = match self.method {
            SignatureMethod::Plaintext => key,
            SignatureMethod::HmacSha1 => {
                let base = signature_base_string(request.verb, &request.url, &request.parameters)?;
                hmac_sha1(&key, &base)?
            }
        };

        request.push("oauth_signature", signature);
        Ok(())
    }
}

/// Percent-encode per RFC 3986 (unreserved characters pass through).
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Encode parameters as `k=v&k=v` in their given order.
pub fn encode_parameters<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    params
        .into_iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode an urlencoded `k=v&k=v` string.
pub fn decode_parameters(encoded: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(encoded.trim().as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Token pair returned by the request-token and access-token endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub token: String,
    pub secret: String,
}

/// Pull `oauth_token` / `oauth_token_secret` out of a token endpoint body.
pub fn parse_token_response(body: &str) -> Option<TokenPair> {
    let params = decode_parameters(body);
    let find = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    };
    Some(TokenPair {
        token: find("oauth_token")?,
        secret: find("oauth_token_secret")?,
    })
}

fn signing_key(keys: &SigningKeys<'_>) -> String {
    format!(
        "{}&{}",
        percent_encode(keys.consumer_secret),
        percent_encode(keys.token_secret)
    )
}

/// Build the OAuth 1.0a signature base string.
///
/// Query parameters already present on `url` take part in the signature and
/// are dropped from the normalized base URL.
pub fn signature_base_string(
    verb: HttpVerb,
    url: &str,
    params: &[(String, String)],
) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| TwitterError::Signature(format!("{url}: {e}")))?;

    let mut base_url = format!(
        "{}://{}",
        parsed.scheme(),
        parsed.host_str().unwrap_or("").to_ascii_lowercase()
    );
    if let Some(port) = parsed.port() {
        base_url.push_str(&format!(":{port}"));
    }
    base_url.push_str(parsed.path());

    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(
            parsed
                .query_pairs()
                .map(|(k, v)| (percent_encode(&k), percent_encode(&v))),
        )
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        verb.as_str(),
        percent_encode(&base_url),
        percent_encode(&param_string)
    ))
}

fn hmac_sha1(key: &str, text: &str) -> Result<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| TwitterError::Signature(e.to_string()))?;
    mac.update(text.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
