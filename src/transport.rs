//! HTTP transport seam.
//!
//! The client describes every request as plain data and hands it to a
//! [`Transport`]. [`ReqwestTransport`] is the default; hosts with their own
//! network stack (or tests) plug in another implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method};

use crate::endpoints::HttpVerb;
use crate::error::{Result, TwitterError};

/// Content type used for every request body the client sends.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub verb: HttpVerb,
    /// Absolute URL, query string included
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A bodiless request.
    pub fn new(verb: HttpVerb, url: impl Into<String>) -> Self {
        Self {
            verb,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A request carrying an urlencoded form body.
    pub fn form(verb: HttpVerb, url: impl Into<String>, body: String) -> Self {
        Self {
            verb,
            url: url.into(),
            headers: vec![(CONTENT_TYPE.as_str().to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(body),
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Executes one HTTP round-trip.
///
/// Non-2xx statuses are data, not errors: implementations return them as an
/// [`HttpResponse`] and only fail when no response was obtained at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TwitterError::config(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.verb {
            HttpVerb::Get => Method::GET,
            HttpVerb::Post => Method::POST,
            HttpVerb::Delete => Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn non_success_status_is_returned_as_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1/help/test.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let response = transport
            .execute(HttpRequest::new(
                HttpVerb::Get,
                format!("{}/1/help/test.json", server.uri()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(response.body, "nope");
        assert!(!response.is_ok());
    }

    #[tokio::test]
    async fn form_body_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", FORM_CONTENT_TYPE))
            .and(body_string("status=hi"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let response = transport
            .execute(HttpRequest::form(
                HttpVerb::Post,
                format!("{}/1/statuses/update.json", server.uri()),
                "status=hi".to_string(),
            ))
            .await
            .unwrap();

        assert!(response.is_ok());
    }
}
