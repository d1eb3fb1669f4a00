//! Recording stand-ins for the transport and the consent surface.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use elizaos_twitter_v1::{
    ConsentSurface, HttpRequest, HttpResponse, HttpVerb, Result, Transport, TwitterClient,
    TwitterConfig,
};

pub const REQUEST_TOKEN_BODY: &str =
    "oauth_token=rt&oauth_token_secret=rts&oauth_callback_confirmed=true";
pub const ACCESS_TOKEN_BODY: &str =
    "oauth_token=at&oauth_token_secret=ats&user_id=12&screen_name=pinbird";
pub const PIN_PAGE: &str = r#"<html><body><div id="oauth_pin"><code>1234567</code></div></body></html>"#;
pub const CONSENT_PAGE: &str = r#"<html><body><form id="oauth_form"></form></body></html>"#;

pub fn test_config() -> TwitterConfig {
    TwitterConfig::new("ck", "cs")
}

/// Transport answering from a table of URL fragments and recording every
/// request it sees.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    routes: Arc<Mutex<Vec<(String, HttpResponse)>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    delay: Option<Duration>,
    token_reset: Arc<Mutex<Option<(String, TwitterClient)>>>,
}

impl ScriptedTransport {
    /// Answers the three OAuth endpoints successfully and everything else
    /// with `{}`.
    pub fn authorizing() -> Self {
        Self::default()
            .route("oauth/request_token", HttpResponse::new(200, REQUEST_TOKEN_BODY))
            .route("oauth/access_token", HttpResponse::new(200, ACCESS_TOKEN_BODY))
    }

    /// First matching fragment wins.
    pub fn route(self, fragment: &str, response: HttpResponse) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((fragment.to_string(), response));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Clear `client`'s access token when the first request matching
    /// `fragment` arrives, the way a host reacting to a 401 would.
    pub fn clear_token_on(&self, fragment: &str, client: &TwitterClient) {
        *self.token_reset.lock().unwrap() = Some((fragment.to_string(), client.clone()));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Request URLs without their query strings.
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.url.split('?').next().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let reset = {
            let mut slot = self.token_reset.lock().unwrap();
            let hit = slot
                .as_ref()
                .is_some_and(|(fragment, _)| request.url.contains(fragment.as_str()));
            if hit {
                slot.take().map(|(_, client)| client)
            } else {
                None
            }
        };
        if let Some(client) = reset {
            client.clear_access_token().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let routes = self.routes.lock().unwrap();
        let response = routes
            .iter()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| HttpResponse::new(200, "{}"));
        Ok(response)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Present(String),
    Dismiss,
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl RecordingSurface {
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ConsentSurface for RecordingSurface {
    fn present(&self, url: &str) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Present(url.to_string()));
    }

    fn dismiss(&self) {
        self.events.lock().unwrap().push(SurfaceEvent::Dismiss);
    }
}

/// Parameters of a request, from the query string for GET and from the form
/// body otherwise.
pub fn sent_params(request: &HttpRequest) -> HashMap<String, String> {
    let encoded = match request.verb {
        HttpVerb::Get => request.url.split_once('?').map(|(_, q)| q).unwrap_or(""),
        _ => request.body.as_deref().unwrap_or(""),
    };
    url::form_urlencoded::parse(encoded.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Shared log the callbacks of a test append to.
#[derive(Clone, Default)]
pub struct OutcomeLog(Arc<Mutex<Vec<String>>>);

impl OutcomeLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
