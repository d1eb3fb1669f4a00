//! Twitter REST v1 client.
//!
//! Async dispatcher for OAuth 1.0a signed REST calls plus the PIN-based
//! authorization handshake. Calls made before an access token exists are
//! queued when `autoAuthorize` is on and replayed once the user grants
//! access.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::callback::{AuthCallbacks, CallArgs};
use crate::config::TwitterConfig;
use crate::consent::{ConsentSurface, OAuthPinExtractor, PinExtractor};
use crate::endpoints::{self, HttpVerb};
use crate::error::{Result, TwitterError};
use crate::flow::{AuthFlow, AuthState, ConsentDecision};
use crate::oauth::{
    encode_parameters, parse_token_response, percent_encode, DefaultSigner, OAuthRequest,
    OAuthSigner, SigningKeys, TokenPair,
};
use crate::params::{self, Params};
use crate::queue::{PendingCall, PendingQueue, Target};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::types::Dispatched;

/// Builder for [`TwitterClient`].
pub struct TwitterClientBuilder {
    config: TwitterConfig,
    surface: Arc<dyn ConsentSurface>,
    transport: Option<Arc<dyn Transport>>,
    signer: Option<Arc<dyn OAuthSigner>>,
    pin_extractor: Option<Arc<dyn PinExtractor>>,
}

impl TwitterClientBuilder {
    /// Replace the default `reqwest` transport.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Replace the default signer for the configured signature method.
    pub fn signer(mut self, signer: impl OAuthSigner + 'static) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    pub fn pin_extractor(mut self, extractor: impl PinExtractor + 'static) -> Self {
        self.pin_extractor = Some(Arc::new(extractor));
        self
    }

    pub fn build(self) -> Result<TwitterClient> {
        self.config.validate()?;

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(self.config.timeout())?),
        };
        let signer = self
            .signer
            .unwrap_or_else(|| Arc::new(DefaultSigner::new(self.config.signature_method)));
        let pin_extractor = self
            .pin_extractor
            .unwrap_or_else(|| Arc::new(OAuthPinExtractor));

        let access_token = match (&self.config.access_key, &self.config.access_secret) {
            (Some(token), Some(secret)) => Some(TokenPair {
                token: token.clone(),
                secret: secret.clone(),
            }),
            _ => None,
        };

        debug!(
            rest = %self.config.rest_base_url(),
            authorized = access_token.is_some(),
            auto_authorize = self.config.auto_authorize,
            "Twitter client created"
        );

        Ok(TwitterClient {
            inner: Arc::new(Inner {
                config: self.config,
                transport,
                signer,
                surface: self.surface,
                pin_extractor,
                state: Mutex::new(ClientState {
                    access_token,
                    queue: PendingQueue::default(),
                    flow: AuthFlow::default(),
                }),
            }),
        })
    }
}

struct ClientState {
    access_token: Option<TokenPair>,
    queue: PendingQueue,
    flow: AuthFlow,
}

struct Inner {
    config: TwitterConfig,
    transport: Arc<dyn Transport>,
    signer: Arc<dyn OAuthSigner>,
    surface: Arc<dyn ConsentSurface>,
    pin_extractor: Arc<dyn PinExtractor>,
    state: Mutex<ClientState>,
}

/// Twitter REST v1 client.
///
/// Cloning is cheap; clones share credentials, the pending queue and the
/// authorization flow.
#[derive(Clone)]
pub struct TwitterClient {
    inner: Arc<Inner>,
}

impl TwitterClient {
    /// Create a client with the default transport, signer and PIN extractor.
    pub fn new(config: TwitterConfig, surface: impl ConsentSurface + 'static) -> Result<Self> {
        Self::builder(config, surface).build()
    }

    pub fn builder(
        config: TwitterConfig,
        surface: impl ConsentSurface + 'static,
    ) -> TwitterClientBuilder {
        TwitterClientBuilder {
            config,
            surface: Arc::new(surface),
            transport: None,
            signer: None,
            pin_extractor: None,
        }
    }

    pub fn config(&self) -> &TwitterConfig {
        &self.inner.config
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Both halves of the access token are present.
    pub async fn is_authorized(&self) -> bool {
        self.inner.state.lock().await.access_token.is_some()
    }

    pub async fn access_token(&self) -> Option<TokenPair> {
        self.inner.state.lock().await.access_token.clone()
    }

    /// Install a previously stored access token.
    pub async fn set_access_token(&self, token: TokenPair) {
        self.inner.state.lock().await.access_token = Some(token);
    }

    /// Forget the access token.
    pub async fn clear_access_token(&self) {
        self.inner.state.lock().await.access_token = None;
    }

    pub async fn auth_state(&self) -> AuthState {
        self.inner.state.lock().await.flow.state()
    }

    /// Number of calls waiting for authorization.
    pub async fn pending_len(&self) -> usize {
        self.inner.state.lock().await.queue.len()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Call a registered endpoint by name.
    pub async fn call(&self, name: &str, args: CallArgs) -> Dispatched {
        match endpoints::resolve(name) {
            Ok(endpoint) => self.dispatch(Target::Endpoint(endpoint), args).await,
            Err(err) => {
                warn!(name, "Unknown Twitter endpoint");
                let (_, completion) = args.into_parts();
                completion.deliver(Err(err), name);
                Dispatched::Sent
            }
        }
    }

    /// Call an arbitrary REST path, e.g. `"statuses/show/:id"`, without the
    /// format suffix.
    pub async fn request(&self, path: &str, verb: HttpVerb, args: CallArgs) -> Dispatched {
        let target = Target::Raw {
            path: path.trim_start_matches('/').to_string(),
            verb,
        };
        self.dispatch(target, args).await
    }

    async fn dispatch(&self, target: Target, args: CallArgs) -> Dispatched {
        let ready = {
            let mut state = self.inner.state.lock().await;
            if self.inner.config.auto_authorize && state.access_token.is_none() {
                debug!(call = target.label(), "No access token, queuing call");
                state.queue.enqueue(PendingCall { target, args });
                Err(state.flow.begin(background_callbacks()).is_ok())
            } else {
                Ok((state.access_token.clone(), target, args))
            }
        };

        let (access_token, target, args) = match ready {
            Ok(parts) => parts,
            Err(start_auth) => {
                if start_auth {
                    self.request_token().await;
                }
                return Dispatched::Queued;
            }
        };

        let label = target.label().to_string();
        let (params, completion) = args.into_parts();
        let outcome = self.execute(&target, params, access_token.as_ref()).await;
        completion.deliver(outcome, &label);
        Dispatched::Sent
    }

    async fn execute(
        &self,
        target: &Target,
        params: Params,
        access_token: Option<&TokenPair>,
    ) -> Result<Value> {
        let config = &self.inner.config;
        let (path, remaining) = params::bind(target.template(), params)?;
        let url = format!(
            "{}{}.{}",
            config.rest_base_url(),
            path,
            config.response_format.extension()
        );
        let verb = target.verb();

        let mut request = OAuthRequest::new(verb, url.clone());
        request.push("oauth_consumer_key", config.consumer_key.clone());
        request.push("oauth_signature_method", config.signature_method.as_str());
        if let Some(token) = access_token {
            request.push("oauth_token", token.token.clone());
        }
        for (key, value) in remaining {
            request.push(key, value);
        }

        let keys = SigningKeys {
            consumer_secret: &config.consumer_secret,
            token_secret: access_token.map(|t| t.secret.as_str()).unwrap_or(""),
        };
        self.sign(&mut request, &keys)?;

        let http = into_http_request(request);
        info!("{} {}", verb, url);
        let response = self.send(http).await?;

        if !response.is_ok() {
            debug!(status = response.status, url = %url, "Twitter API returned an error");
            return Err(TwitterError::HttpRequestFailed { response });
        }
        let decoded = serde_json::from_str::<Value>(&response.body);
        decoded.map_err(|e| TwitterError::ResponseDecodeFailed {
            message: e.to_string(),
            response,
        })
    }

    fn sign(&self, request: &mut OAuthRequest, keys: &SigningKeys<'_>) -> Result<()> {
        self.inner.signer.attach_timestamp_and_nonce(request);
        self.inner.signer.sign(request, keys)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let secs = self.inner.config.timeout_secs;
        tokio::time::timeout(
            self.inner.config.timeout(),
            self.inner.transport.execute(request),
        )
        .await
        .map_err(|_| TwitterError::Timeout(secs))?
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    /// Run the PIN authorization flow.
    ///
    /// Returns once the consent page has been presented (or the token request
    /// failed); the outcome reaches `callbacks` when the flow ends. Fails the
    /// caller with [`TwitterError::AuthorizationInProgress`] while another
    /// session is running.
    pub async fn authorize(&self, callbacks: AuthCallbacks) {
        let begun = self.inner.state.lock().await.flow.begin(callbacks);
        match begun {
            Ok(()) => self.request_token().await,
            Err(callbacks) => {
                warn!("Authorization already in progress");
                callbacks
                    .0
                    .deliver(Err(TwitterError::AuthorizationInProgress), "authorize");
            }
        }
    }

    /// Report that the consent surface finished loading a page.
    pub async fn page_loaded(&self, page_content: &str) {
        let pin = self.inner.pin_extractor.extract_pin(page_content);
        let decision = self.inner.state.lock().await.flow.page_loaded(pin);
        self.act_on(decision, "page load").await;
    }

    /// Hand over a PIN the user typed in.
    pub async fn submit_pin(&self, pin: &str) {
        let decision = self
            .inner
            .state
            .lock()
            .await
            .flow
            .pin_submitted(pin.trim().to_string());
        self.act_on(decision, "PIN submission").await;
    }

    /// Report that the user closed the consent surface.
    pub async fn cancel_authorization(&self) {
        let decision = self.inner.state.lock().await.flow.cancelled();
        self.act_on(decision, "cancellation").await;
    }

    async fn act_on(&self, decision: ConsentDecision, event: &str) {
        match decision {
            ConsentDecision::Ignore => {
                debug!(event, "Ignoring consent event outside of user consent")
            }
            ConsentDecision::Wait => debug!("Consent page loaded, waiting for the user"),
            ConsentDecision::Exchange { request_token, pin } => {
                self.exchange_token(request_token, pin).await
            }
            ConsentDecision::Deny => {
                self.finish_with_failure(TwitterError::UserDeniedAuthorization)
                    .await
            }
        }
    }

    async fn request_token(&self) {
        debug!("Requesting OAuth request token");
        match self.fetch_request_token().await {
            Ok(token) => {
                let url = format!(
                    "{}?oauth_token={}",
                    self.inner.config.authorize_url,
                    percent_encode(&token.token)
                );
                let still_running = self.inner.state.lock().await.flow.token_received(token);
                if still_running {
                    debug!(url = %url, "Presenting authorization page");
                    self.inner.surface.present(&url);
                }
            }
            Err(err) => self.finish_with_failure(err).await,
        }
    }

    async fn fetch_request_token(&self) -> Result<TokenPair> {
        let config = &self.inner.config;
        let mut request = OAuthRequest::new(HttpVerb::Post, config.request_token_url.clone());
        request.push("oauth_consumer_key", config.consumer_key.clone());
        request.push("oauth_signature_method", config.signature_method.as_str());
        request.push("oauth_callback", "oob");
        let keys = SigningKeys {
            consumer_secret: &config.consumer_secret,
            token_secret: "",
        };
        self.sign(&mut request, &keys)?;

        let response = self
            .send(into_http_request(request))
            .await
            .map_err(|e| TwitterError::TokenRequestFailed(e.to_string()))?;
        token_from_response(&response).ok_or_else(|| {
            TwitterError::TokenRequestFailed(format!(
                "HTTP {}: {}",
                response.status, response.body
            ))
        })
    }

    async fn exchange_token(&self, request_token: TokenPair, pin: String) {
        debug!("Exchanging PIN for access token");
        match self.fetch_access_token(&request_token, &pin).await {
            Ok(access_token) => {
                let callbacks = {
                    let mut state = self.inner.state.lock().await;
                    state.access_token = Some(access_token.clone());
                    state.flow.finish(AuthState::Authorized)
                };
                info!("Twitter authorization granted");
                self.inner.surface.dismiss();
                if let Some(callbacks) = callbacks {
                    callbacks.0.deliver(Ok(access_token), "authorize");
                }
                self.process_queue().await;
            }
            Err(err) => self.finish_with_failure(err).await,
        }
    }

    async fn fetch_access_token(&self, request_token: &TokenPair, pin: &str) -> Result<TokenPair> {
        let config = &self.inner.config;
        let mut request = OAuthRequest::new(HttpVerb::Post, config.access_token_url.clone());
        request.push("oauth_consumer_key", config.consumer_key.clone());
        request.push("oauth_signature_method", config.signature_method.as_str());
        request.push("oauth_token", request_token.token.clone());
        request.push("oauth_verifier", pin);
        let keys = SigningKeys {
            consumer_secret: &config.consumer_secret,
            token_secret: &request_token.secret,
        };
        self.sign(&mut request, &keys)?;

        let response = self
            .send(into_http_request(request))
            .await
            .map_err(|e| TwitterError::TokenExchangeFailed(e.to_string()))?;
        token_from_response(&response).ok_or_else(|| {
            TwitterError::TokenExchangeFailed(format!(
                "HTTP {}: {}",
                response.status, response.body
            ))
        })
    }

    async fn finish_with_failure(&self, err: TwitterError) {
        let terminal = match err {
            TwitterError::UserDeniedAuthorization => AuthState::Denied,
            _ => AuthState::Failed,
        };
        let (callbacks, abandoned) = {
            let mut state = self.inner.state.lock().await;
            (state.flow.finish(terminal), state.queue.take_all())
        };
        warn!(
            error = %err,
            abandoned = abandoned.len(),
            "Twitter authorization did not complete"
        );

        self.inner.surface.dismiss();
        if let Some(callbacks) = callbacks {
            callbacks.0.deliver(Err(err), "authorize");
        }
        for call in abandoned {
            let (_, completion) = call.args.into_parts();
            completion.deliver(Err(TwitterError::AuthorizationAbandoned), call.target.label());
        }
    }

    async fn process_queue(&self) {
        loop {
            let next = {
                let mut state = self.inner.state.lock().await;
                if state.access_token.is_some() {
                    Ok(state.queue.pop_front())
                } else if !state.queue.is_empty() {
                    Err(state.flow.begin(background_callbacks()).is_ok())
                } else {
                    Ok(None)
                }
            };

            match next {
                Ok(Some(call)) => {
                    debug!(call = call.target.label(), "Replaying queued call");
                    if self.dispatch(call.target, call.args).await == Dispatched::Queued {
                        break;
                    }
                }
                Ok(None) => break,
                Err(start_auth) => {
                    debug!("Access token cleared during replay, leaving calls queued");
                    if start_auth {
                        self.request_token().await;
                    }
                    return;
                }
            }
        }
        debug!("Queue processed");
    }
}

impl std::fmt::Debug for TwitterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("rest_api", &self.inner.config.rest_api)
            .field("auto_authorize", &self.inner.config.auto_authorize)
            .finish_non_exhaustive()
    }
}

/// Callbacks for a session started by a queued call rather than by a host
/// `authorize` call.
fn background_callbacks() -> AuthCallbacks {
    AuthCallbacks::new()
        .on_success(|_| debug!("Automatic authorization completed"))
        .on_failure(|err| debug!(error = %err, "Automatic authorization failed"))
}

/// GET carries the parameters in the query string, everything else in a
/// form body.
fn into_http_request(request: OAuthRequest) -> HttpRequest {
    let encoded = encode_parameters(&request.parameters);
    match request.verb {
        HttpVerb::Get if encoded.is_empty() => HttpRequest::new(HttpVerb::Get, request.url),
        HttpVerb::Get => {
            let separator = if request.url.contains('?') { '&' } else { '?' };
            HttpRequest::new(
                HttpVerb::Get,
                format!("{}{}{}", request.url, separator, encoded),
            )
        }
        verb => HttpRequest::form(verb, request.url, encoded),
    }
}

fn token_from_response(response: &HttpResponse) -> Option<TokenPair> {
    if !response.is_ok() {
        return None;
    }
    parse_token_response(&response.body)
}
