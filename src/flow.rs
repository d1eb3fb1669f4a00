//! Authorization session state.
//!
//! This is the bookkeeping half of the PIN flow: which step a session is in,
//! the request token it obtained, and who is waiting for the outcome. The
//! network steps live on [`crate::TwitterClient`], which feeds events in and
//! acts on the decisions that come back.

use serde::Serialize;

use crate::callback::AuthCallbacks;
use crate::oauth::TokenPair;

/// Where the authorization flow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    Idle,
    RequestingToken,
    AwaitingUserConsent,
    ExchangingToken,
    Authorized,
    Denied,
    Failed,
}

impl AuthState {
    /// A session is running and a new one cannot start.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Self::RequestingToken | Self::AwaitingUserConsent | Self::ExchangingToken
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Authorized | Self::Denied | Self::Failed)
    }
}

/// What the client should do after a consent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConsentDecision {
    /// Event arrived outside `AwaitingUserConsent`.
    Ignore,
    /// First load of the consent page.
    Wait,
    Exchange { request_token: TokenPair, pin: String },
    Deny,
}

#[derive(Debug)]
struct Session {
    callbacks: AuthCallbacks,
    request_token: Option<TokenPair>,
    page_loads: u32,
}

#[derive(Debug, Default)]
pub(crate) struct AuthFlow {
    state: AuthState,
    session: Option<Session>,
}

impl AuthFlow {
    pub(crate) fn state(&self) -> AuthState {
        self.state
    }

    /// Start a session. Hands the callbacks back when one is already running.
    pub(crate) fn begin(&mut self, callbacks: AuthCallbacks) -> Result<(), AuthCallbacks> {
        if self.state.is_in_flight() {
            return Err(callbacks);
        }
        self.state = AuthState::RequestingToken;
        self.session = Some(Session {
            callbacks,
            request_token: None,
            page_loads: 0,
        });
        Ok(())
    }

    /// Record the request token. Returns false if the session is gone.
    pub(crate) fn token_received(&mut self, token: TokenPair) -> bool {
        match (&mut self.session, self.state) {
            (Some(session), AuthState::RequestingToken) => {
                session.request_token = Some(token);
                self.state = AuthState::AwaitingUserConsent;
                true
            }
            _ => false,
        }
    }

    /// A consent page finished loading; `pin` is what the extractor found.
    pub(crate) fn page_loaded(&mut self, pin: Option<String>) -> ConsentDecision {
        if self.state != AuthState::AwaitingUserConsent {
            return ConsentDecision::Ignore;
        }
        let Some(session) = self.session.as_mut() else {
            return ConsentDecision::Ignore;
        };
        session.page_loads += 1;
        let first_load = session.page_loads == 1;
        match pin {
            Some(pin) => self.exchange(pin),
            None if first_load => ConsentDecision::Wait,
            None => ConsentDecision::Deny,
        }
    }

    /// The host read the PIN itself.
    pub(crate) fn pin_submitted(&mut self, pin: String) -> ConsentDecision {
        if self.state != AuthState::AwaitingUserConsent {
            return ConsentDecision::Ignore;
        }
        self.exchange(pin)
    }

    /// The user closed the consent surface.
    pub(crate) fn cancelled(&mut self) -> ConsentDecision {
        if self.state != AuthState::AwaitingUserConsent {
            return ConsentDecision::Ignore;
        }
        ConsentDecision::Deny
    }

    fn exchange(&mut self, pin: String) -> ConsentDecision {
        let Some(request_token) = self
            .session
            .as_ref()
            .and_then(|s| s.request_token.clone())
        else {
            return ConsentDecision::Ignore;
        };
        self.state = AuthState::ExchangingToken;
        ConsentDecision::Exchange { request_token, pin }
    }

    /// Move to a terminal state and release the session's callbacks.
    pub(crate) fn finish(&mut self, terminal: AuthState) -> Option<AuthCallbacks> {
        debug_assert!(terminal.is_terminal());
        self.state = terminal;
        self.session.take().map(|s| s.callbacks)
    }
}
