//! Outcome delivery for API calls and authorization.
//!
//! A [`Completion`] is consumed when its outcome is delivered, so each call
//! reports at most once and to exactly one side: `on_success` or
//! `on_failure`, or the single value sent down a oneshot channel.

use std::fmt;

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::error::{Result, TwitterError};
use crate::oauth::TokenPair;
use crate::params::Params;

pub type SuccessFn<T> = Box<dyn FnOnce(T) + Send>;
pub type FailureFn = Box<dyn FnOnce(TwitterError) + Send>;

/// Where the single outcome of an operation goes.
pub enum Completion<T> {
    Callbacks {
        on_success: Option<SuccessFn<T>>,
        on_failure: Option<FailureFn>,
    },
    Channel(oneshot::Sender<Result<T>>),
}

impl<T> Default for Completion<T> {
    fn default() -> Self {
        Self::Callbacks {
            on_success: None,
            on_failure: None,
        }
    }
}

impl<T> Completion<T> {
    /// A completion that resolves the returned receiver.
    pub fn channel() -> (Self, oneshot::Receiver<Result<T>>) {
        let (tx, rx) = oneshot::channel();
        (Self::Channel(tx), rx)
    }

    fn set_success(&mut self, f: SuccessFn<T>) {
        match self {
            Self::Callbacks { on_success, .. } => *on_success = Some(f),
            Self::Channel(_) => {
                *self = Self::Callbacks {
                    on_success: Some(f),
                    on_failure: None,
                }
            }
        }
    }

    fn set_failure(&mut self, f: FailureFn) {
        match self {
            Self::Callbacks { on_failure, .. } => *on_failure = Some(f),
            Self::Channel(_) => {
                *self = Self::Callbacks {
                    on_success: None,
                    on_failure: Some(f),
                }
            }
        }
    }

    /// Hand `outcome` to the matching side. `context` names the operation in
    /// diagnostics when that side was left unset.
    pub fn deliver(self, outcome: Result<T>, context: &str) {
        match self {
            Self::Channel(tx) => {
                if tx.send(outcome).is_err() {
                    debug!(context, "Outcome receiver dropped");
                }
            }
            Self::Callbacks {
                on_success,
                on_failure,
            } => match outcome {
                Ok(value) => match on_success {
                    Some(f) => f(value),
                    None => error!(
                        context,
                        "Twitter request succeeded but no on_success callback was supplied"
                    ),
                },
                Err(err) => match on_failure {
                    Some(f) => f(err),
                    None => error!(
                        context,
                        error = %err,
                        "Twitter request failed and no on_failure callback was supplied"
                    ),
                },
            },
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callbacks {
                on_success,
                on_failure,
            } => f
                .debug_struct("Callbacks")
                .field("on_success", &on_success.is_some())
                .field("on_failure", &on_failure.is_some())
                .finish(),
            Self::Channel(_) => f.write_str("Channel"),
        }
    }
}

/// Arguments of one API call: request parameters plus outcome delivery.
#[derive(Debug, Default)]
pub struct CallArgs {
    pub params: Params,
    pub(crate) completion: Completion<Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments whose outcome arrives on the returned receiver.
    pub fn channel() -> (Self, oneshot::Receiver<Result<Value>>) {
        let (completion, rx) = Completion::channel();
        (
            Self {
                params: Params::new(),
                completion,
            },
            rx,
        )
    }

    pub fn params(mut self, params: impl Into<Params>) -> Self {
        self.params = params.into();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push(key, value);
        self
    }

    /// Called with the decoded JSON body. Replaces channel delivery.
    pub fn on_success(mut self, f: impl FnOnce(Value) + Send + 'static) -> Self {
        self.completion.set_success(Box::new(f));
        self
    }

    /// Called with the failure. Replaces channel delivery.
    pub fn on_failure(mut self, f: impl FnOnce(TwitterError) + Send + 'static) -> Self {
        self.completion.set_failure(Box::new(f));
        self
    }

    pub(crate) fn into_parts(self) -> (Params, Completion<Value>) {
        (self.params, self.completion)
    }
}

/// Outcome delivery for [`crate::TwitterClient::authorize`].
#[derive(Debug, Default)]
pub struct AuthCallbacks(pub(crate) Completion<TokenPair>);

impl AuthCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel() -> (Self, oneshot::Receiver<Result<TokenPair>>) {
        let (completion, rx) = Completion::channel();
        (Self(completion), rx)
    }

    /// Called with the newly issued access token pair.
    pub fn on_success(mut self, f: impl FnOnce(TokenPair) + Send + 'static) -> Self {
        self.0.set_success(Box::new(f));
        self
    }

    pub fn on_failure(mut self, f: impl FnOnce(TwitterError) + Send + 'static) -> Self {
        self.0.set_failure(Box::new(f));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_args(successes: &Arc<AtomicUsize>, failures: &Arc<AtomicUsize>) -> CallArgs {
        let s = Arc::clone(successes);
        let f = Arc::clone(failures);
        CallArgs::new()
            .on_success(move |_| {
                s.fetch_add(1, Ordering::SeqCst);
            })
            .on_failure(move |_| {
                f.fetch_add(1, Ordering::SeqCst);
            })
    }

    #[test]
    fn success_reaches_only_on_success() {
        let successes = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));
        let (_, completion) = counting_args(&successes, &failures).into_parts();
        completion.deliver(Ok(Value::Null), "test");
        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(failures.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failure_reaches_only_on_failure() {
        let successes = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));
        let (_, completion) = counting_args(&successes, &failures).into_parts();
        completion.deliver(Err(TwitterError::AuthorizationAbandoned), "test");
        assert_eq!(successes.load(Ordering::SeqCst), 0);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_callbacks_do_not_panic() {
        let (_, completion) = CallArgs::new().into_parts();
        completion.deliver(Err(TwitterError::UserDeniedAuthorization), "test");
        let (_, completion) = CallArgs::new().into_parts();
        completion.deliver(Ok(Value::Null), "test");
    }

    #[test]
    fn channel_receives_outcome() {
        let (args, mut rx) = CallArgs::channel();
        let (_, completion) = args.into_parts();
        completion.deliver(Ok(serde_json::json!({"ok": true})), "test");
        let value = rx.try_recv().unwrap().unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn dropped_receiver_is_tolerated() {
        let (args, rx) = CallArgs::channel();
        drop(rx);
        let (_, completion) = args.into_parts();
        completion.deliver(Ok(Value::Null), "test");
    }

    #[test]
    fn params_builder_keeps_order() {
        let args = CallArgs::new().param("since_id", 50).param("count", 12);
        let pairs = args.params.into_vec();
        assert_eq!(pairs[0], ("since_id".to_string(), "50".to_string()));
        assert_eq!(pairs[1], ("count".to_string(), "12".to_string()));
    }
}
