//! Static table of Twitter REST v1 endpoints.
//!
//! Each wrapper method on [`crate::TwitterClient`] is registered here under its
//! own name together with the path template and HTTP verb it maps to. Path
//! templates are relative to the configured REST API prefix and carry no
//! format suffix; `:name` segments are filled in by [`crate::params::bind`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TwitterError};

/// HTTP verb used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Delete,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One remote API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Logical method name
    pub name: &'static str,
    /// Path template, may contain `:placeholder` segments
    pub template: &'static str,
    /// HTTP verb
    pub verb: HttpVerb,
}

const fn get(name: &'static str, template: &'static str) -> Endpoint {
    Endpoint {
        name,
        template,
        verb: HttpVerb::Get,
    }
}

const fn post(name: &'static str, template: &'static str) -> Endpoint {
    Endpoint {
        name,
        template,
        verb: HttpVerb::Post,
    }
}

const fn delete(name: &'static str, template: &'static str) -> Endpoint {
    Endpoint {
        name,
        template,
        verb: HttpVerb::Delete,
    }
}

/// Every endpoint the client knows about.
pub static ENDPOINTS: &[Endpoint] = &[
    // Timelines
    get("public_timeline", "statuses/public_timeline"),
    get("home_timeline", "statuses/home_timeline"),
    get("friends_timeline", "statuses/friends_timeline"),
    get("user_timeline", "statuses/user_timeline"),
    get("mentions", "statuses/mentions"),
    get("retweeted_by_me", "statuses/retweeted_by_me"),
    get("retweeted_to_me", "statuses/retweeted_to_me"),
    get("retweets_of_me", "statuses/retweets_of_me"),
    // Tweets
    get("status", "statuses/show/:id"),
    post("update", "statuses/update"),
    post("destroy", "statuses/destroy/:id"),
    post("retweet", "statuses/retweet/:id"),
    get("retweets", "statuses/retweets/:id"),
    get("retweeted_by", "statuses/:id/retweeted_by"),
    get("retweeted_by_ids", "statuses/:id/retweeted_by/ids"),
    // Users
    get("user", "users/show"),
    get("users_lookup", "users/lookup"),
    get("users_search", "users/search"),
    get("users_suggestions", "users/suggestions"),
    get("users_profile_image", "users/profile_image/:screen_name"),
    get("users_friends", "statuses/friends"),
    get("users_followers", "statuses/followers"),
    // Direct messages
    get("direct_messages", "direct_messages"),
    get("direct_messages_sent", "direct_messages/sent"),
    post("direct_messages_new", "direct_messages/new"),
    delete("direct_messages_destroy", "direct_messages/destroy/:id"),
    // Account
    get("verify_credentials", "account/verify_credentials"),
    get("rate_limit_status", "account/rate_limit_status"),
    get("end_session", "account/end_session"),
    // Legal
    get("tos", "legal/tos"),
    get("privacy", "legal/privacy"),
    // Help
    get("test", "help/test"),
];

/// Look up an endpoint by its logical name.
pub fn resolve(name: &str) -> Result<&'static Endpoint> {
    ENDPOINTS
        .iter()
        .find(|e| e.name == name)
        .ok_or_else(|| TwitterError::UnknownEndpoint(name.to_string()))
}
