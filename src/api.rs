//! Named wrappers for the REST endpoints.
//!
//! Each method is a thin shim over [`TwitterClient::call`]. Methods whose
//! endpoint has a single required value take it positionally and append it to
//! the call's parameters under its Twitter name.

use crate::callback::CallArgs;
use crate::client::TwitterClient;
use crate::types::{Dispatched, ProfileImageSize};

impl TwitterClient {
    // =========================================================================
    // Timelines
    // =========================================================================

    pub async fn public_timeline(&self, args: CallArgs) -> Dispatched {
        self.call("public_timeline", args).await
    }

    pub async fn home_timeline(&self, args: CallArgs) -> Dispatched {
        self.call("home_timeline", args).await
    }

    pub async fn friends_timeline(&self, args: CallArgs) -> Dispatched {
        self.call("friends_timeline", args).await
    }

    /// Pass `user_id` or `screen_name` to read someone else's timeline.
    pub async fn user_timeline(&self, args: CallArgs) -> Dispatched {
        self.call("user_timeline", args).await
    }

    pub async fn mentions(&self, args: CallArgs) -> Dispatched {
        self.call("mentions", args).await
    }

    pub async fn retweeted_by_me(&self, args: CallArgs) -> Dispatched {
        self.call("retweeted_by_me", args).await
    }

    pub async fn retweeted_to_me(&self, args: CallArgs) -> Dispatched {
        self.call("retweeted_to_me", args).await
    }

    pub async fn retweets_of_me(&self, args: CallArgs) -> Dispatched {
        self.call("retweets_of_me", args).await
    }

    // =========================================================================
    // Statuses
    // =========================================================================

    pub async fn status(&self, id: impl ToString, args: CallArgs) -> Dispatched {
        self.call("status", args.param("id", id)).await
    }

    /// Post a tweet.
    pub async fn update(&self, status: impl ToString, args: CallArgs) -> Dispatched {
        self.call("update", args.param("status", status)).await
    }

    pub async fn destroy(&self, id: impl ToString, args: CallArgs) -> Dispatched {
        self.call("destroy", args.param("id", id)).await
    }

    pub async fn retweet(&self, id: impl ToString, args: CallArgs) -> Dispatched {
        self.call("retweet", args.param("id", id)).await
    }

    pub async fn retweets(&self, id: impl ToString, args: CallArgs) -> Dispatched {
        self.call("retweets", args.param("id", id)).await
    }

    pub async fn retweeted_by(&self, id: impl ToString, args: CallArgs) -> Dispatched {
        self.call("retweeted_by", args.param("id", id)).await
    }

    pub async fn retweeted_by_ids(&self, id: impl ToString, args: CallArgs) -> Dispatched {
        self.call("retweeted_by_ids", args.param("id", id)).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// `users/show`; pass `user_id` or `screen_name`.
    pub async fn user(&self, args: CallArgs) -> Dispatched {
        self.call("user", args).await
    }

    /// Look up several users at once. Ids and screen names are sent as
    /// comma-separated lists; empty lists are left out.
    pub async fn users_lookup<I, S>(&self, user_ids: I, screen_names: S, args: CallArgs) -> Dispatched
    where
        I: IntoIterator,
        I::Item: ToString,
        S: IntoIterator,
        S::Item: ToString,
    {
        let mut args = args;
        let user_ids: Vec<String> = user_ids.into_iter().map(|v| v.to_string()).collect();
        let screen_names: Vec<String> = screen_names.into_iter().map(|v| v.to_string()).collect();
        if !user_ids.is_empty() {
            args.params.push_list("user_id", user_ids);
        }
        if !screen_names.is_empty() {
            args.params.push_list("screen_name", screen_names);
        }
        self.call("users_lookup", args).await
    }

    pub async fn users_search(&self, q: impl ToString, args: CallArgs) -> Dispatched {
        self.call("users_search", args.param("q", q)).await
    }

    pub async fn users_suggestions(&self, args: CallArgs) -> Dispatched {
        self.call("users_suggestions", args).await
    }

    pub async fn users_profile_image(
        &self,
        screen_name: impl ToString,
        size: Option<ProfileImageSize>,
        args: CallArgs,
    ) -> Dispatched {
        let mut args = args.param("screen_name", screen_name);
        if let Some(size) = size {
            args = args.param("size", size);
        }
        self.call("users_profile_image", args).await
    }

    pub async fn users_friends(&self, args: CallArgs) -> Dispatched {
        self.call("users_friends", args).await
    }

    pub async fn users_followers(&self, args: CallArgs) -> Dispatched {
        self.call("users_followers", args).await
    }

    // =========================================================================
    // Direct messages
    // =========================================================================

    pub async fn direct_messages(&self, args: CallArgs) -> Dispatched {
        self.call("direct_messages", args).await
    }

    pub async fn direct_messages_sent(&self, args: CallArgs) -> Dispatched {
        self.call("direct_messages_sent", args).await
    }

    /// Needs `user` (or `screen_name`) and `text`.
    pub async fn direct_messages_new(&self, args: CallArgs) -> Dispatched {
        self.call("direct_messages_new", args).await
    }

    pub async fn direct_messages_destroy(&self, id: impl ToString, args: CallArgs) -> Dispatched {
        self.call("direct_messages_destroy", args.param("id", id)).await
    }

    // =========================================================================
    // Account, legal, help
    // =========================================================================

    pub async fn verify_credentials(&self, args: CallArgs) -> Dispatched {
        self.call("verify_credentials", args).await
    }

    pub async fn rate_limit_status(&self, args: CallArgs) -> Dispatched {
        self.call("rate_limit_status", args).await
    }

    pub async fn end_session(&self, args: CallArgs) -> Dispatched {
        self.call("end_session", args).await
    }

    pub async fn tos(&self, args: CallArgs) -> Dispatched {
        self.call("tos", args).await
    }

    pub async fn privacy(&self, args: CallArgs) -> Dispatched {
        self.call("privacy", args).await
    }

    pub async fn test(&self, args: CallArgs) -> Dispatched {
        self.call("test", args).await
    }
}
