//! Calls held back until authorization completes.

use std::collections::VecDeque;

use crate::callback::CallArgs;
use crate::endpoints::{Endpoint, HttpVerb};

/// What a call is aimed at: a registered endpoint or a raw path.
#[derive(Debug, Clone)]
pub(crate) enum Target {
    Endpoint(&'static Endpoint),
    Raw { path: String, verb: HttpVerb },
}

impl Target {
    pub(crate) fn template(&self) -> &str {
        match self {
            Self::Endpoint(e) => e.template,
            Self::Raw { path, .. } => path,
        }
    }

    pub(crate) fn verb(&self) -> HttpVerb {
        match self {
            Self::Endpoint(e) => e.verb,
            Self::Raw { verb, .. } => *verb,
        }
    }

    pub(crate) fn label(&self) -> &str {
        match self {
            Self::Endpoint(e) => e.name,
            Self::Raw { path, .. } => path,
        }
    }
}

#[derive(Debug)]
pub(crate) struct PendingCall {
    pub(crate) target: Target,
    pub(crate) args: CallArgs,
}

/// FIFO of [`PendingCall`]s.
#[derive(Debug, Default)]
pub(crate) struct PendingQueue {
    entries: VecDeque<PendingCall>,
}

impl PendingQueue {
    pub(crate) fn enqueue(&mut self, call: PendingCall) {
        self.entries.push_back(call);
    }

    pub(crate) fn pop_front(&mut self) -> Option<PendingCall> {
        self.entries.pop_front()
    }

    /// Empty the queue, returning entries oldest first.
    pub(crate) fn take_all(&mut self) -> Vec<PendingCall> {
        self.entries.drain(..).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::resolve;

    fn call(name: &str) -> PendingCall {
        PendingCall {
            target: Target::Endpoint(resolve(name).unwrap()),
            args: CallArgs::new(),
        }
    }

    #[test]
    fn pops_in_enqueue_order() {
        let mut queue = PendingQueue::default();
        queue.enqueue(call("update"));
        queue.enqueue(call("destroy"));
        queue.enqueue(call("home_timeline"));

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_front())
            .map(|c| c.target.label().to_string())
            .collect();
        assert_eq!(order, ["update", "destroy", "home_timeline"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn take_all_empties_queue() {
        let mut queue = PendingQueue::default();
        queue.enqueue(call("update"));
        queue.enqueue(call("retweet"));
        let taken = queue.take_all();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].target.label(), "update");
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn raw_target_uses_path() {
        let target = Target::Raw {
            path: "statuses/show/:id".to_string(),
            verb: HttpVerb::Get,
        };
        assert_eq!(target.template(), "statuses/show/:id");
        assert_eq!(target.label(), "statuses/show/:id");
        assert_eq!(target.verb(), HttpVerb::Get);
    }
}
