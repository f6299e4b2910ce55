//! Subscription manager: registration, removal and filtered fan-out.

use crate::error::{PubSubError, Result};
use crate::types::SubscriptionId;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

use super::types::{Handler, InterestSet, Subscription};

/// Default name used in log fields.
pub(crate) const DEFAULT_NAME: &str = "pubsub";

/// Default number of subscription slots reserved up front.
pub(crate) const DEFAULT_CAPACITY: usize = 8;

/// Manages subscriptions and delivers state changes to them.
///
/// Entries are kept in registration order, which is also notification order.
/// Each entry sits behind an `Arc` so a fan-out can take a cheap copy of the
/// list and run handlers with no lock held.
///
/// Managers are only built by [`PubSub`](crate::PubSub), which owns the sole
/// delivery path. Outside the crate the type is reachable through
/// [`Observable::subscriptions`](crate::Observable::subscriptions) for the
/// control surface: subscribe, unsubscribe and inspection.
pub struct SubscriptionManager<M, S> {
    /// Active subscriptions, oldest first.
    subscriptions: RwLock<Vec<Arc<Subscription<M, S>>>>,
    /// Name reported in log fields.
    name: String,
}

impl<M, S> SubscriptionManager<M, S> {
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self::with_capacity(DEFAULT_NAME, DEFAULT_CAPACITY)
    }

    /// Create a manager with a log name and room for `capacity` entries.
    pub(crate) fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            subscriptions: RwLock::new(Vec::with_capacity(capacity)),
            name: name.into(),
        }
    }

    /// Name reported in log fields.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remove a subscription, returning its handler.
    ///
    /// The relative order of the remaining entries is kept. An unknown id
    /// leaves the manager untouched.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<Handler<M, S>> {
        let mut subs = self.subscriptions.write();
        match subs.iter().position(|sub| sub.id == id) {
            Some(index) => {
                let removed = subs.remove(index);
                debug!(pubsub = %self.name, subscription_id = %id, remaining = subs.len(), "unsubscribed");
                Ok(removed.handler.clone())
            }
            None => {
                debug!(pubsub = %self.name, subscription_id = %id, "unsubscribe: no such subscription");
                Err(PubSubError::SubscriptionNotFound(id))
            }
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Id of the subscription registered with `handler`, if any.
    pub fn subscription_id(&self, handler: &Handler<M, S>) -> Option<SubscriptionId> {
        self.subscriptions
            .read()
            .iter()
            .find(|sub| sub.handler.same_as(handler))
            .map(|sub| sub.id)
    }

    /// Whether `id` names an active subscription.
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subscriptions.read().iter().any(|sub| sub.id == id)
    }
}

impl<M: PartialEq, S> SubscriptionManager<M, S> {
    /// Register `handler` for the given message types.
    ///
    /// If the handler is already registered, its existing id is returned and
    /// nothing changes: the interest set of the first registration is kept.
    pub fn subscribe(
        &self,
        interest: impl Into<InterestSet<M>>,
        handler: &Handler<M, S>,
    ) -> SubscriptionId {
        let mut subs = self.subscriptions.write();

        if let Some(existing) = subs.iter().find(|sub| sub.handler.same_as(handler)) {
            trace!(pubsub = %self.name, subscription_id = %existing.id, "handler already subscribed");
            return existing.id;
        }

        let interest = interest.into();
        let id = SubscriptionId::generate();
        debug!(
            pubsub = %self.name,
            subscription_id = %id,
            wildcard = interest.is_wildcard(),
            interest_len = interest.types().len(),
            "subscribed"
        );

        subs.push(Arc::new(Subscription {
            id,
            handler: handler.clone(),
            interest,
        }));

        id
    }

    /// Deliver `state` to every subscription interested in `message`.
    ///
    /// Works on a copy of the list taken on entry: subscriptions added or
    /// removed by a handler take effect from the next call. A panicking
    /// handler is not caught; it unwinds out of this call and the remaining
    /// handlers are skipped. Returns the subscription count afterwards.
    pub(crate) fn notify(&self, state: &S, message: &M) -> usize {
        let subs: Vec<Arc<Subscription<M, S>>> = self.subscriptions.read().clone();

        for sub in &subs {
            if sub.interest.matches(message) {
                trace!(pubsub = %self.name, subscription_id = %sub.id, "notifying");
                sub.handler.call(state, message);
            }
        }

        self.subscription_count()
    }
}
