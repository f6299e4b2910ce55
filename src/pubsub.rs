//! `PubSub` ties a state cell to its subscribers.

use crate::error::Result;
use crate::state::{StateCell, StateSnapshot};
use crate::subscriptions::{
    Handler, InterestSet, SubscriptionManager, DEFAULT_CAPACITY, DEFAULT_NAME,
};
use crate::types::{SubscriptionId, Timestamp};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// PubSub configuration.
#[derive(Clone, Debug)]
pub struct PubSubConfig {
    /// Name reported in log fields.
    /// Default: "pubsub"
    pub name: String,

    /// Subscription slots reserved up front.
    /// Default: 8
    pub initial_capacity: usize,
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// The public control surface: anything callers may do without being able
/// to change the state.
///
/// Domain types keep their [`PubSub`] private and implement this trait by
/// handing out its subscription manager, so outside code can subscribe but
/// never publish.
pub trait Observable<M: PartialEq, S> {
    /// Subscription manager backing this observable.
    fn subscriptions(&self) -> &SubscriptionManager<M, S>;

    /// See [`SubscriptionManager::subscribe`].
    fn subscribe(
        &self,
        interest: impl Into<InterestSet<M>>,
        handler: &Handler<M, S>,
    ) -> SubscriptionId {
        self.subscriptions().subscribe(interest, handler)
    }

    /// See [`SubscriptionManager::unsubscribe`].
    fn unsubscribe(&self, id: SubscriptionId) -> Result<Handler<M, S>> {
        self.subscriptions().unsubscribe(id)
    }

    /// Number of active subscriptions.
    fn subscription_count(&self) -> usize {
        self.subscriptions().subscription_count()
    }

    /// See [`SubscriptionManager::subscription_id`].
    fn subscription_id(&self, handler: &Handler<M, S>) -> Option<SubscriptionId> {
        self.subscriptions().subscription_id(handler)
    }
}

/// A piece of state and the handlers watching it.
///
/// Holding a `PubSub` is the mutator capability: whoever owns it can publish.
/// Every publish stores the new snapshot first, then calls each matching
/// handler in registration order before returning.
///
/// # Example
///
/// ```ignore
/// let hub = PubSub::new(Settings::default());
/// let handler = Handler::new(|s: &Settings, _: &Message| println!("{:?}", s.theme));
/// hub.subscribe(Some(Message::SetTheme), &handler);
///
/// hub.publish_with(Message::SetTheme, |prev| Settings { theme: Theme::Light, ..*prev });
/// ```
pub struct PubSub<M, S> {
    /// Current value and timestamp.
    state: StateCell<S>,

    /// Registered handlers.
    subscriptions: SubscriptionManager<M, S>,
}

impl<M: PartialEq, S> PubSub<M, S> {
    /// Create a pubsub holding `initial` with default configuration.
    pub fn new(initial: S) -> Self {
        Self::with_config(initial, PubSubConfig::default())
    }

    /// Create a pubsub holding `initial`.
    pub fn with_config(initial: S, config: PubSubConfig) -> Self {
        Self {
            state: StateCell::new(initial),
            subscriptions: SubscriptionManager::with_capacity(
                config.name,
                config.initial_capacity,
            ),
        }
    }

    /// Replace the state with `next` and notify subscribers of `message`.
    ///
    /// Returns the subscription count, not the number of handlers called.
    pub fn publish(&self, message: M, next: S) -> usize {
        let snapshot = self.state.replace(next);
        self.fan_out(&message, snapshot)
    }

    /// Derive the next state from the current one, then notify.
    pub fn publish_with<F>(&self, message: M, producer: F) -> usize
    where
        F: FnOnce(&S) -> S,
    {
        let snapshot = self.state.mutate(producer);
        self.fan_out(&message, snapshot)
    }

    /// Like [`publish_with`](Self::publish_with), for producers that can
    /// refuse. On `Err` the state is unchanged and nobody is notified.
    pub fn try_publish_with<F, E>(&self, message: M, producer: F) -> std::result::Result<usize, E>
    where
        F: FnOnce(&S) -> std::result::Result<S, E>,
    {
        let snapshot = self.state.try_mutate(producer)?;
        Ok(self.fan_out(&message, snapshot))
    }

    /// Current state.
    pub fn latest_state(&self) -> Arc<S> {
        self.state.read()
    }

    /// Current state with its timestamp.
    pub fn snapshot(&self) -> StateSnapshot<S> {
        self.state.snapshot()
    }

    /// When the state was last written.
    pub fn updated_at(&self) -> Timestamp {
        self.state.snapshot().updated_at
    }

    fn fan_out(&self, message: &M, snapshot: StateSnapshot<S>) -> usize {
        debug!(
            pubsub = %self.subscriptions.name(),
            updated_at = snapshot.updated_at.0,
            "publishing"
        );
        self.subscriptions.notify(&snapshot.value, message)
    }
}

impl<M: PartialEq, S> Observable<M, S> for PubSub<M, S> {
    fn subscriptions(&self) -> &SubscriptionManager<M, S> {
        &self.subscriptions
    }
}

impl<M, S: fmt::Debug> fmt::Debug for PubSub<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSub")
            .field("name", &self.subscriptions.name())
            .field("state", &self.state)
            .field("subscriptions", &self.subscriptions.subscription_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Message {
        Increment,
        Reset,
    }

    fn counter() -> PubSub<Message, u32> {
        PubSub::new(0)
    }

    #[test]
    fn test_publish_updates_latest_state() {
        let hub = counter();
        hub.publish(Message::Reset, 10);
        assert_eq!(*hub.latest_state(), 10);

        hub.publish_with(Message::Increment, |n| n + 1);
        assert_eq!(*hub.latest_state(), 11);
    }

    #[test]
    fn test_publish_returns_count_not_calls() {
        let hub = counter();
        let handler = Handler::new(|_: &u32, _: &Message| {});
        hub.subscribe(Some(Message::Reset), &handler);

        assert_eq!(hub.publish_with(Message::Increment, |n| n + 1), 1);
    }

    #[test]
    fn test_handlers_see_new_value() {
        let hub = counter();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler = Handler::new(move |n: &u32, _: &Message| sink.lock().push(*n));
        hub.subscribe(InterestSet::all(), &handler);

        hub.publish_with(Message::Increment, |n| n + 1);
        hub.publish_with(Message::Increment, |n| n + 1);

        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_try_publish_with_err_skips_fan_out() {
        let hub = counter();
        let calls = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&calls);
        let handler = Handler::new(move |_: &u32, _: &Message| *sink.lock() += 1);
        hub.subscribe(InterestSet::all(), &handler);
        let before = hub.updated_at();

        let result = hub.try_publish_with(Message::Increment, |_| Err("overflow"));

        assert_eq!(result, Err("overflow"));
        assert_eq!(*hub.latest_state(), 0);
        assert_eq!(hub.updated_at(), before);
        assert_eq!(*calls.lock(), 0);
    }

    #[test]
    fn test_try_publish_with_ok_notifies() {
        let hub = counter();
        let result: std::result::Result<usize, String> =
            hub.try_publish_with(Message::Increment, |n| Ok(n + 5));
        assert_eq!(result, Ok(0));
        assert_eq!(*hub.latest_state(), 5);
    }

    #[test]
    fn test_backing_manager_feeds_publish() {
        let hub = counter();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler = Handler::new(move |n: &u32, _: &Message| sink.lock().push(*n));

        let id = hub.subscriptions().subscribe(Some(Message::Reset), &handler);
        assert_eq!(hub.subscription_id(&handler), Some(id));

        hub.publish(Message::Reset, 4);
        assert_eq!(*seen.lock(), vec![4]);
    }

    #[test]
    fn test_config_name() {
        let hub: PubSub<Message, u32> = PubSub::with_config(
            0,
            PubSubConfig {
                name: "counter".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(hub.subscriptions().name(), "counter");
        assert_eq!(hub.subscription_count(), 0);
    }

    #[test]
    fn test_debug_output() {
        let hub = counter();
        let text = format!("{:?}", hub);
        assert!(text.contains("PubSub"));
        assert!(text.contains("subscriptions: 0"));
    }
}
