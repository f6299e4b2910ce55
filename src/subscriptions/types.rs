//! Subscription types: handlers, interest sets and entries.

use crate::types::SubscriptionId;
use std::fmt;
use std::sync::Arc;

type HandlerFn<M, S> = dyn Fn(&S, &M) + Send + Sync;

/// A subscriber callback with a stable identity.
///
/// Closures cannot be compared, so a handler is identified by the allocation
/// behind it. Clones share that allocation and count as the same handler;
/// two `Handler::new` calls never do, even for identical closures.
pub struct Handler<M, S> {
    inner: Arc<HandlerFn<M, S>>,
}

impl<M, S> Handler<M, S> {
    /// Wrap a callback. It receives the new state and the message type that
    /// caused the change.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&S, &M) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(callback),
        }
    }

    /// True if both handles point at the same callback.
    pub fn same_as(&self, other: &Handler<M, S>) -> bool {
        // Compare data pointers only; vtable pointers are not unique.
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const (),
            Arc::as_ptr(&other.inner) as *const (),
        )
    }

    pub(crate) fn call(&self, state: &S, message: &M) {
        (self.inner)(state, message)
    }
}

impl<M, S> Clone for Handler<M, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M, S> fmt::Debug for Handler<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.inner) as *const ())
    }
}

/// Message types a subscription wants. Empty means every type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterestSet<M> {
    types: Vec<M>,
}

impl<M> InterestSet<M> {
    /// Match every message type.
    pub fn all() -> Self {
        Self { types: Vec::new() }
    }

    /// Match a single message type.
    pub fn only(message: M) -> Self {
        Self {
            types: vec![message],
        }
    }

    /// True if this set matches every message type.
    pub fn is_wildcard(&self) -> bool {
        self.types.is_empty()
    }

    /// Explicitly listed types, without duplicates. Empty for a wildcard.
    pub fn types(&self) -> &[M] {
        &self.types
    }
}

impl<M: PartialEq> InterestSet<M> {
    /// Match any of the given types. An empty iterator yields a wildcard.
    pub fn any_of<I>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
    {
        let mut types: Vec<M> = Vec::new();
        for message in messages {
            if !types.contains(&message) {
                types.push(message);
            }
        }
        Self { types }
    }

    /// Whether a publish of `message` should reach this subscription.
    pub fn matches(&self, message: &M) -> bool {
        self.types.is_empty() || self.types.contains(message)
    }
}

impl<M> Default for InterestSet<M> {
    fn default() -> Self {
        Self::all()
    }
}

impl<M> From<Option<M>> for InterestSet<M> {
    fn from(message: Option<M>) -> Self {
        match message {
            Some(message) => Self::only(message),
            None => Self::all(),
        }
    }
}

impl<M: PartialEq> From<Vec<M>> for InterestSet<M> {
    fn from(messages: Vec<M>) -> Self {
        Self::any_of(messages)
    }
}

impl<M: PartialEq, const N: usize> From<[M; N]> for InterestSet<M> {
    fn from(messages: [M; N]) -> Self {
        Self::any_of(messages)
    }
}

impl<M: PartialEq + Clone> From<&[M]> for InterestSet<M> {
    fn from(messages: &[M]) -> Self {
        Self::any_of(messages.iter().cloned())
    }
}

/// A registered subscriber.
pub(crate) struct Subscription<M, S> {
    pub(crate) id: SubscriptionId,
    pub(crate) handler: Handler<M, S>,
    pub(crate) interest: InterestSet<M>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Message {
        ChangeFoo,
        ChangeBar,
    }

    #[test]
    fn test_clone_shares_identity() {
        let a: Handler<Message, u32> = Handler::new(|_, _| {});
        let b = a.clone();
        assert!(a.same_as(&b));
    }

    #[test]
    fn test_identical_closures_differ() {
        let a: Handler<Message, u32> = Handler::new(|_, _| {});
        let b: Handler<Message, u32> = Handler::new(|_, _| {});
        assert!(!a.same_as(&b));
    }

    #[test]
    fn test_empty_interest_matches_everything() {
        let interest: InterestSet<Message> = InterestSet::all();
        assert!(interest.is_wildcard());
        assert!(interest.matches(&Message::ChangeFoo));
        assert!(interest.matches(&Message::ChangeBar));
    }

    #[test]
    fn test_single_interest_matches_only_itself() {
        let interest = InterestSet::only(Message::ChangeFoo);
        assert!(interest.matches(&Message::ChangeFoo));
        assert!(!interest.matches(&Message::ChangeBar));
    }

    #[test]
    fn test_normalization() {
        assert_eq!(InterestSet::from(None::<Message>), InterestSet::all());
        assert_eq!(
            InterestSet::from(Some(Message::ChangeBar)),
            InterestSet::only(Message::ChangeBar)
        );
        assert_eq!(InterestSet::from(Vec::<Message>::new()), InterestSet::all());

        let both = InterestSet::from([Message::ChangeFoo, Message::ChangeBar, Message::ChangeFoo]);
        assert_eq!(both.types(), &[Message::ChangeFoo, Message::ChangeBar]);

        let slice: &[Message] = &[Message::ChangeBar];
        assert_eq!(InterestSet::from(slice), InterestSet::only(Message::ChangeBar));
    }

    #[test]
    fn test_matches_by_value_equality() {
        let interest = InterestSet::any_of(vec!["changeFoo".to_string()]);
        let published = String::from("changeFoo");
        assert!(interest.matches(&published));
    }
}
