//! Subscription system for state changes.
//!
//! This module provides in-process, synchronous subscriptions:
//! - Registration keyed on handler identity (re-subscribing is a no-op)
//! - Filtering by message type, or wildcard delivery
//! - In-order fan-out on the caller's thread
//!
//! # Example
//!
//! ```ignore
//! // Managers come from a `PubSub`; callers reach them through `Observable`.
//! let hub = PubSub::new(Settings::default());
//! let manager = hub.subscriptions();
//!
//! let handler = Handler::new(|state: &Settings, message: &Message| {
//!     println!("{:?} -> {:?}", message, state);
//! });
//!
//! // Only theme changes
//! let id = manager.subscribe(Some(Message::SetTheme), &handler);
//!
//! // Same handler again: same id, no second entry
//! assert_eq!(manager.subscribe(InterestSet::all(), &handler), id);
//!
//! manager.unsubscribe(id)?;
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub(crate) use manager::{DEFAULT_CAPACITY, DEFAULT_NAME};
pub use types::{Handler, InterestSet};
