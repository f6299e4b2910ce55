//! # State PubSub
//!
//! A piece of versioned state paired with typed, filtered listeners.
//!
//! ## Core Concepts
//!
//! - **State**: one current snapshot (value + timestamp), swapped whole on every write
//! - **Handlers**: callbacks with a stable identity, so re-subscribing is a no-op
//! - **Interest sets**: the message types a handler wants; empty means all
//! - **Fan-out**: synchronous, in registration order, on the publisher's thread
//!
//! ## Example
//!
//! ```ignore
//! use state_pubsub::{Handler, Observable, PubSub};
//!
//! struct Settings {
//!     hub: PubSub<Message, State>,
//! }
//!
//! impl Settings {
//!     fn set_light_theme(&self) -> usize {
//!         self.hub.publish_with(Message::SetTheme, |prev| State { theme: Theme::Light, ..*prev })
//!     }
//! }
//!
//! // Outside callers get the control surface only.
//! impl Observable<Message, State> for Settings {
//!     fn subscriptions(&self) -> &SubscriptionManager<Message, State> {
//!         self.hub.subscriptions()
//!     }
//! }
//!
//! let handler = Handler::new(|state: &State, _: &Message| println!("theme: {:?}", state.theme));
//! let id = settings.subscribe(Some(Message::SetTheme), &handler);
//! settings.set_light_theme();
//! settings.unsubscribe(id)?;
//! ```

pub mod error;
pub mod pubsub;
pub mod state;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{PubSubError, Result};
pub use pubsub::{Observable, PubSub, PubSubConfig};
pub use state::{StateCell, StateSnapshot};
pub use subscriptions::{Handler, InterestSet, SubscriptionManager};
pub use types::*;
