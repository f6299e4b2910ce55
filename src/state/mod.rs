//! State container.
//!
//! A [`StateCell`] holds one [`StateSnapshot`] at a time. Every write builds
//! the whole next snapshot before swapping it in, so readers never observe a
//! half-applied update.

mod cell;

pub use cell::{StateCell, StateSnapshot};
