//! Classification engine for tracker webhooks.
//!
//! [`Router`] takes a raw JSON envelope, dispatches it to the classifier for
//! its entity type, and returns a [`ClassifiedResult`](herald_core::ClassifiedResult)
//! holding the notification text, its priority, and whether it should be
//! delivered. The engine performs no I/O; [`policy::finalize`] is the only
//! function that reads the clock.

pub mod classify;
pub mod format;
pub mod policy;
pub mod router;
pub mod rules;

pub use policy::{finalize, finalize_at, should_emit};
pub use router::{EventStats, Router};
