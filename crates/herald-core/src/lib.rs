//! # herald-core
//!
//! Shared types for Herald, the tracker-webhook notifier.
//!
//! This crate provides the foundational types every other crate speaks:
//! - The inbound envelope, raw and entity-typed
//! - Entity snapshot structs and their diff-significant change sets
//! - Action, entity type, workflow state, health, and priority enums
//! - The classification result and the error taxonomy it absorbs
//! - Classifier thresholds shared by the engine and the config loader

pub mod entities;
pub mod envelope;
pub mod enums;
pub mod errors;
pub mod prior;
pub mod result;
pub mod settings;

pub use envelope::{Envelope, RawEnvelope};
pub use enums::{Action, EntityType, Priority};
pub use errors::ClassifyError;
pub use result::ClassifiedResult;
pub use settings::ClassifierSettings;
