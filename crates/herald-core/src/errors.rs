//! Classification failure taxonomy.
//!
//! Every variant is recoverable: the router turns each into an ignored
//! [`ClassifiedResult`](crate::result::ClassifiedResult) whose message is the
//! `Display` string below. Nothing here should ever reach the caller as a
//! fault.

use thiserror::Error;

use crate::enums::EntityType;

/// Reasons a payload produces no notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// Structural validation failed: not an object, a missing envelope field,
    /// an entity type outside the closed set, or `data` of the wrong shape.
    #[error("INVALID_PAYLOAD: {0}")]
    InvalidPayload(String),

    /// The entity has no rule for this action string.
    #[error("UNSUPPORTED_ACTION: {entity} does not handle action '{action}'")]
    UnsupportedAction { entity: EntityType, action: String },

    /// An update arrived without `updatedFrom`, so there is nothing to diff.
    #[error("MISSING_DATA: {entity} update arrived without updatedFrom")]
    MissingDiffData { entity: EntityType },

    /// A real change that matches no notification-worthy rule.
    #[error("IGNORED_EVENT: {entity} change is not notification-worthy")]
    IgnoredChange { entity: EntityType },
}

impl ClassifyError {
    /// Stable machine-readable code, also the prefix of the display string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::UnsupportedAction { .. } => "UNSUPPORTED_ACTION",
            Self::MissingDiffData { .. } => "MISSING_DATA",
            Self::IgnoredChange { .. } => "IGNORED_EVENT",
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidPayload(reason.into())
    }
}
