//! The outcome of classifying one envelope.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Priority;
use crate::errors::ClassifyError;

/// Message, urgency, and send decision for one envelope.
///
/// When `should_send` is false or `priority` is [`Priority::Ignore`], the
/// message is a diagnostic for logs and is never delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedResult {
    pub message: String,
    pub priority: Priority,
    pub should_send: bool,
}

impl ClassifiedResult {
    /// A deliverable notification.
    #[must_use]
    pub fn notify(message: impl Into<String>, priority: Priority) -> Self {
        debug_assert!(priority != Priority::Ignore, "notify with Ignore priority");
        Self {
            message: message.into(),
            priority,
            should_send: true,
        }
    }

    /// A suppressed result carrying only a diagnostic.
    #[must_use]
    pub fn suppressed(diagnostic: impl Into<String>) -> Self {
        Self {
            message: diagnostic.into(),
            priority: Priority::Ignore,
            should_send: false,
        }
    }
}

impl From<ClassifyError> for ClassifiedResult {
    fn from(error: ClassifyError) -> Self {
        Self::suppressed(error.to_string())
    }
}
