//! Decides whether a classified result reaches delivery, and in what form.

use chrono::{DateTime, Utc};
use herald_core::{ClassifiedResult, Priority};

/// `true` when the result is meant for delivery.
#[must_use]
pub fn should_emit(result: &ClassifiedResult) -> bool {
    result.should_send && result.priority != Priority::Ignore
}

/// Final text for delivery, stamped with the current time.
#[must_use]
pub fn finalize(result: &ClassifiedResult) -> String {
    finalize_at(result, Utc::now())
}

/// Final text for delivery: empty when the result is suppressed, the message
/// with a `*HH:MM UTC*` footer for high priority, the message verbatim
/// otherwise.
#[must_use]
pub fn finalize_at(result: &ClassifiedResult, now: DateTime<Utc>) -> String {
    if !should_emit(result) {
        return String::new();
    }
    match result.priority {
        Priority::High => format!("{}\n\n*{} UTC*", result.message, now.format("%H:%M")),
        _ => result.message.clone(),
    }
}
