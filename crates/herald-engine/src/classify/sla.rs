//! Issue SLA events.
//!
//! SLA webhooks use their own action vocabulary (`set`, `highRisk`,
//! `breached`, ...), so the action is never parsed: a set `breachedAt` is
//! all that decides urgency.

use herald_core::entities::IssueSla;
use herald_core::{ClassifiedResult, ClassifierSettings, ClassifyError, Envelope, Priority};

use crate::format::format_timestamp;

/// # Errors
///
/// Never fails; the signature matches the other classifiers.
#[allow(clippy::unnecessary_wraps)]
pub fn classify(
    envelope: &Envelope<IssueSla>,
    _settings: &ClassifierSettings,
) -> Result<ClassifiedResult, ClassifyError> {
    let sla = &envelope.data;
    let link = format!("[{}]({})", sla.name, envelope.url);

    let result = match sla.breached_at.as_deref() {
        Some(breached_at) => ClassifiedResult::notify(
            format!(
                "🚨 **SLA Breach Alert**\n{link}\n*Breached at: {}*",
                format_timestamp(breached_at)
            ),
            Priority::High,
        ),
        None => ClassifiedResult::notify(format!("⚠️ **SLA Event**\n{link}"), Priority::Medium),
    };
    Ok(result)
}
