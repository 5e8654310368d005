//! Cycle (sprint) events.

use herald_core::entities::Cycle;
use herald_core::prior;
use herald_core::{Action, ClassifiedResult, ClassifierSettings, ClassifyError, Envelope, Priority};

use crate::format::{cycle_link, format_date, progress, progress_moved};
use crate::rules::{self, Rule, Update};

/// # Errors
///
/// `UnsupportedAction` for an unknown action; `MissingDiffData` or
/// `IgnoredChange` for updates without a significant change.
pub fn classify(
    envelope: &Envelope<Cycle>,
    settings: &ClassifierSettings,
) -> Result<ClassifiedResult, ClassifyError> {
    let cycle = &envelope.data;
    let link = cycle_link(&cycle.display_name(), &envelope.url);

    match envelope.action()? {
        Action::Create => {
            let mut lines = vec!["🚨 **New Cycle Created**".to_string(), link];
            if let Some(team) = &cycle.team {
                lines.push(format!("*Team: {}*", team.name));
            }
            lines.push(format!(
                "*Duration: {}*",
                duration(cycle, envelope.reference_time())
            ));
            Ok(ClassifiedResult::notify(lines.join("\n"), Priority::High))
        }
        Action::Update => rules::apply(UPDATE_RULES, &Update::from_envelope(envelope, settings)?),
        Action::Remove => Ok(ClassifiedResult::notify(
            format!("🗑️ **Cycle Deleted**\n{link}"),
            Priority::High,
        )),
    }
}

fn duration(cycle: &Cycle, reference: Option<chrono::DateTime<chrono::Utc>>) -> String {
    format!(
        "{} → {}",
        format_date(&cycle.start_date, reference),
        format_date(&cycle.end_date, reference)
    )
}

/// Update precedence, most significant first.
pub const UPDATE_RULES: &[Rule<Cycle>] = &[
    Rule { name: "completed", when: completed, then: completed_message },
    Rule { name: "progress", when: progress_jumped, then: progress_message },
    Rule { name: "name", when: name_changed, then: name_message },
    Rule { name: "dates", when: dates_changed, then: dates_message },
];

fn link(update: &Update<'_, Cycle>) -> String {
    cycle_link(&update.data.display_name(), update.url)
}

/// `completedAt` was explicitly null before and is set now.
fn completed(update: &Update<'_, Cycle>) -> bool {
    matches!(update.changes.completed_at, Some(None)) && update.data.completed_at.is_some()
}

fn completed_message(update: &Update<'_, Cycle>) -> ClassifiedResult {
    ClassifiedResult::notify(
        format!(
            "🎉 **Cycle Completed**\n{}\n*Final progress: {}*",
            link(update),
            progress(update.data.progress)
        ),
        Priority::High,
    )
}

fn progress_jumped(update: &Update<'_, Cycle>) -> bool {
    update.changes.progress.is_some_and(|previous| {
        progress_moved(
            previous.unwrap_or_default(),
            update.data.progress,
            update.settings.cycle_progress_delta,
        )
    })
}

fn progress_message(update: &Update<'_, Cycle>) -> ClassifiedResult {
    ClassifiedResult::notify(
        format!(
            "📊 **Cycle Progress Update**\n{}\n*Progress: {}*",
            link(update),
            progress(update.data.progress)
        ),
        Priority::Medium,
    )
}

fn name_changed(update: &Update<'_, Cycle>) -> bool {
    prior::changed(
        update.changes.name.as_ref().map(Option::as_deref),
        update.data.name.as_deref(),
    )
}

fn name_message(update: &Update<'_, Cycle>) -> ClassifiedResult {
    let previous = update
        .changes
        .name
        .as_ref()
        .and_then(Option::as_deref)
        .unwrap_or_default();
    ClassifiedResult::notify(
        format!("📢 **Cycle Renamed**\n{}\n*was: \"{previous}\"*", link(update)),
        Priority::Medium,
    )
}

fn dates_changed(update: &Update<'_, Cycle>) -> bool {
    let changes = update.changes;
    prior::changed(
        changes.start_date.as_ref().map(Option::as_deref),
        Some(update.data.start_date.as_str()),
    ) || prior::changed(
        changes.end_date.as_ref().map(Option::as_deref),
        Some(update.data.end_date.as_str()),
    )
}

fn dates_message(update: &Update<'_, Cycle>) -> ClassifiedResult {
    ClassifiedResult::notify(
        format!(
            "📢 **Cycle Dates Changed**\n{}\n*New duration: {}*",
            link(update),
            duration(update.data, update.reference)
        ),
        Priority::Medium,
    )
}
