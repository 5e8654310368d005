//! Project events.

use herald_core::entities::Project;
use herald_core::enums::ProjectState;
use herald_core::prior;
use herald_core::{Action, ClassifiedResult, ClassifierSettings, ClassifyError, Envelope, Priority};

use crate::format::{self, format_date, progress, progress_moved, project_link};
use crate::rules::{self, Rule, Update};

/// # Errors
///
/// `UnsupportedAction` for an unknown action; `MissingDiffData` or
/// `IgnoredChange` for updates without a significant change.
pub fn classify(
    envelope: &Envelope<Project>,
    settings: &ClassifierSettings,
) -> Result<ClassifiedResult, ClassifyError> {
    let project = &envelope.data;
    match envelope.action()? {
        Action::Create => Ok(created(envelope)),
        Action::Update => rules::apply(UPDATE_RULES, &Update::from_envelope(envelope, settings)?),
        Action::Remove => Ok(ClassifiedResult::notify(
            format!(
                "🗑️ **Project Deleted**\n{}",
                project_link(&project.name, &envelope.url)
            ),
            Priority::High,
        )),
    }
}

fn created(envelope: &Envelope<Project>) -> ClassifiedResult {
    let project = &envelope.data;
    let mut lines = vec![
        "🚨 **New Project Created**".to_string(),
        project_link(&project.name, &envelope.url),
        format!("*Created by {}*", format::author(project.creator.as_ref())),
    ];

    let creator_id = project.creator.as_ref().map(|user| user.id.as_str());
    if let Some(lead) = project.lead.as_ref().filter(|lead| Some(lead.id.as_str()) != creator_id) {
        lines.push(format!("*Lead: {}*", format::display_name(Some(lead))));
    }
    if let Some(target) = project.target_date.as_deref() {
        lines.push(format!(
            "*Target: {}*",
            format_date(target, envelope.reference_time())
        ));
    }
    if !project.teams.is_empty() {
        let teams: Vec<&str> = project.teams.iter().map(|team| team.name.as_str()).collect();
        lines.push(format!("*Teams: {}*", teams.join(", ")));
    }

    ClassifiedResult::notify(lines.join("\n"), Priority::High)
}

/// Update precedence, most significant first.
pub const UPDATE_RULES: &[Rule<Project>] = &[
    Rule { name: "state", when: state_changed, then: state_message },
    Rule { name: "lead", when: lead_changed, then: lead_message },
    Rule { name: "target_date", when: target_date_changed, then: target_date_message },
    Rule { name: "progress", when: progress_jumped, then: progress_message },
    Rule { name: "name", when: name_changed, then: name_message },
];

fn link(update: &Update<'_, Project>) -> String {
    project_link(&update.data.name, update.url)
}

fn state_changed(update: &Update<'_, Project>) -> bool {
    prior::changed(
        update.changes.state.as_ref().map(Option::as_ref),
        Some(&update.data.state),
    )
}

fn state_message(update: &Update<'_, Project>) -> ClassifiedResult {
    let project = update.data;
    let (message, priority) = match project.state {
        ProjectState::Completed => (
            format!(
                "🎉 **Project Completed**\n{}\n*Progress: {}*",
                link(update),
                progress(project.progress)
            ),
            Priority::High,
        ),
        ProjectState::Canceled => (
            format!("❌ **Project Canceled**\n{}", link(update)),
            Priority::High,
        ),
        ProjectState::Started => (
            format!("🚀 **Project Started**\n{}", link(update)),
            Priority::High,
        ),
        state => (
            format!("📢 **Project Status Changed**\n{}\n*Status: {state}*", link(update)),
            Priority::Medium,
        ),
    };
    ClassifiedResult::notify(message, priority)
}

fn lead_changed(update: &Update<'_, Project>) -> bool {
    prior::changed(
        update.changes.lead_id.as_ref().map(Option::as_deref),
        update.data.lead_id.as_deref(),
    )
}

fn lead_message(update: &Update<'_, Project>) -> ClassifiedResult {
    ClassifiedResult::notify(
        format!(
            "📢 **Project Lead Changed**\n{}\n*New lead: {}*",
            link(update),
            format::display_name(update.data.lead.as_ref())
        ),
        Priority::Medium,
    )
}

fn target_date_changed(update: &Update<'_, Project>) -> bool {
    prior::changed(
        update.changes.target_date.as_ref().map(Option::as_deref),
        update.data.target_date.as_deref(),
    )
}

fn target_date_message(update: &Update<'_, Project>) -> ClassifiedResult {
    let target = update.data.target_date.as_deref().map_or_else(
        || "Target date removed".to_string(),
        |target| format!("Target: {}", format_date(target, update.reference)),
    );
    ClassifiedResult::notify(
        format!("📢 **Project Target Date Changed**\n{}\n*{target}*", link(update)),
        Priority::Medium,
    )
}

fn progress_jumped(update: &Update<'_, Project>) -> bool {
    update.changes.progress.is_some_and(|previous| {
        progress_moved(
            previous.unwrap_or_default(),
            update.data.progress,
            update.settings.project_progress_delta,
        )
    })
}

fn progress_message(update: &Update<'_, Project>) -> ClassifiedResult {
    ClassifiedResult::notify(
        format!(
            "📊 **Project Progress Update**\n{}\n*Progress: {}*",
            link(update),
            progress(update.data.progress)
        ),
        Priority::Medium,
    )
}

fn name_changed(update: &Update<'_, Project>) -> bool {
    prior::changed(
        update.changes.name.as_ref().map(Option::as_deref),
        Some(update.data.name.as_str()),
    )
}

fn name_message(update: &Update<'_, Project>) -> ClassifiedResult {
    let previous = update
        .changes
        .name
        .as_ref()
        .and_then(Option::as_deref)
        .unwrap_or_default();
    ClassifiedResult::notify(
        format!("📢 **Project Renamed**\n{}\n*was: \"{previous}\"*", link(update)),
        Priority::Medium,
    )
}
