//! Issue events.

use herald_core::entities::Issue;
use herald_core::enums::IssueStateType;
use herald_core::prior;
use herald_core::{Action, ClassifiedResult, ClassifierSettings, ClassifyError, Envelope, Priority};

use crate::format::{
    self, PREVIOUS_ASSIGNEE, assignee_change, diff_labels, issue_link, priority_label, same_set,
    state_line, urgency_icon,
};
use crate::rules::{self, Rule, Update};

/// Classify an issue event.
///
/// # Errors
///
/// `UnsupportedAction` for an unknown action; `MissingDiffData` or
/// `IgnoredChange` for updates without a significant change.
pub fn classify(
    envelope: &Envelope<Issue>,
    settings: &ClassifierSettings,
) -> Result<ClassifiedResult, ClassifyError> {
    match envelope.action()? {
        Action::Create => Ok(created(&envelope.data, &envelope.url, settings)),
        Action::Update => rules::apply(UPDATE_RULES, &Update::from_envelope(envelope, settings)?),
        Action::Remove => Ok(ClassifiedResult::notify(
            format!(
                "🚨 **Issue Deleted**\n{}",
                issue_link(&envelope.data, &envelope.url)
            ),
            Priority::High,
        )),
    }
}

fn created(issue: &Issue, url: &str, settings: &ClassifierSettings) -> ClassifiedResult {
    let priority = if settings.is_urgent(issue.priority) {
        Priority::High
    } else {
        Priority::Medium
    };

    let mut message = format!(
        "{} **New Issue Created**\n{}\n*Created by {}*\n*Assigned to {}*",
        urgency_icon(priority),
        issue_link(issue, url),
        format::author(issue.creator.as_ref()),
        format::display_name(issue.assignee.as_ref()),
    );
    if !issue.labels.is_empty() {
        let labels: Vec<&str> = issue.labels.iter().map(|label| label.name.as_str()).collect();
        message.push_str(&format!("\n*Labels: {}*", labels.join(", ")));
    }

    ClassifiedResult::notify(message, priority)
}

/// Update precedence, most significant first.
pub const UPDATE_RULES: &[Rule<Issue>] = &[
    Rule { name: "state", when: state_changed, then: state_message },
    Rule { name: "assignee", when: assignee_changed, then: assignee_message },
    Rule { name: "title", when: title_changed, then: title_message },
    Rule { name: "priority", when: priority_changed, then: priority_message },
    Rule { name: "labels", when: labels_changed, then: labels_message },
    Rule { name: "due_date", when: due_date_changed, then: due_date_message },
    Rule { name: "estimate", when: estimate_changed, then: estimate_message },
];

/// Urgent outranks high, which outranks medium, then low, then none.
const fn severity(priority: u8) -> u8 {
    match priority {
        1..=4 => 5 - priority,
        _ => 0,
    }
}

fn link(update: &Update<'_, Issue>) -> String {
    issue_link(update.data, update.url)
}

// ---------------------------------------------------------------------------
// state
// ---------------------------------------------------------------------------

fn state_changed(update: &Update<'_, Issue>) -> bool {
    prior::changed(
        update.changes.state_id.as_ref().map(Option::as_deref),
        Some(update.data.state.id.as_str()),
    )
}

fn state_message(update: &Update<'_, Issue>) -> ClassifiedResult {
    let (heading, priority) = match update.data.state.state_type {
        IssueStateType::Completed => ("Issue Completed", Priority::High),
        IssueStateType::Canceled => ("Issue Canceled", Priority::High),
        _ => ("Issue Status Changed", Priority::Medium),
    };
    ClassifiedResult::notify(
        format!(
            "{} **{heading}**\n{}\n{}",
            urgency_icon(priority),
            link(update),
            state_line(&update.data.state)
        ),
        priority,
    )
}

// ---------------------------------------------------------------------------
// assignee
// ---------------------------------------------------------------------------

fn assignee_changed(update: &Update<'_, Issue>) -> bool {
    prior::changed(
        update.changes.assignee_id.as_ref().map(Option::as_deref),
        update.data.assignee_id.as_deref(),
    )
}

fn assignee_message(update: &Update<'_, Issue>) -> ClassifiedResult {
    let previous = update
        .changes
        .assignee_id
        .as_ref()
        .and_then(Option::as_ref)
        .map(|_| PREVIOUS_ASSIGNEE);
    let current = update
        .data
        .assignee
        .as_ref()
        .map(|user| format::display_name(Some(user)));

    ClassifiedResult::notify(
        format!(
            "🚨 **Issue Assignment Changed**\n{}\n{}",
            link(update),
            assignee_change(previous, current)
        ),
        Priority::High,
    )
}

// ---------------------------------------------------------------------------
// title
// ---------------------------------------------------------------------------

fn title_changed(update: &Update<'_, Issue>) -> bool {
    prior::changed(
        update.changes.title.as_ref().map(Option::as_deref),
        Some(update.data.title.as_str()),
    )
}

fn title_message(update: &Update<'_, Issue>) -> ClassifiedResult {
    let previous = update
        .changes
        .title
        .as_ref()
        .and_then(Option::as_deref)
        .unwrap_or_default();
    ClassifiedResult::notify(
        format!(
            "📢 **Issue Title Updated**\n{}\n*was: \"{previous}\"*",
            link(update)
        ),
        Priority::Medium,
    )
}

// ---------------------------------------------------------------------------
// priority
// ---------------------------------------------------------------------------

fn previous_priority(update: &Update<'_, Issue>) -> Option<u8> {
    update.changes.priority.map(Option::unwrap_or_default)
}

fn priority_changed(update: &Update<'_, Issue>) -> bool {
    previous_priority(update).is_some_and(|previous| previous != update.data.priority)
}

fn priority_message(update: &Update<'_, Issue>) -> ClassifiedResult {
    let previous = previous_priority(update).unwrap_or_default();
    let current = update.data.priority;
    let priority = if severity(current) > severity(previous) {
        Priority::High
    } else {
        Priority::Medium
    };

    ClassifiedResult::notify(
        format!(
            "{} **Issue Priority Changed**\n{}\n*Priority: {} → {}*",
            urgency_icon(priority),
            link(update),
            priority_label(previous),
            priority_label(current)
        ),
        priority,
    )
}

// ---------------------------------------------------------------------------
// labels
// ---------------------------------------------------------------------------

fn previous_labels<'a>(update: &Update<'a, Issue>) -> Option<&'a [String]> {
    update
        .changes
        .label_ids
        .as_ref()
        .map(|previous| previous.as_deref().unwrap_or_default())
}

fn labels_changed(update: &Update<'_, Issue>) -> bool {
    previous_labels(update).is_some_and(|previous| !same_set(previous, &update.data.label_ids))
}

fn labels_message(update: &Update<'_, Issue>) -> ClassifiedResult {
    let previous = previous_labels(update).unwrap_or_default();
    let mut diff = diff_labels(previous, &update.data.label_ids);
    for id in diff.added.iter_mut().chain(diff.removed.iter_mut()) {
        let name = update.data.label_name(id).to_string();
        *id = name;
    }

    ClassifiedResult::notify(
        format!("📢 **Issue Labels Updated**\n{}\n*{diff}*", link(update)),
        Priority::Medium,
    )
}

// ---------------------------------------------------------------------------
// due date and estimate
// ---------------------------------------------------------------------------

fn due_date_changed(update: &Update<'_, Issue>) -> bool {
    prior::changed(
        update.changes.due_date.as_ref().map(Option::as_deref),
        update.data.due_date.as_deref(),
    )
}

fn due_date_message(update: &Update<'_, Issue>) -> ClassifiedResult {
    let due = update.data.due_date.as_deref().map_or_else(
        || "Due date removed".to_string(),
        |due| format!("Due: {}", format::format_date(due, update.reference)),
    );
    ClassifiedResult::notify(
        format!("📢 **Issue Due Date Updated**\n{}\n*{due}*", link(update)),
        Priority::Medium,
    )
}

fn estimate_changed(update: &Update<'_, Issue>) -> bool {
    prior::changed(
        update.changes.estimate.as_ref().map(Option::as_ref),
        update.data.estimate.as_ref(),
    )
}

fn estimate_message(update: &Update<'_, Issue>) -> ClassifiedResult {
    let estimate = update.data.estimate.map_or_else(
        || "Estimate removed".to_string(),
        |points| format!("Estimate: {points}"),
    );
    ClassifiedResult::notify(
        format!("📢 **Issue Estimate Updated**\n{}\n*{estimate}*", link(update)),
        Priority::Medium,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::fixtures::{envelope, issue_data};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn run(action: &str, data: serde_json::Value, updated_from: Option<serde_json::Value>) -> ClassifiedResult {
        let envelope = envelope::<Issue>("Issue", action, data, updated_from);
        classify(&envelope, &ClassifierSettings::default()).unwrap()
    }

    fn run_err(action: &str, updated_from: Option<serde_json::Value>) -> ClassifyError {
        let envelope = envelope::<Issue>("Issue", action, issue_data(), updated_from);
        classify(&envelope, &ClassifierSettings::default()).unwrap_err()
    }

    #[rstest]
    #[case(0, Priority::Medium)]
    #[case(1, Priority::High)]
    #[case(2, Priority::High)]
    #[case(3, Priority::Medium)]
    #[case(4, Priority::Medium)]
    fn create_priority_follows_urgency(#[case] level: u8, #[case] expected: Priority) {
        let mut data = issue_data();
        data["priority"] = json!(level);
        let result = run("create", data, None);
        assert_eq!(result.priority, expected);
        assert!(result.should_send);
    }

    #[test]
    fn create_lists_creator_assignee_and_labels() {
        let result = run("create", issue_data(), None);
        assert_eq!(
            result.message,
            "📢 **New Issue Created**\n🟡 [ENG-42] [Checkout fails on Safari](https://tracker.example/issue/ENG-42)\n\
             *Created by Alex*\n*Assigned to Sam*\n*Labels: Bug, Frontend*"
        );
    }

    #[test]
    fn urgent_threshold_is_configurable() {
        let mut data = issue_data();
        data["priority"] = json!(3);
        let envelope = envelope::<Issue>("Issue", "create", data, None);
        let settings = ClassifierSettings {
            urgent_priority_threshold: 3,
            ..ClassifierSettings::default()
        };
        assert_eq!(classify(&envelope, &settings).unwrap().priority, Priority::High);
    }

    #[test]
    fn remove_is_high() {
        let result = run("remove", issue_data(), None);
        assert_eq!(result.priority, Priority::High);
        assert!(result.message.starts_with("🚨 **Issue Deleted**"));
    }

    #[test]
    fn unknown_action_is_unsupported() {
        assert_eq!(run_err("archive", None).code(), "UNSUPPORTED_ACTION");
    }

    #[test]
    fn update_without_diff_is_missing_data() {
        assert_eq!(run_err("update", None).code(), "MISSING_DATA");
    }

    #[test]
    fn unrelated_update_is_ignored() {
        let error = run_err("update", Some(json!({ "description": "old", "sortOrder": 3.5 })));
        assert_eq!(error.code(), "IGNORED_EVENT");
    }

    #[rstest]
    #[case("completed", "Done", Priority::High, "Issue Completed")]
    #[case("canceled", "Canceled", Priority::High, "Issue Canceled")]
    #[case("started", "In Progress", Priority::Medium, "Issue Status Changed")]
    fn state_changes(
        #[case] state_type: &str,
        #[case] name: &str,
        #[case] priority: Priority,
        #[case] heading: &str,
    ) {
        let mut data = issue_data();
        data["state"] = json!({ "id": "st-new", "name": name, "type": state_type });
        let result = run("update", data, Some(json!({ "stateId": "st-old" })));
        assert_eq!(result.priority, priority);
        assert!(result.message.contains(heading), "{}", result.message);
        assert!(result.message.contains(name));
    }

    #[test]
    fn unchanged_state_id_does_not_match() {
        let error = run_err("update", Some(json!({ "stateId": "st-todo" })));
        assert_eq!(error.code(), "IGNORED_EVENT");
    }

    #[test]
    fn state_outranks_title() {
        let mut data = issue_data();
        data["state"] = json!({ "id": "st-done", "name": "Done", "type": "completed" });
        let result = run(
            "update",
            data,
            Some(json!({ "stateId": "st-todo", "title": "Old title" })),
        );
        assert!(result.message.contains("Issue Completed"));
    }

    #[test]
    fn assignee_change_uses_placeholder_for_previous() {
        let result = run("update", issue_data(), Some(json!({ "assigneeId": "u-9" })));
        assert_eq!(result.priority, Priority::High);
        assert!(result.message.ends_with("\nSomeone → Sam"), "{}", result.message);

        let result = run("update", issue_data(), Some(json!({ "assigneeId": null })));
        assert!(result.message.ends_with("\n→ Sam"), "{}", result.message);

        let mut data = issue_data();
        data["assignee"] = json!(null);
        data["assigneeId"] = json!(null);
        let result = run("update", data, Some(json!({ "assigneeId": "u-2" })));
        assert!(result.message.ends_with("\n← Someone"), "{}", result.message);
    }

    #[test]
    fn title_change_shows_previous_title() {
        let result = run("update", issue_data(), Some(json!({ "title": "Checkout broken" })));
        assert_eq!(result.priority, Priority::Medium);
        assert!(result.message.ends_with("*was: \"Checkout broken\"*"));
    }

    #[rstest]
    #[case(3, 1, Priority::High, "Medium → Urgent")]
    #[case(0, 4, Priority::High, "No priority → Low")]
    #[case(1, 4, Priority::Medium, "Urgent → Low")]
    #[case(2, 0, Priority::Medium, "High → No priority")]
    fn priority_increase_is_high(
        #[case] previous: u8,
        #[case] current: u8,
        #[case] expected: Priority,
        #[case] rendered: &str,
    ) {
        let mut data = issue_data();
        data["priority"] = json!(current);
        let result = run("update", data, Some(json!({ "priority": previous })));
        assert_eq!(result.priority, expected);
        assert!(result.message.contains("**Issue Priority Changed**"));
        assert!(result.message.contains(rendered), "{}", result.message);
    }

    #[test]
    fn label_reorder_is_ignored() {
        let error = run_err("update", Some(json!({ "labelIds": ["lbl-fe", "lbl-bug"] })));
        assert_eq!(error.code(), "IGNORED_EVENT");
    }

    #[test]
    fn label_change_resolves_names() {
        let result = run("update", issue_data(), Some(json!({ "labelIds": ["lbl-bug", "lbl-old"] })));
        assert_eq!(result.priority, Priority::Medium);
        assert!(result.message.ends_with("*+Frontend -lbl-old*"), "{}", result.message);
    }

    #[test]
    fn due_date_is_rendered_relative_to_event_year() {
        let result = run("update", issue_data(), Some(json!({ "dueDate": null })));
        assert!(result.message.ends_with("*Due: Apr 1*"), "{}", result.message);

        let mut data = issue_data();
        data["dueDate"] = json!(null);
        let result = run("update", data, Some(json!({ "dueDate": "2025-04-01" })));
        assert!(result.message.ends_with("*Due date removed*"));
    }

    #[test]
    fn estimate_change() {
        let result = run("update", issue_data(), Some(json!({ "estimate": 5 })));
        assert!(result.message.ends_with("*Estimate: 3*"), "{}", result.message);
    }
}
