//! End-to-end classification of representative webhook payloads through the
//! public `Router` API.

use herald_core::Priority;
use herald_engine::{Router, finalize_at, should_emit};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

const CREATED_AT: &str = "2025-03-04T10:00:00.000Z";

fn payload(entity_type: &str, action: &str, data: Value, updated_from: Option<Value>) -> Value {
    let mut payload = json!({
        "action": action,
        "type": entity_type,
        "createdAt": CREATED_AT,
        "url": "https://tracker.example/x",
        "organizationId": "org-1",
        "webhookTimestamp": 1_741_082_400_000_i64,
        "data": data,
    });
    if let Some(previous) = updated_from {
        payload["updatedFrom"] = previous;
    }
    payload
}

fn issue(priority: u8) -> Value {
    json!({
        "id": "iss-1",
        "number": 7,
        "title": "Login loop",
        "priority": priority,
        "state": { "id": "st-done", "name": "Done", "type": "completed" },
        "team": { "key": "WEB" },
        "creator": { "name": "dana" },
        "labelIds": []
    })
}

fn comment(body: &str) -> Value {
    json!({
        "id": "cmt-1",
        "body": body,
        "user": { "name": "dana" },
        "issue": { "number": 7, "title": "Login loop", "team": { "key": "WEB" } }
    })
}

fn project(progress: f64) -> Value {
    json!({ "id": "prj-1", "name": "Onboarding", "state": "started", "progress": progress })
}

fn project_update() -> Value {
    json!({
        "id": "pu-1",
        "body": "On schedule",
        "health": "onTrack",
        "user": { "name": "dana" },
        "project": { "name": "Onboarding" }
    })
}

fn cycle() -> Value {
    json!({
        "id": "cyc-1",
        "number": 3,
        "startDate": "2025-03-03",
        "endDate": "2025-03-17",
        "progress": 0.2
    })
}

fn sla(breached_at: Option<&str>) -> Value {
    json!({ "id": "sla-1", "name": "Resolution", "breachedAt": breached_at })
}

#[test]
fn scenario_urgent_issue_without_assignee() {
    let result = Router::default().dispatch(payload("Issue", "create", issue(1), None));

    assert_eq!(result.priority, Priority::High);
    assert!(result.should_send);
    assert!(result.message.contains("New Issue Created"));
    assert!(result.message.contains("Unassigned"));
}

#[test]
fn scenario_issue_moved_to_completed() {
    let result = Router::default().dispatch(payload(
        "Issue",
        "update",
        issue(3),
        Some(json!({ "stateId": "st-progress" })),
    ));

    assert_eq!(result.priority, Priority::High);
    assert!(result.message.contains("Completed"));
    assert!(result.message.contains("✅ Done"));
}

#[test]
fn scenario_long_comment_is_quoted_and_truncated() {
    let body = "c".repeat(250);
    let result = Router::default().dispatch(payload("Comment", "create", comment(&body), None));

    assert_eq!(result.priority, Priority::Medium);
    let quote = result.message.split("\n\n").nth(1).unwrap();
    assert_eq!(quote, format!("> {}...", "c".repeat(200)));
}

#[test]
fn scenario_project_progress_jump() {
    let result = Router::default().dispatch(payload(
        "Project",
        "update",
        project(0.55),
        Some(json!({ "progress": 0.40 })),
    ));

    assert_eq!(result.priority, Priority::Medium);
    assert!(result.message.contains("Progress Update"));
    assert!(result.message.contains("55%"));
}

#[rstest]
#[case("breached")]
#[case("set")]
#[case("create")]
#[case("remove")]
fn scenario_sla_breach_is_high_for_every_action(#[case] action: &str) {
    let result = Router::default().dispatch(payload(
        "IssueSLA",
        action,
        sla(Some("2025-03-04T09:59:00.000Z")),
        None,
    ));

    assert_eq!(result.priority, Priority::High);
    assert!(result.message.contains("Breach Alert"));
}

#[test]
fn scenario_unknown_entity_type_is_ignored() {
    let result = Router::default().dispatch(json!({
        "action": "create",
        "type": "Unknown",
        "data": { "id": "x" }
    }));

    assert_eq!(result.priority, Priority::Ignore);
    assert!(!result.should_send);
    assert!(result.message.starts_with("INVALID_PAYLOAD"));
}

#[rstest]
#[case("Issue", "create", issue(0))]
#[case("Issue", "create", issue(4))]
#[case("Issue", "remove", issue(2))]
#[case("Comment", "create", comment("hi"))]
#[case("Comment", "update", comment("hi"))]
#[case("Comment", "remove", comment("hi"))]
#[case("Project", "create", project(0.0))]
#[case("Project", "remove", project(0.0))]
#[case("ProjectUpdate", "create", project_update())]
#[case("ProjectUpdate", "update", project_update())]
#[case("ProjectUpdate", "remove", project_update())]
#[case("Cycle", "create", cycle())]
#[case("Cycle", "remove", cycle())]
#[case("IssueSLA", "set", sla(None))]
fn sendable_results_are_never_ignore(
    #[case] entity_type: &str,
    #[case] action: &str,
    #[case] data: Value,
) {
    let result = Router::default().dispatch(payload(entity_type, action, data, None));

    assert!(result.should_send, "{entity_type}/{action}: {}", result.message);
    assert_ne!(result.priority, Priority::Ignore);
    assert!(should_emit(&result));
}

#[test]
fn first_matching_update_rule_wins() {
    // title, priority, and estimate all changed; only the title is reported
    let result = Router::default().dispatch(payload(
        "Issue",
        "update",
        issue(3),
        Some(json!({ "title": "Login", "priority": 1, "estimate": 2 })),
    ));

    assert!(result.message.contains("Issue Title Updated"));
    assert!(!result.message.contains("Priority"));
}

#[test]
fn finalized_text_only_gains_a_footer() {
    use chrono::TimeZone;

    let result = Router::default().dispatch(payload("Issue", "create", issue(1), None));
    let now = chrono::Utc.with_ymd_and_hms(2025, 3, 4, 17, 30, 0).unwrap();

    assert_eq!(
        finalize_at(&result, now),
        format!("{}\n\n*17:30 UTC*", result.message)
    );
}
