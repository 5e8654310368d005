//! JsonSchema validation and deserialization tests for sample webhook payloads.

use herald_core::entities::{
    Comment, Cycle, CycleChanges, Issue, IssueChanges, IssueSla, Project, ProjectChanges,
    ProjectUpdate,
};
use herald_core::enums::{IssueStateType, ProjectHealth, ProjectState};
use herald_core::{EntityType, RawEnvelope};
use pretty_assertions::assert_eq;
use schemars::schema_for;
use serde_json::{Value, json};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(schema: &Value, instance: &Value) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn issue_data() -> Value {
    json!({
        "id": "iss-1",
        "number": 42,
        "title": "Checkout fails on Safari",
        "priority": 1,
        "priorityLabel": "Urgent",
        "state": { "id": "st-done", "name": "Done", "color": "#0f0", "type": "completed" },
        "team": { "id": "team-1", "key": "ENG", "name": "Engineering" },
        "assignee": { "id": "u-2", "name": "sam", "displayName": "Sam" },
        "assigneeId": "u-2",
        "creator": { "id": "u-1", "name": "alex" },
        "labels": [{ "id": "lbl-bug", "name": "Bug", "color": "#f00" }],
        "labelIds": ["lbl-bug"],
        "dueDate": "2025-04-01",
        "estimate": 3,
        "createdAt": "2025-03-01T09:00:00.000Z",
        "updatedAt": "2025-03-04T10:00:00.000Z"
    })
}

macro_rules! validate_sample {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let instance: Value = $instance;
            let parsed: $ty = serde_json::from_value(instance.clone())
                .unwrap_or_else(|e| panic!("{} should deserialize: {e}", stringify!($ty)));

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let reserialized = serde_json::to_value(&parsed).unwrap();
            let errors = validate_against_schema(&schema, &reserialized);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

validate_sample!(issue_sample, Issue, issue_data());

validate_sample!(
    comment_sample,
    Comment,
    json!({
        "id": "cmt-1",
        "body": "Reproduced on 17.2",
        "user": { "id": "u-1", "name": "alex" },
        "issue": { "id": "iss-1", "number": 42, "title": "Checkout fails", "team": { "key": "ENG" } }
    })
);

validate_sample!(
    project_sample,
    Project,
    json!({
        "id": "prj-1",
        "name": "Payments v2",
        "state": "started",
        "progress": 0.55,
        "targetDate": "2025-06-30",
        "lead": { "id": "u-3", "name": "kim" },
        "leadId": "u-3",
        "teams": [{ "id": "team-1", "key": "ENG", "name": "Engineering" }]
    })
);

validate_sample!(
    project_update_sample,
    ProjectUpdate,
    json!({
        "id": "pu-1",
        "body": "Vendor API is late",
        "health": "atRisk",
        "user": { "id": "u-3", "name": "kim" },
        "project": { "id": "prj-1", "name": "Payments v2" }
    })
);

validate_sample!(
    cycle_sample,
    Cycle,
    json!({
        "id": "cyc-1",
        "number": 7,
        "startDate": "2025-03-03T00:00:00.000Z",
        "endDate": "2025-03-17T00:00:00.000Z",
        "progress": 0.4,
        "team": { "key": "ENG", "name": "Engineering" }
    })
);

validate_sample!(
    sla_sample,
    IssueSla,
    json!({ "id": "sla-1", "name": "First response", "breachedAt": "2025-03-04T09:59:00.000Z" })
);

#[test]
fn inbound_envelope_matches_schema() {
    let payload = json!({
        "action": "update",
        "type": "Issue",
        "createdAt": "2025-03-04T10:00:00.000Z",
        "url": "https://tracker.example/issue/ENG-42",
        "organizationId": "org-1",
        "webhookTimestamp": 1_741_082_400_000_i64,
        "data": issue_data(),
        "updatedFrom": { "stateId": "st-progress", "updatedAt": "2025-03-03T10:00:00.000Z" }
    });

    let schema = serde_json::to_value(schema_for!(RawEnvelope)).unwrap();
    let errors = validate_against_schema(&schema, &payload);
    assert!(errors.is_empty(), "{errors:?}");

    let raw = RawEnvelope::validate(payload).unwrap();
    assert_eq!(raw.entity_type, EntityType::Issue);
}

#[test]
fn issue_snapshot_reads_embedded_relations() {
    let issue: Issue = serde_json::from_value(issue_data()).unwrap();
    assert_eq!(issue.state.state_type, IssueStateType::Completed);
    assert_eq!(issue.team.key, "ENG");
    assert_eq!(issue.label_name("lbl-bug"), "Bug");
    assert_eq!(issue.label_name("lbl-gone"), "lbl-gone");
    assert_eq!(issue.estimate, Some(3.0));
}

#[test]
fn issue_changes_keep_only_diff_significant_fields() {
    let changes: IssueChanges = serde_json::from_value(json!({
        "stateId": "st-progress",
        "assigneeId": null,
        "labelIds": ["lbl-a", "lbl-b"],
        "updatedAt": "2025-03-03T10:00:00.000Z",
        "sortOrder": 12.5
    }))
    .unwrap();

    assert_eq!(
        changes,
        IssueChanges {
            state_id: Some(Some("st-progress".into())),
            assignee_id: Some(None),
            label_ids: Some(Some(vec!["lbl-a".into(), "lbl-b".into()])),
            ..IssueChanges::default()
        }
    );
}

#[test]
fn project_and_cycle_changes_parse_previous_values() {
    let project: ProjectChanges =
        serde_json::from_value(json!({ "state": "planned", "progress": 0.4 })).unwrap();
    assert_eq!(project.state, Some(Some(ProjectState::Planned)));
    assert_eq!(project.progress, Some(Some(0.4)));
    assert_eq!(project.name, None);

    let cycle: CycleChanges =
        serde_json::from_value(json!({ "completedAt": null })).unwrap();
    assert_eq!(cycle.completed_at, Some(None));
    assert_eq!(cycle.progress, None);
}

#[test]
fn unknown_health_still_parses() {
    let update: ProjectUpdate = serde_json::from_value(json!({
        "id": "pu-2",
        "health": "paused",
        "user": { "name": "kim" },
        "project": { "name": "Payments v2" }
    }))
    .unwrap();
    assert_eq!(update.health, ProjectHealth::Unknown);
    assert!(update.body.is_empty());
}
