use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{IssueLabel, IssueState, Team, User};
use super::Entity;
use crate::enums::EntityType;
use crate::prior;

/// An issue as delivered in webhook `data`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 0 (no priority), then 1 (urgent) through 4 (low).
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub priority_label: Option<String>,
    pub state: IssueState,
    pub team: Team,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub creator: Option<User>,
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
    #[serde(default)]
    pub label_ids: Vec<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimate: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Issue {
    /// Resolve a label id to its name using the labels embedded in this
    /// snapshot, falling back to the id itself.
    #[must_use]
    pub fn label_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.labels
            .iter()
            .find(|label| label.id == id)
            .map_or(id, |label| label.name.as_str())
    }
}

/// Previous values of the issue fields that drive update notifications.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueChanges {
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub state_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub assignee_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub priority: Option<Option<u8>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub label_ids: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub estimate: Option<Option<f64>>,
}

impl Entity for Issue {
    const TYPE: EntityType = EntityType::Issue;
    type Changes = IssueChanges;
}
