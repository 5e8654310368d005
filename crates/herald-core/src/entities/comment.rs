use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{IssueRef, User};

/// A comment on an issue.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub body: String,
    pub user: User,
    pub issue: IssueRef,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
