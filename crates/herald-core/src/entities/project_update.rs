use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{ProjectRef, User};
use crate::enums::ProjectHealth;

/// A status post on a project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub id: String,
    #[serde(default)]
    pub body: String,
    pub health: ProjectHealth,
    pub user: User,
    pub project: ProjectRef,
    #[serde(default)]
    pub created_at: Option<String>,
}
