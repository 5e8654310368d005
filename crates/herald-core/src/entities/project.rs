use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{Team, User};
use super::Entity;
use crate::enums::{EntityType, ProjectState};
use crate::prior;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: ProjectState,
    /// Completion as a fraction in `0.0..=1.0`.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub target_date: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub creator: Option<User>,
    #[serde(default)]
    pub lead: Option<User>,
    #[serde(default)]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChanges {
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub state: Option<Option<ProjectState>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub lead_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub target_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub progress: Option<Option<f64>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub name: Option<Option<String>>,
}

impl Entity for Project {
    const TYPE: EntityType = EntityType::Project;
    type Changes = ProjectChanges;
}
