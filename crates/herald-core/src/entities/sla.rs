use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An SLA record attached to an issue.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueSla {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub breached_at: Option<String>,
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub resolution_time: Option<f64>,
}
