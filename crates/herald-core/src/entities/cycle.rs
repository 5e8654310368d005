use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::Team;
use super::Entity;
use crate::enums::EntityType;
use crate::prior;

/// A time-boxed iteration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub number: u32,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub team: Option<Team>,
}

impl Cycle {
    /// Cycles are often unnamed; fall back to their number.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Cycle {}", self.number),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleChanges {
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub completed_at: Option<Option<String>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub progress: Option<Option<f64>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "prior::deserialize")]
    pub end_date: Option<Option<String>>,
}

impl Entity for Cycle {
    const TYPE: EntityType = EntityType::Cycle;
    type Changes = CycleChanges;
}
