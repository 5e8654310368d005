//! Closed vocabularies of the webhook payloads: actions, entity types,
//! workflow states, project health, and notification priority.
//!
//! Wire names follow the tracker's camelCase / PascalCase conventions.
//! Entity-internal enums carry an `Unknown` catch-all so a new upstream value
//! degrades to a neutral rendering instead of failing the whole payload.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Remove,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "remove" => Ok(Self::Remove),
            other => Err(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Kind of entity a webhook envelope carries.
///
/// Each variant maps to exactly one snapshot struct and one classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum EntityType {
    Issue,
    Comment,
    Project,
    ProjectUpdate,
    Cycle,
    #[serde(alias = "IssueSLA", alias = "SLA")]
    IssueSla,
}

impl EntityType {
    pub const ALL: [Self; 6] = [
        Self::Issue,
        Self::Comment,
        Self::Project,
        Self::ProjectUpdate,
        Self::Cycle,
        Self::IssueSla,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "Issue",
            Self::Comment => "Comment",
            Self::Project => "Project",
            Self::ProjectUpdate => "ProjectUpdate",
            Self::Cycle => "Cycle",
            Self::IssueSla => "IssueSla",
        }
    }

    /// Project-level entities are routed to the projects channel when one is
    /// configured.
    #[must_use]
    pub const fn is_project_related(self) -> bool {
        matches!(self, Self::Project | Self::ProjectUpdate)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Issue" => Ok(Self::Issue),
            "Comment" => Ok(Self::Comment),
            "Project" => Ok(Self::Project),
            "ProjectUpdate" => Ok(Self::ProjectUpdate),
            "Cycle" => Ok(Self::Cycle),
            "IssueSla" | "IssueSLA" | "SLA" => Ok(Self::IssueSla),
            other => Err(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Notification urgency, most urgent first.
///
/// `Ignore` doubles as the suppression signal: an `Ignore` result is never
/// delivered, whatever its `should_send` flag says.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    Ignore,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IssueStateType
// ---------------------------------------------------------------------------

/// Category of an issue workflow state.
///
/// ```text
/// backlog → unstarted → started → completed
///                               → canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum IssueStateType {
    Backlog,
    Unstarted,
    Started,
    Completed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl IssueStateType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Unstarted => "unstarted",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IssueStateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProjectState
// ---------------------------------------------------------------------------

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProjectState {
    Backlog,
    Planned,
    Started,
    Paused,
    Completed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl ProjectState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Planned => "planned",
            Self::Started => "started",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProjectHealth
// ---------------------------------------------------------------------------

/// Health reported with a project update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProjectHealth {
    OnTrack,
    AtRisk,
    OffTrack,
    #[serde(other)]
    Unknown,
}

impl ProjectHealth {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "onTrack",
            Self::AtRisk => "atRisk",
            Self::OffTrack => "offTrack",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
