//! Entity snapshots carried in webhook `data`, and the diff-significant
//! change sets carried in `updatedFrom`.
//!
//! Snapshots are denormalized read models: they embed the relations a
//! message needs (team, assignee, labels, parent project) so classification
//! never performs a lookup. All snapshot structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema`.

mod comment;
mod common;
mod cycle;
mod issue;
mod project;
mod project_update;
mod sla;

pub use comment::Comment;
pub use common::{IssueLabel, IssueRef, IssueState, ProjectRef, Team, User};
pub use cycle::{Cycle, CycleChanges};
pub use issue::{Issue, IssueChanges};
pub use project::{Project, ProjectChanges};
pub use project_update::ProjectUpdate;
pub use sla::IssueSla;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::enums::EntityType;

/// A snapshot type that can arrive as webhook `data`.
pub trait Entity: DeserializeOwned + fmt::Debug + Clone {
    /// The envelope `type` this snapshot belongs to.
    const TYPE: EntityType;

    /// Fields whose previous values can trigger a distinct message.
    type Changes: DeserializeOwned + fmt::Debug + Clone + Default + PartialEq;
}

/// Change set for entities whose updates are not diffed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoChanges {}

impl Entity for Comment {
    const TYPE: EntityType = EntityType::Comment;
    type Changes = NoChanges;
}

impl Entity for ProjectUpdate {
    const TYPE: EntityType = EntityType::ProjectUpdate;
    type Changes = NoChanges;
}

impl Entity for IssueSla {
    const TYPE: EntityType = EntityType::IssueSla;
    type Changes = NoChanges;
}
