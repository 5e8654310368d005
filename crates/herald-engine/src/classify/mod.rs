//! One classifier per entity type.
//!
//! Each submodule exposes `classify(&Envelope<E>, &ClassifierSettings)`.
//! Entities that react to field-level updates also export their
//! `UPDATE_RULES` table.

pub mod comment;
pub mod cycle;
pub mod issue;
pub mod project;
pub mod project_update;
pub mod sla;
