//! Tunable thresholds for the classifiers.
//!
//! Lives in the core crate so both the engine and the configuration loader
//! can name it.

use serde::{Deserialize, Serialize};

const fn default_urgent_priority_threshold() -> u8 {
    2
}

const fn default_project_progress_delta() -> f64 {
    0.10
}

const fn default_cycle_progress_delta() -> f64 {
    0.15
}

const fn default_comment_preview_chars() -> usize {
    200
}

const fn default_project_update_preview_chars() -> usize {
    150
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClassifierSettings {
    /// Issue priorities from 1 (urgent) up to this value are treated as
    /// urgent. 0 means "no priority" and is never urgent.
    #[serde(default = "default_urgent_priority_threshold")]
    pub urgent_priority_threshold: u8,

    /// Minimum absolute progress change (fraction) that announces a project.
    #[serde(default = "default_project_progress_delta")]
    pub project_progress_delta: f64,

    /// Minimum absolute progress change (fraction) that announces a cycle.
    #[serde(default = "default_cycle_progress_delta")]
    pub cycle_progress_delta: f64,

    /// Characters of a comment body quoted in the notification.
    #[serde(default = "default_comment_preview_chars")]
    pub comment_preview_chars: usize,

    /// Characters of a project update body quoted in the notification.
    #[serde(default = "default_project_update_preview_chars")]
    pub project_update_preview_chars: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            urgent_priority_threshold: default_urgent_priority_threshold(),
            project_progress_delta: default_project_progress_delta(),
            cycle_progress_delta: default_cycle_progress_delta(),
            comment_preview_chars: default_comment_preview_chars(),
            project_update_preview_chars: default_project_update_preview_chars(),
        }
    }
}

impl ClassifierSettings {
    /// Whether an issue priority number counts as urgent.
    #[must_use]
    pub const fn is_urgent(&self, priority: u8) -> bool {
        priority != 0 && priority <= self.urgent_priority_threshold
    }
}
