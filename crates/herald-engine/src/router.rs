//! Entry point of the engine: validate an envelope, pick the classifier for
//! its entity type, and turn every failure into a suppressed result.

use herald_core::entities::{Comment, Cycle, Issue, IssueSla, Project, ProjectUpdate};
use herald_core::{ClassifiedResult, ClassifierSettings, ClassifyError, EntityType, Priority, RawEnvelope};
use serde::Serialize;
use serde_json::Value;

use crate::classify;

/// Stateless classifier front end. Cheap to share behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Router {
    settings: ClassifierSettings,
}

/// Compact summary of one classification, for logs and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub action: String,
    pub priority: Priority,
    pub should_send: bool,
}

impl Router {
    #[must_use]
    pub const fn new(settings: ClassifierSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    /// Structural validation only.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidPayload`] for a malformed envelope.
    pub fn validate(&self, payload: Value) -> Result<RawEnvelope, ClassifyError> {
        RawEnvelope::validate(payload)
    }

    /// Validate and classify.
    ///
    /// # Errors
    ///
    /// Any [`ClassifyError`]: a malformed payload, an unsupported action, an
    /// update without diff data, or an update with no significant change.
    pub fn classify(&self, payload: Value) -> Result<ClassifiedResult, ClassifyError> {
        let raw = self.validate(payload)?;
        self.classify_raw(raw)
    }

    /// Classify an envelope that already passed [`Router::validate`].
    ///
    /// # Errors
    ///
    /// See [`Router::classify`].
    pub fn classify_raw(&self, raw: RawEnvelope) -> Result<ClassifiedResult, ClassifyError> {
        let settings = &self.settings;
        match raw.entity_type {
            EntityType::Issue => classify::issue::classify(&raw.into_envelope::<Issue>()?, settings),
            EntityType::Comment => {
                classify::comment::classify(&raw.into_envelope::<Comment>()?, settings)
            }
            EntityType::Project => {
                classify::project::classify(&raw.into_envelope::<Project>()?, settings)
            }
            EntityType::ProjectUpdate => classify::project_update::classify(
                &raw.into_envelope::<ProjectUpdate>()?,
                settings,
            ),
            EntityType::Cycle => classify::cycle::classify(&raw.into_envelope::<Cycle>()?, settings),
            EntityType::IssueSla => {
                classify::sla::classify(&raw.into_envelope::<IssueSla>()?, settings)
            }
        }
    }

    /// Classify without failing: errors become suppressed results carrying
    /// the error's diagnostic as their message.
    #[must_use]
    pub fn dispatch(&self, payload: Value) -> ClassifiedResult {
        let (entity, action) = describe(&payload);
        match self.classify(payload) {
            Ok(result) => {
                tracing::debug!(
                    %entity,
                    %action,
                    priority = %result.priority,
                    should_send = result.should_send,
                    "webhook classified"
                );
                result
            }
            Err(error) => {
                log_rejection(&entity, &action, &error);
                error.into()
            }
        }
    }

    /// [`Router::dispatch`] for a raw request body.
    #[must_use]
    pub fn dispatch_str(&self, body: &str) -> ClassifiedResult {
        match serde_json::from_str::<Value>(body) {
            Ok(payload) => self.dispatch(payload),
            Err(error) => {
                let error = ClassifyError::InvalidPayload(format!("body is not JSON: {error}"));
                log_rejection("unknown", "unknown", &error);
                error.into()
            }
        }
    }

    /// Classify and summarize. `type` and `action` echo the payload, or
    /// `unknown` when absent.
    #[must_use]
    pub fn stats(&self, payload: &Value) -> EventStats {
        let (entity_type, action) = describe(payload);
        let result = self.dispatch(payload.clone());
        EventStats {
            entity_type,
            action,
            priority: result.priority,
            should_send: result.should_send,
        }
    }
}

fn describe(payload: &Value) -> (String, String) {
    let field = |key: &str| {
        payload
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string()
    };
    (field("type"), field("action"))
}

fn log_rejection(entity: &str, action: &str, error: &ClassifyError) {
    match error {
        ClassifyError::InvalidPayload(_) | ClassifyError::UnsupportedAction { .. } => {
            tracing::warn!(entity, action, code = error.code(), %error, "webhook rejected");
        }
        ClassifyError::MissingDiffData { .. } | ClassifyError::IgnoredChange { .. } => {
            tracing::debug!(entity, action, code = error.code(), "webhook ignored");
        }
    }
}
