//! Inbound webhook envelope.
//!
//! Parsing happens in two steps:
//!
//! 1. [`RawEnvelope::validate`] checks the structural contract shared by
//!    every entity (object shape, `action`, `type`, `data`) and resolves the
//!    entity type against the closed set.
//! 2. [`RawEnvelope::into_envelope`] deserializes `data` and `updatedFrom`
//!    into the snapshot and change-set types of one entity.
//!
//! Both steps report [`ClassifyError::InvalidPayload`] on failure.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::Entity;
use crate::enums::{Action, EntityType};
use crate::errors::ClassifyError;

/// A structurally valid envelope whose `data` is still untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawEnvelope {
    /// Action string as received. Most entities use `create`, `update`, or
    /// `remove`; SLA events use their own vocabulary.
    pub action: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Current full state of the entity.
    pub data: Value,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub webhook_timestamp: Option<i64>,
    /// Previous values of the fields that changed, keyed by field name.
    #[serde(default)]
    pub updated_from: Option<Value>,
}

impl RawEnvelope {
    /// Check the envelope contract and resolve the entity type.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidPayload`] if the payload is not an
    /// object, `action` is missing or not a non-empty string, `type` is
    /// missing or outside the closed set, or `data` is missing or null.
    pub fn validate(value: Value) -> Result<Self, ClassifyError> {
        let Value::Object(mut map) = value else {
            return Err(ClassifyError::invalid("payload is not a JSON object"));
        };

        let action = match map.remove("action") {
            Some(Value::String(action)) if !action.is_empty() => action,
            Some(_) => return Err(ClassifyError::invalid("action must be a non-empty string")),
            None => return Err(ClassifyError::invalid("missing action")),
        };

        let entity_type = match map.remove("type") {
            Some(Value::String(name)) => name.parse::<EntityType>().map_err(|name| {
                ClassifyError::invalid(format!("unsupported entity type '{name}'"))
            })?,
            Some(_) => return Err(ClassifyError::invalid("type must be a string")),
            None => return Err(ClassifyError::invalid("missing type")),
        };

        let data = match map.remove("data") {
            Some(Value::Null) | None => return Err(ClassifyError::invalid("missing data")),
            Some(data) => data,
        };

        let updated_from = match map.remove("updatedFrom") {
            Some(Value::Null) | None => None,
            Some(previous) => Some(previous),
        };

        Ok(Self {
            action,
            entity_type,
            created_at: take_string(&mut map, "createdAt"),
            data,
            url: take_string(&mut map, "url").unwrap_or_default(),
            organization_id: take_string(&mut map, "organizationId").unwrap_or_default(),
            webhook_timestamp: map.get("webhookTimestamp").and_then(Value::as_i64),
            updated_from,
        })
    }

    /// Deserialize `data` and `updatedFrom` as entity `E`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidPayload`] if the envelope is for a
    /// different entity type, or if `data` / `updatedFrom` do not match the
    /// shapes of `E`.
    pub fn into_envelope<E: Entity>(self) -> Result<Envelope<E>, ClassifyError> {
        if self.entity_type != E::TYPE {
            return Err(ClassifyError::invalid(format!(
                "envelope type {} cannot be read as {}",
                self.entity_type,
                E::TYPE
            )));
        }

        let data: E = serde_json::from_value(self.data).map_err(|error| {
            ClassifyError::invalid(format!("malformed {} data: {error}", E::TYPE))
        })?;

        let updated_from = self
            .updated_from
            .map(serde_json::from_value::<E::Changes>)
            .transpose()
            .map_err(|error| {
                ClassifyError::invalid(format!("malformed {} updatedFrom: {error}", E::TYPE))
            })?;

        Ok(Envelope {
            action: self.action,
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            data,
            url: self.url,
            organization_id: self.organization_id,
            webhook_timestamp: self.webhook_timestamp,
            updated_from,
        })
    }
}

/// A typed envelope for one entity.
#[derive(Debug, Clone)]
pub struct Envelope<E: Entity> {
    pub action: String,
    pub created_at: Option<DateTime<Utc>>,
    pub data: E,
    pub url: String,
    pub organization_id: String,
    pub webhook_timestamp: Option<i64>,
    pub updated_from: Option<E::Changes>,
}

impl<E: Entity> Envelope<E> {
    /// Envelope with empty metadata, mostly useful in tests.
    pub fn new(action: Action, data: E) -> Self {
        Self {
            action: action.as_str().to_string(),
            created_at: None,
            data,
            url: String::new(),
            organization_id: String::new(),
            webhook_timestamp: None,
            updated_from: None,
        }
    }

    #[must_use]
    pub fn with_changes(mut self, changes: E::Changes) -> Self {
        self.updated_from = Some(changes);
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Parse the action string.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::UnsupportedAction`] for anything other than
    /// `create`, `update`, or `remove`.
    pub fn action(&self) -> Result<Action, ClassifyError> {
        self.action
            .parse()
            .map_err(|action| ClassifyError::UnsupportedAction {
                entity: E::TYPE,
                action,
            })
    }

    /// The `updatedFrom` change set of an update.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::MissingDiffData`] when `updatedFrom` is absent.
    pub fn changes(&self) -> Result<&E::Changes, ClassifyError> {
        self.updated_from
            .as_ref()
            .ok_or(ClassifyError::MissingDiffData { entity: E::TYPE })
    }

    /// When the event happened, from `createdAt` or else `webhookTimestamp`
    /// (milliseconds). Used as the reference point for relative date
    /// rendering so classification never reads the clock.
    #[must_use]
    pub fn reference_time(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .or_else(|| self.webhook_timestamp.and_then(DateTime::from_timestamp_millis))
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}
