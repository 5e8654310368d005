//! One webhook request body in, one acknowledgement out.
//!
//! The tracker only needs to know the request arrived: every classification
//! outcome, including a malformed body, acknowledges with 200. Only a failed
//! delivery answers otherwise.

use herald_core::{EntityType, Priority};
use herald_engine::{Router, finalize, should_emit};
use herald_sink::{Channel, DeliverySink};
use serde::Serialize;
use serde_json::Value;

/// JSON body returned to the webhook caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AckData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AckData {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub action: String,
    pub priority: Priority,
}

/// HTTP status plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub ack: Ack,
}

impl Reply {
    fn ok(message: &str, data: AckData) -> Self {
        Self {
            status: 200,
            ack: Ack {
                success: true,
                message: message.to_string(),
                data: Some(data),
            },
        }
    }

    pub fn failed(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            ack: Ack {
                success: false,
                message: message.into(),
                data: None,
            },
        }
    }
}

/// Classify `body` and deliver it through `sink` when the result is
/// sendable.
pub async fn handle_webhook<S: DeliverySink>(router: &Router, sink: &S, body: &str) -> Reply {
    let (entity_type, action, result) = match serde_json::from_str::<Value>(body) {
        Ok(payload) => {
            let entity_type = text_field(&payload, "type");
            let action = text_field(&payload, "action");
            (entity_type, action, router.dispatch(payload))
        }
        Err(_) => ("unknown".to_string(), "unknown".to_string(), router.dispatch_str(body)),
    };
    let data = AckData {
        entity_type,
        action,
        priority: result.priority,
    };

    if !should_emit(&result) {
        tracing::info!(
            entity = %data.entity_type,
            action = %data.action,
            reason = %result.message,
            "event ignored"
        );
        return Reply::ok("Event ignored", data);
    }

    let channel = channel_for(&data.entity_type);
    match sink.send(&finalize(&result), channel).await {
        Ok(()) => {
            tracing::info!(
                entity = %data.entity_type,
                action = %data.action,
                priority = %data.priority,
                %channel,
                "event delivered"
            );
            Reply::ok("Event processed successfully", data)
        }
        Err(error) => {
            tracing::error!(
                entity = %data.entity_type,
                action = %data.action,
                %error,
                "delivery failed"
            );
            Reply::failed(502, format!("Delivery failed: {error}"))
        }
    }
}

fn channel_for(entity_type: &str) -> Channel {
    entity_type
        .parse::<EntityType>()
        .map_or(Channel::Default, |entity| {
            Channel::for_project_related(entity.is_project_related())
        })
}

fn text_field(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::testing::RecordingSink;
    use super::*;

    fn project_update_payload(health: &str) -> String {
        json!({
            "action": "create",
            "type": "ProjectUpdate",
            "url": "https://linear.app/acme/project/payments-v2",
            "data": {
                "id": "pu-1",
                "body": "Vendor API is late",
                "health": health,
                "user": { "id": "u-1", "name": "alex", "displayName": "Alex" },
                "project": { "id": "prj-1", "name": "Payments v2" }
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn sendable_event_is_delivered_to_its_channel() {
        let sink = RecordingSink::default();
        let reply = handle_webhook(&Router::default(), &sink, &project_update_payload("atRisk")).await;

        assert_eq!(reply.status, 200);
        assert_eq!(
            serde_json::to_value(&reply.ack).unwrap(),
            json!({
                "success": true,
                "message": "Event processed successfully",
                "data": { "type": "ProjectUpdate", "action": "create", "priority": "medium" }
            })
        );
        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, Channel::Projects);
        assert!(sent[0].0.contains("Payments v2"));
    }

    #[tokio::test]
    async fn ignored_event_is_acknowledged_without_delivery() {
        let sink = RecordingSink::default();
        let body = json!({
            "action": "update",
            "type": "Issue",
            "data": { "id": "iss-1" }
        })
        .to_string();

        let reply = handle_webhook(&Router::default(), &sink, &body).await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.ack.message, "Event ignored");
        let data = reply.ack.data.unwrap();
        assert_eq!(data.entity_type, "Issue");
        assert_eq!(data.priority, Priority::Ignore);
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_acknowledged_as_unknown() {
        let sink = RecordingSink::default();
        let reply = handle_webhook(&Router::default(), &sink, "{not json").await;

        assert_eq!(reply.status, 200);
        let data = reply.ack.data.unwrap();
        assert_eq!(data.entity_type, "unknown");
        assert_eq!(data.action, "unknown");
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_bad_gateway() {
        let sink = RecordingSink::failing();
        let reply = handle_webhook(&Router::default(), &sink, &project_update_payload("offTrack")).await;

        assert_eq!(reply.status, 502);
        assert!(!reply.ack.success);
        assert!(reply.ack.data.is_none());
        assert!(reply.ack.message.starts_with("Delivery failed"));
    }

    #[test]
    fn channel_follows_entity_type() {
        assert_eq!(channel_for("Project"), Channel::Projects);
        assert_eq!(channel_for("ProjectUpdate"), Channel::Projects);
        assert_eq!(channel_for("Issue"), Channel::Default);
        assert_eq!(channel_for("unknown"), Channel::Default);
    }
}
