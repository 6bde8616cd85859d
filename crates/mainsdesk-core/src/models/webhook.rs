//! Payment gateway webhook payloads.
//!
//! The gateway posts `{ "event": "...", "payload": { "<name>": { "entity": {...} } } }`.
//! Only two event types carry business meaning here; everything else is
//! acknowledged and dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::AppError;

pub const PAYMENT_CAPTURED: &str = "payment.captured";
pub const SUBSCRIPTION_CHARGED: &str = "subscription.charged";

/// Value of `notes.type` set on one-time orders
pub const NOTE_TYPE_ONE_TIME: &str = "one_time";
/// Value of `notes.type` set on subscriptions
pub const NOTE_TYPE_RECURRING: &str = "recurring";

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    pub event: String,
    #[serde(default)]
    pub payload: HashMap<String, EntityWrapper>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityWrapper {
    pub entity: serde_json::Value,
}

/// Metadata echoed back by the gateway. Set by this service when the order or
/// subscription is created.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GatewayNotes {
    pub supabase_plan_id: Option<String>,
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl GatewayNotes {
    pub fn is_one_time(&self) -> bool {
        self.kind.as_deref() == Some(NOTE_TYPE_ONE_TIME)
    }

    pub fn plan_id(&self) -> Result<Uuid, AppError> {
        parse_required_uuid(self.supabase_plan_id.as_deref(), "notes.supabase_plan_id")
    }

    pub fn user_id(&self) -> Result<Uuid, AppError> {
        parse_required_uuid(self.user_id.as_deref(), "notes.user_id")
    }
}

fn parse_required_uuid(value: Option<&str>, field: &str) -> Result<Uuid, AppError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{} is required", field)))?;
    Uuid::parse_str(raw)
        .map_err(|_| AppError::InvalidInput(format!("{} is not a valid id", field)))
}

/// The gateway sends `"notes": []` when nothing was attached.
fn notes_or_empty<'de, D>(deserializer: D) -> Result<GatewayNotes, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNotes {
        Map(GatewayNotes),
        List(Vec<serde_json::Value>),
    }

    Ok(match Option::<RawNotes>::deserialize(deserializer)? {
        Some(RawNotes::Map(notes)) => notes,
        Some(RawNotes::List(_)) | None => GatewayNotes::default(),
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "notes_or_empty")]
    pub notes: GatewayNotes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionEntity {
    pub id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_start: Option<i64>,
    #[serde(default)]
    pub current_end: Option<i64>,
    #[serde(default, deserialize_with = "notes_or_empty")]
    pub notes: GatewayNotes,
}

impl SubscriptionEntity {
    pub fn period_start(&self) -> Result<DateTime<Utc>, AppError> {
        required_instant(self.current_start, "current_start")
    }

    pub fn period_end(&self) -> Result<DateTime<Utc>, AppError> {
        required_instant(self.current_end, "current_end")
    }
}

fn required_instant(value: Option<i64>, field: &str) -> Result<DateTime<Utc>, AppError> {
    let secs = value.ok_or_else(|| {
        AppError::InvalidInput(format!("subscription.{} is required", field))
    })?;
    epoch_seconds_to_utc(secs)
}

/// Gateway timestamps are epoch seconds; they are scaled to milliseconds first.
pub fn epoch_seconds_to_utc(secs: i64) -> Result<DateTime<Utc>, AppError> {
    secs.checked_mul(1000)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(|| AppError::InvalidInput(format!("timestamp {} is out of range", secs)))
}

/// A verified webhook, narrowed to the shapes this service acts on.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    PaymentCaptured(PaymentEntity),
    SubscriptionCharged {
        subscription: SubscriptionEntity,
        payment: PaymentEntity,
    },
    Unhandled(String),
}

impl GatewayEvent {
    pub fn from_envelope(envelope: &WebhookEnvelope) -> Result<Self, AppError> {
        match envelope.event.as_str() {
            PAYMENT_CAPTURED => Ok(GatewayEvent::PaymentCaptured(entity(
                envelope, "payment",
            )?)),
            SUBSCRIPTION_CHARGED => Ok(GatewayEvent::SubscriptionCharged {
                subscription: entity(envelope, "subscription")?,
                payment: entity(envelope, "payment")?,
            }),
            other => Ok(GatewayEvent::Unhandled(other.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            GatewayEvent::PaymentCaptured(_) => PAYMENT_CAPTURED,
            GatewayEvent::SubscriptionCharged { .. } => SUBSCRIPTION_CHARGED,
            GatewayEvent::Unhandled(name) => name,
        }
    }
}

fn entity<T>(envelope: &WebhookEnvelope, key: &str) -> Result<T, AppError>
where
    T: for<'de> Deserialize<'de>,
{
    let wrapper = envelope.payload.get(key).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "{} event is missing payload.{}.entity",
            envelope.event, key
        ))
    })?;
    serde_json::from_value(wrapper.entity.clone()).map_err(|e| {
        AppError::InvalidInput(format!("payload.{}.entity is malformed: {}", key, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> WebhookEnvelope {
        serde_json::from_value(value).expect("envelope")
    }

    #[test]
    fn test_payment_captured_is_routed() {
        let env = envelope(json!({
            "event": "payment.captured",
            "payload": { "payment": { "entity": {
                "id": "pay_123",
                "method": "upi",
                "amount": 49900,
                "notes": { "supabase_plan_id": "8c7d2f4e-5b8a-4d62-9a0e-0d1c2b3a4f5e", "type": "one_time" }
            }}}
        }));

        match GatewayEvent::from_envelope(&env).unwrap() {
            GatewayEvent::PaymentCaptured(payment) => {
                assert_eq!(payment.id, "pay_123");
                assert_eq!(payment.method.as_deref(), Some("upi"));
                assert!(payment.notes.is_one_time());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_is_unhandled() {
        let env = envelope(json!({ "event": "refund.processed", "payload": {} }));
        let event = GatewayEvent::from_envelope(&env).unwrap();
        assert!(matches!(event, GatewayEvent::Unhandled(ref name) if name == "refund.processed"));
    }

    #[test]
    fn test_subscription_charged_requires_payment_entity() {
        let env = envelope(json!({
            "event": "subscription.charged",
            "payload": { "subscription": { "entity": { "id": "sub_1" } } }
        }));
        let err = GatewayEvent::from_envelope(&env).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg.contains("payload.payment")));
    }

    #[test]
    fn test_empty_notes_list_is_accepted() {
        let payment: PaymentEntity =
            serde_json::from_value(json!({ "id": "pay_1", "notes": [] })).unwrap();
        assert_eq!(payment.notes, GatewayNotes::default());
        assert!(!payment.notes.is_one_time());
    }

    #[test]
    fn test_missing_user_id_fails_closed() {
        let notes = GatewayNotes {
            supabase_plan_id: Some(Uuid::new_v4().to_string()),
            user_id: None,
            kind: Some("one_time".to_string()),
        };
        assert!(notes.plan_id().is_ok());
        assert!(matches!(notes.user_id(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_malformed_plan_id_rejected() {
        let notes = GatewayNotes {
            supabase_plan_id: Some("P1".to_string()),
            ..Default::default()
        };
        assert!(matches!(notes.plan_id(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_epoch_seconds_scaled_to_millis() {
        let instant = epoch_seconds_to_utc(1_700_000_000).unwrap();
        assert_eq!(instant.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(instant.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_epoch_overflow_rejected() {
        assert!(epoch_seconds_to_utc(i64::MAX).is_err());
    }
}
