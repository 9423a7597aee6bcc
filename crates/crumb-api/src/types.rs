//! Wire types for the storefront backend's JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crumb_core::TimelineEvent;

/// Error payload the backend sends on rejected requests.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Successful order creation: where to send the buyer for payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentRedirect {
    pub authorization_url: String,
}

/// Order creation payload.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    pub cake_id: Uuid,
    pub flavour: String,
    pub size: String,
    pub icing: String,
    pub layer_count: u32,
    pub delivery: OrderAddress,
}

/// Delivery address sub-object of [`CreateOrderRequest`].
#[derive(Debug, Serialize)]
pub struct OrderAddress {
    pub address: String,
    pub date: chrono::NaiveDate,
    pub country: String,
    pub state: String,
    pub city: String,
}

/// Review submission payload.
#[derive(Debug, Serialize)]
pub struct SubmitReviewRequest {
    pub order_id: Uuid,
    pub rating: u8,
    pub comment: String,
}

/// One raw timeline entry as the backend sends it.
///
/// `timestamp` stays a string on the wire; parsing is lenient — an
/// unparseable timestamp becomes `None` on the domain event rather than
/// failing the whole timeline.
#[derive(Debug, Deserialize)]
pub struct WireTimelineEvent {
    pub action: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl WireTimelineEvent {
    #[must_use]
    pub fn into_event(self) -> TimelineEvent {
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc));
        TimelineEvent {
            action: self.action,
            timestamp,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_event_parses_rfc3339_timestamp() {
        let wire = WireTimelineEvent {
            action: "pending".to_string(),
            timestamp: Some("2026-08-01T10:00:00+01:00".to_string()),
            description: None,
        };
        let event = wire.into_event();
        assert_eq!(
            event.timestamp.map(|t| t.to_rfc3339()),
            Some("2026-08-01T09:00:00+00:00".to_string()),
            "timestamp should normalize to UTC"
        );
    }

    #[test]
    fn wire_event_malformed_timestamp_becomes_none() {
        let wire = WireTimelineEvent {
            action: "pending".to_string(),
            timestamp: Some("yesterday-ish".to_string()),
            description: Some("in the oven".to_string()),
        };
        let event = wire.into_event();
        assert_eq!(event.timestamp, None);
        assert_eq!(event.description.as_deref(), Some("in the oven"));
    }

    #[test]
    fn wire_event_missing_timestamp_becomes_none() {
        let json = r#"{"action":"approved"}"#;
        let wire: WireTimelineEvent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(wire.into_event().timestamp, None);
    }

    #[test]
    fn create_order_request_serializes_delivery_sub_object() {
        let request = CreateOrderRequest {
            cake_id: Uuid::nil(),
            flavour: "chocolate".to_string(),
            size: "medium".to_string(),
            icing: "buttercream".to_string(),
            layer_count: 3,
            delivery: OrderAddress {
                address: "12 Allen Avenue".to_string(),
                date: chrono::NaiveDate::from_ymd_opt(2026, 9, 12).expect("valid date"),
                country: "Nigeria".to_string(),
                state: "Lagos".to_string(),
                city: "Ikeja".to_string(),
            },
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["layer_count"], 3);
        assert_eq!(json["delivery"]["city"], "Ikeja");
        assert_eq!(json["delivery"]["date"], "2026-09-12");
    }
}
