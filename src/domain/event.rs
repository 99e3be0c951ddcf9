use serde::Deserialize;
use std::collections::HashMap;

/// Event types this core reacts to. Everything else is acknowledged and
/// ignored, since the processor sends a far wider catalogue than we handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    SetupSucceeded,
    SetupFailed,
    PaymentMethodAttached,
    CheckoutCompleted,
    PaymentSucceeded,
    Other(String),
}

impl EventKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "setup_intent.succeeded" => Self::SetupSucceeded,
            "setup_intent.setup_failed" => Self::SetupFailed,
            "payment_method.attached" => Self::PaymentMethodAttached,
            "checkout.session.completed" => Self::CheckoutCompleted,
            "payment_intent.succeeded" => Self::PaymentSucceeded,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A webhook delivery from the payment processor.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProcessorEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

impl ProcessorEvent {
    pub fn kind(&self) -> EventKind {
        EventKind::parse(&self.event_type)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EventData {
    pub object: EventObject,
}

/// The object embedded in an event. Its shape varies per event type, so
/// every field is optional and unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EventObject {
    /// The intent/session id, or the payment method id for
    /// `payment_method.attached` events where the object IS the method.
    pub id: Option<String>,
    pub customer: Option<String>,
    pub payment_method: Option<MethodRef>,
    /// Charged amount in currency minor units, for payment intents.
    pub amount_received: Option<i64>,
    pub card: Option<CardPayload>,
    pub last_setup_error: Option<SetupError>,
    pub metadata: HashMap<String, String>,
}

/// An expandable payment-method reference: either a bare id or the full
/// object, depending on how the processor serialized the event.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MethodRef {
    Id(String),
    Expanded(PaymentMethodPayload),
}

impl MethodRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Expanded(pm) => &pm.id,
        }
    }

    pub fn card(&self) -> Option<&CardPayload> {
        match self {
            Self::Id(_) => None,
            Self::Expanded(pm) => pm.card.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PaymentMethodPayload {
    pub id: String,
    #[serde(default)]
    pub card: Option<CardPayload>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CardPayload {
    pub brand: Option<String>,
    pub last4: Option<String>,
    pub exp_month: Option<u8>,
    pub exp_year: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SetupError {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_dispatch() {
        assert_eq!(
            EventKind::parse("payment_intent.succeeded"),
            EventKind::PaymentSucceeded
        );
        assert_eq!(
            EventKind::parse("invoice.finalized"),
            EventKind::Other("invoice.finalized".to_string())
        );
    }

    #[test]
    fn test_parse_payment_intent_event() {
        let payload = r#"{
            "id": "evt_1",
            "type": "payment_intent.succeeded",
            "data": {
                "object": {
                    "id": "pi_42",
                    "customer": "cus_7",
                    "amount_received": 12000,
                    "payment_method": "pm_3",
                    "unknown_field": true
                }
            }
        }"#;
        let event: ProcessorEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.kind(), EventKind::PaymentSucceeded);
        let object = &event.data.object;
        assert_eq!(object.id.as_deref(), Some("pi_42"));
        assert_eq!(object.amount_received, Some(12000));
        assert_eq!(object.payment_method.as_ref().unwrap().id(), "pm_3");
    }

    #[test]
    fn test_parse_expanded_payment_method() {
        let payload = r#"{
            "id": "evt_2",
            "type": "setup_intent.succeeded",
            "data": {
                "object": {
                    "id": "seti_1",
                    "customer": "cus_7",
                    "payment_method": {
                        "id": "pm_9",
                        "card": {"brand": "visa", "last4": "4242", "exp_month": 4, "exp_year": 2030}
                    }
                }
            }
        }"#;
        let event: ProcessorEvent = serde_json::from_str(payload).unwrap();
        let method = event.data.object.payment_method.as_ref().unwrap();
        assert_eq!(method.id(), "pm_9");
        assert_eq!(method.card().unwrap().last4.as_deref(), Some("4242"));
    }

    #[test]
    fn test_parse_setup_failed_event() {
        let payload = r#"{
            "id": "evt_3",
            "type": "setup_intent.setup_failed",
            "data": {
                "object": {
                    "id": "seti_2",
                    "customer": "cus_7",
                    "last_setup_error": {"code": "card_declined", "message": "Your card was declined."}
                }
            }
        }"#;
        let event: ProcessorEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.kind(), EventKind::SetupFailed);
        let err = event.data.object.last_setup_error.as_ref().unwrap();
        assert_eq!(err.message.as_deref(), Some("Your card was declined."));
    }
}
