use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Processor-side metadata key carrying our internal customer id. Written
/// back by the resolver when a customer is matched by email, so future
/// events resolve without the fallback.
pub const CUSTOMER_ID_METADATA_KEY: &str = "customer_id";

/// Local customer row, as far as this core needs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    pub processor_customer_ref: Option<String>,
}

/// The payment processor's view of a customer, fetched via its API.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessorCustomer {
    pub processor_ref: String,
    pub email: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// A stored card belonging to a customer.
///
/// Never duplicated for the same (customer_id, processor_payment_method_ref)
/// pair; that pair is the reconciler's idempotency key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethodRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub processor_customer_ref: String,
    pub processor_payment_method_ref: String,
    pub card_brand: Option<String>,
    pub last4: Option<String>,
    pub exp_month: Option<u8>,
    pub exp_year: Option<u16>,
    /// True iff this was the first record created for the customer.
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
