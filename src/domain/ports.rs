use super::assignment::CleanerAssignment;
use super::booking::Booking;
use super::payment_method::{Customer, PaymentMethodRecord, ProcessorCustomer};
use super::recurrence::RecurringSeries;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub type BookingStoreRef = Arc<dyn BookingStore>;
pub type AssignmentStoreRef = Arc<dyn AssignmentStore>;
pub type SeriesStoreRef = Arc<dyn SeriesStore>;
pub type PaymentMethodStoreRef = Arc<dyn PaymentMethodStore>;
pub type CustomerStoreRef = Arc<dyn CustomerStore>;
pub type ProcessorDirectoryRef = Arc<dyn ProcessorDirectory>;
pub type NotifierRef = Arc<dyn Notifier>;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn store(&self, booking: Booking) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Booking>>;
    /// Upcoming booking whose charge reference matches, if any.
    async fn find_active_by_invoice(&self, invoice_id: &str) -> Result<Option<Booking>>;
    /// Completed/past booking whose charge reference matches, if any.
    async fn find_past_by_invoice(&self, invoice_id: &str) -> Result<Option<Booking>>;
    /// Weak-match fallback: first booking whose audit notes contain the
    /// fragment, in (date, id) order. Never authoritative.
    async fn find_first_by_note_fragment(&self, fragment: &str) -> Result<Option<Booking>>;
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn store(&self, assignment: CleanerAssignment) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<CleanerAssignment>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn list_for_booking(&self, booking_id: Uuid) -> Result<Vec<CleanerAssignment>>;
    /// Cascade used when the owning booking is deleted.
    async fn delete_for_booking(&self, booking_id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait SeriesStore: Send + Sync {
    async fn store(&self, series: RecurringSeries) -> Result<()>;
    async fn get_by_group(&self, recurrence_group_id: Uuid) -> Result<Option<RecurringSeries>>;
}

#[async_trait]
pub trait PaymentMethodStore: Send + Sync {
    async fn store(&self, record: PaymentMethodRecord) -> Result<()>;
    async fn find(
        &self,
        customer_id: Uuid,
        processor_payment_method_ref: &str,
    ) -> Result<Option<PaymentMethodRecord>>;
    async fn count_for_customer(&self, customer_id: Uuid) -> Result<usize>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Customer>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>>;
}

/// Read/annotate access to the payment processor's customer records.
#[async_trait]
pub trait ProcessorDirectory: Send + Sync {
    async fn fetch_customer(&self, processor_ref: &str) -> Result<Option<ProcessorCustomer>>;
    async fn set_customer_metadata(
        &self,
        processor_ref: &str,
        key: &str,
        value: &str,
    ) -> Result<()>;
}

/// Outbound notification delivery (email/SMS). Fire-and-forget: delivery
/// failure never rolls back the reconciliation that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn setup_confirmed(&self, processor_customer_ref: &str) -> Result<()>;
    async fn setup_failed(&self, processor_customer_ref: &str, reason: &str) -> Result<()>;
}
