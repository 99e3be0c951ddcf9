use crate::domain::assignment::CleanerAssignment;
use crate::domain::booking::Booking;
use crate::domain::payment_method::{Customer, PaymentMethodRecord, ProcessorCustomer};
use crate::domain::ports::{
    AssignmentStore, BookingStore, CustomerStore, Notifier, PaymentMethodStore,
    ProcessorDirectory, SeriesStore,
};
use crate::domain::recurrence::RecurringSeries;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// A thread-safe in-memory store for bookings.
///
/// Uses `Arc<RwLock<HashMap>>` to allow shared concurrent access.
/// Ideal for testing or small datasets where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryBookingStore {
    bookings: Arc<RwLock<HashMap<Uuid, Booking>>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn store(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(&id).cloned())
    }

    async fn find_active_by_invoice(&self, invoice_id: &str) -> Result<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .find(|b| !b.completed && b.invoice_id.as_deref() == Some(invoice_id))
            .cloned())
    }

    async fn find_past_by_invoice(&self, invoice_id: &str) -> Result<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .find(|b| b.completed && b.invoice_id.as_deref() == Some(invoice_id))
            .cloned())
    }

    async fn find_first_by_note_fragment(&self, fragment: &str) -> Result<Option<Booking>> {
        let bookings = self.bookings.read().await;
        // "First" is made deterministic by (date, id) ordering.
        let mut matches: Vec<&Booking> = bookings
            .values()
            .filter(|b| b.audit_notes.iter().any(|n| n.contains(fragment)))
            .collect();
        matches.sort_by_key(|b| (b.date, b.id));
        Ok(matches.first().map(|b| (*b).clone()))
    }
}

/// A thread-safe in-memory store for cleaner assignments.
#[derive(Default, Clone)]
pub struct InMemoryAssignmentStore {
    assignments: Arc<RwLock<HashMap<Uuid, CleanerAssignment>>>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn store(&self, assignment: CleanerAssignment) -> Result<()> {
        let mut assignments = self.assignments.write().await;
        assignments.insert(assignment.id, assignment);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<CleanerAssignment>> {
        let assignments = self.assignments.read().await;
        Ok(assignments.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut assignments = self.assignments.write().await;
        assignments.remove(&id);
        Ok(())
    }

    async fn list_for_booking(&self, booking_id: Uuid) -> Result<Vec<CleanerAssignment>> {
        let assignments = self.assignments.read().await;
        let mut list: Vec<CleanerAssignment> = assignments
            .values()
            .filter(|a| a.booking_id == booking_id)
            .cloned()
            .collect();
        list.sort_by_key(|a| a.id);
        Ok(list)
    }

    async fn delete_for_booking(&self, booking_id: Uuid) -> Result<()> {
        let mut assignments = self.assignments.write().await;
        assignments.retain(|_, a| a.booking_id != booking_id);
        Ok(())
    }
}

/// A thread-safe in-memory store for recurring series.
#[derive(Default, Clone)]
pub struct InMemorySeriesStore {
    series: Arc<RwLock<HashMap<Uuid, RecurringSeries>>>,
}

impl InMemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeriesStore for InMemorySeriesStore {
    async fn store(&self, series: RecurringSeries) -> Result<()> {
        let mut all = self.series.write().await;
        all.insert(series.id, series);
        Ok(())
    }

    async fn get_by_group(&self, recurrence_group_id: Uuid) -> Result<Option<RecurringSeries>> {
        let all = self.series.read().await;
        Ok(all
            .values()
            .find(|s| s.recurrence_group_id == recurrence_group_id)
            .cloned())
    }
}

/// A thread-safe in-memory store for payment-method records.
#[derive(Default, Clone)]
pub struct InMemoryPaymentMethodStore {
    records: Arc<RwLock<HashMap<Uuid, PaymentMethodRecord>>>,
}

impl InMemoryPaymentMethodStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentMethodStore for InMemoryPaymentMethodStore {
    async fn store(&self, record: PaymentMethodRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.id, record);
        Ok(())
    }

    async fn find(
        &self,
        customer_id: Uuid,
        processor_payment_method_ref: &str,
    ) -> Result<Option<PaymentMethodRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| {
                r.customer_id == customer_id
                    && r.processor_payment_method_ref == processor_payment_method_ref
            })
            .cloned())
    }

    async fn count_for_customer(&self, customer_id: Uuid) -> Result<usize> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.customer_id == customer_id)
            .count())
    }
}

/// A thread-safe in-memory customer table.
#[derive(Default, Clone)]
pub struct InMemoryCustomerStore {
    customers: Arc<RwLock<HashMap<Uuid, Customer>>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, customer: Customer) {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id, customer);
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn get(&self, id: Uuid) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers
            .values()
            .find(|c| c.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

/// An in-memory stand-in for the processor's customer directory, keyed by
/// processor customer reference. Metadata writes land here so backfill
/// behavior is observable in tests.
#[derive(Default, Clone)]
pub struct InMemoryProcessorDirectory {
    customers: Arc<RwLock<HashMap<String, ProcessorCustomer>>>,
}

impl InMemoryProcessorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, customer: ProcessorCustomer) {
        let mut customers = self.customers.write().await;
        customers.insert(customer.processor_ref.clone(), customer);
    }

    pub async fn metadata_of(&self, processor_ref: &str) -> Option<HashMap<String, String>> {
        let customers = self.customers.read().await;
        customers.get(processor_ref).map(|c| c.metadata.clone())
    }
}

#[async_trait]
impl ProcessorDirectory for InMemoryProcessorDirectory {
    async fn fetch_customer(&self, processor_ref: &str) -> Result<Option<ProcessorCustomer>> {
        let customers = self.customers.read().await;
        Ok(customers.get(processor_ref).cloned())
    }

    async fn set_customer_metadata(
        &self,
        processor_ref: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let mut customers = self.customers.write().await;
        if let Some(customer) = customers.get_mut(processor_ref) {
            customer
                .metadata
                .insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// Notifier that only logs; the delivery collaborator is out of scope.
#[derive(Default, Clone)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn setup_confirmed(&self, processor_customer_ref: &str) -> Result<()> {
        info!(processor_customer_ref, "payment method setup confirmed");
        Ok(())
    }

    async fn setup_failed(&self, processor_customer_ref: &str, reason: &str) -> Result<()> {
        info!(processor_customer_ref, reason, "payment method setup failed");
        Ok(())
    }
}

/// Notifier that records every request, for asserting on notification
/// behavior in tests.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub sent: Arc<RwLock<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<String> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn setup_confirmed(&self, processor_customer_ref: &str) -> Result<()> {
        let mut sent = self.sent.write().await;
        sent.push(format!("confirmed:{processor_customer_ref}"));
        Ok(())
    }

    async fn setup_failed(&self, processor_customer_ref: &str, reason: &str) -> Result<()> {
        let mut sent = self.sent.write().await;
        sent.push(format!("failed:{processor_customer_ref}:{reason}"));
        Ok(())
    }
}
