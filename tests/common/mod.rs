#![allow(dead_code)]

use chrono::NaiveDate;
use cleanbook::application::assignments::AssignmentService;
use cleanbook::application::intake::IntakeService;
use cleanbook::application::reconciler::PaymentReconciler;
use cleanbook::domain::booking::{Booking, Frequency, PaymentStatus, PrimaryRate};
use cleanbook::domain::money::{Hours, Money};
use cleanbook::domain::payment_method::{Customer, ProcessorCustomer};
use cleanbook::infrastructure::in_memory::{
    InMemoryAssignmentStore, InMemoryBookingStore, InMemoryCustomerStore,
    InMemoryPaymentMethodStore, InMemoryProcessorDirectory, InMemorySeriesStore,
    RecordingNotifier,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Everything a test needs: shared in-memory stores plus the services
/// wired on top of them.
pub struct TestContext {
    pub bookings: Arc<InMemoryBookingStore>,
    pub assignments: Arc<InMemoryAssignmentStore>,
    pub series: Arc<InMemorySeriesStore>,
    pub payment_methods: Arc<InMemoryPaymentMethodStore>,
    pub customers: Arc<InMemoryCustomerStore>,
    pub directory: Arc<InMemoryProcessorDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub assignment_service: AssignmentService,
    pub intake: IntakeService,
    pub reconciler: PaymentReconciler,
}

pub fn test_context() -> TestContext {
    let bookings = Arc::new(InMemoryBookingStore::new());
    let assignments = Arc::new(InMemoryAssignmentStore::new());
    let series = Arc::new(InMemorySeriesStore::new());
    let payment_methods = Arc::new(InMemoryPaymentMethodStore::new());
    let customers = Arc::new(InMemoryCustomerStore::new());
    let directory = Arc::new(InMemoryProcessorDirectory::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let assignment_service = AssignmentService::new(bookings.clone(), assignments.clone());
    let intake = IntakeService::new(bookings.clone(), series.clone());
    let reconciler = PaymentReconciler::new(
        bookings.clone(),
        payment_methods.clone(),
        customers.clone(),
        directory.clone(),
        notifier.clone(),
    );

    TestContext {
        bookings,
        assignments,
        series,
        payment_methods,
        customers,
        directory,
        notifier,
        assignment_service,
        intake,
        reconciler,
    }
}

pub fn booking_fixture(total_hours: Decimal, total_cost: Decimal, rate: PrimaryRate) -> Booking {
    Booking {
        id: Uuid::new_v4(),
        customer_id: Uuid::new_v4(),
        address_ref: "12 Mop Lane".to_string(),
        // A Monday.
        date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        frequency: Frequency::OneTime,
        total_cost: Money::new(total_cost),
        total_hours: Hours::new(total_hours),
        payment_status: PaymentStatus::Unpaid,
        invoice_id: None,
        primary_cleaner_id: Some(Uuid::new_v4()),
        primary_rate: rate,
        primary_hours: Hours::ZERO,
        primary_cleaner_pay: Money::ZERO,
        recurrence_group_id: None,
        first_visit_surcharge: None,
        completed: false,
        audit_notes: Vec::new(),
    }
}

pub async fn seed_customer(ctx: &TestContext, email: &str, processor_ref: &str) -> Customer {
    let customer = Customer {
        id: Uuid::new_v4(),
        email: email.to_string(),
        processor_customer_ref: Some(processor_ref.to_string()),
    };
    ctx.customers.insert(customer.clone()).await;
    customer
}

pub async fn seed_processor_customer(
    ctx: &TestContext,
    processor_ref: &str,
    email: Option<&str>,
    metadata: HashMap<String, String>,
) {
    ctx.directory
        .insert(ProcessorCustomer {
            processor_ref: processor_ref.to_string(),
            email: email.map(str::to_string),
            metadata,
        })
        .await;
}
