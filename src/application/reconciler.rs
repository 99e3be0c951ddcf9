use crate::domain::event::{CardPayload, EventKind, ProcessorEvent};
use crate::domain::money::Money;
use crate::domain::payment_method::{
    CUSTOMER_ID_METADATA_KEY, Customer, PaymentMethodRecord,
};
use crate::domain::ports::{
    BookingStoreRef, CustomerStoreRef, NotifierRef, PaymentMethodStoreRef, ProcessorDirectoryRef,
};
use crate::error::Result;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Consumes payment-processor webhook events.
///
/// The processor delivers at-least-once and out of order, so every mutation
/// here is idempotent by construction: payment methods are keyed on
/// (customer_id, processor_payment_method_ref), and paid-marking is a no-op
/// once a booking is paid.
pub struct PaymentReconciler {
    bookings: BookingStoreRef,
    payment_methods: PaymentMethodStoreRef,
    customers: CustomerStoreRef,
    directory: ProcessorDirectoryRef,
    notifier: NotifierRef,
}

impl PaymentReconciler {
    pub fn new(
        bookings: BookingStoreRef,
        payment_methods: PaymentMethodStoreRef,
        customers: CustomerStoreRef,
        directory: ProcessorDirectoryRef,
        notifier: NotifierRef,
    ) -> Self {
        Self {
            bookings,
            payment_methods,
            customers,
            directory,
            notifier,
        }
    }

    pub async fn handle_event(&self, event: &ProcessorEvent) -> Result<()> {
        let object = &event.data.object;
        match event.kind() {
            EventKind::SetupSucceeded => {
                let Some(customer_ref) = object.customer.as_deref() else {
                    debug!(event_id = %event.id, "setup succeeded without customer; ignoring");
                    return Ok(());
                };
                if let Some(method) = &object.payment_method {
                    self.sync_payment_method(customer_ref, method.id(), method.card())
                        .await?;
                }
                self.notify_setup_confirmed(customer_ref).await;
            }
            EventKind::SetupFailed => {
                let reason = object
                    .last_setup_error
                    .as_ref()
                    .and_then(|e| e.message.clone())
                    .unwrap_or_else(|| "payment method setup failed".to_string());
                let customer_ref = object.customer.as_deref().unwrap_or_default();
                if let Err(e) = self.notifier.setup_failed(customer_ref, &reason).await {
                    warn!(event_id = %event.id, error = %e, "setup failure notification not delivered");
                }
            }
            EventKind::PaymentMethodAttached => {
                // The event object is the payment method itself.
                let (Some(method_ref), Some(customer_ref)) =
                    (object.id.as_deref(), object.customer.as_deref())
                else {
                    debug!(event_id = %event.id, "attached method missing id or customer; ignoring");
                    return Ok(());
                };
                self.sync_payment_method(customer_ref, method_ref, object.card.as_ref())
                    .await?;
            }
            EventKind::CheckoutCompleted => {
                if let (Some(customer_ref), Some(method)) =
                    (object.customer.as_deref(), &object.payment_method)
                {
                    self.sync_payment_method(customer_ref, method.id(), method.card())
                        .await?;
                }
            }
            EventKind::PaymentSucceeded => {
                if let (Some(customer_ref), Some(method)) =
                    (object.customer.as_deref(), &object.payment_method)
                {
                    self.sync_payment_method(customer_ref, method.id(), method.card())
                        .await?;
                }
                if let Some(payment_ref) = object.id.as_deref() {
                    let amount = Money::from_minor_units(object.amount_received.unwrap_or(0));
                    self.mark_booking_paid(payment_ref, amount).await?;
                }
            }
            EventKind::Other(kind) => {
                debug!(event_id = %event.id, event_type = %kind, "unhandled event type; acknowledged");
            }
        }
        Ok(())
    }

    /// Idempotent upsert of a payment-method record.
    ///
    /// Returns the stored record, or `None` when no local customer resolves,
    /// in which case the event is dropped: without a customer row there is
    /// nothing to retry against.
    pub async fn sync_payment_method(
        &self,
        processor_customer_ref: &str,
        processor_payment_method_ref: &str,
        card: Option<&CardPayload>,
    ) -> Result<Option<PaymentMethodRecord>> {
        let Some(customer) = self.resolve_customer(processor_customer_ref).await? else {
            info!(
                processor_customer_ref,
                processor_payment_method_ref,
                "no local customer for processor event; dropping"
            );
            return Ok(None);
        };

        if let Some(existing) = self
            .payment_methods
            .find(customer.id, processor_payment_method_ref)
            .await?
        {
            debug!(
                customer_id = %customer.id,
                processor_payment_method_ref,
                "payment method already synced"
            );
            return Ok(Some(existing));
        }

        let is_default = self.payment_methods.count_for_customer(customer.id).await? == 0;
        let record = PaymentMethodRecord {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            processor_customer_ref: processor_customer_ref.to_string(),
            processor_payment_method_ref: processor_payment_method_ref.to_string(),
            card_brand: card.and_then(|c| c.brand.clone()),
            last4: card.and_then(|c| c.last4.clone()),
            exp_month: card.and_then(|c| c.exp_month),
            exp_year: card.and_then(|c| c.exp_year),
            is_default,
            created_at: Utc::now(),
        };
        self.payment_methods.store(record.clone()).await?;
        info!(
            customer_id = %customer.id,
            processor_payment_method_ref,
            is_default,
            "payment method stored"
        );
        Ok(Some(record))
    }

    /// Two-step customer resolution: processor metadata first, then email
    /// fallback with a metadata backfill so the next event takes the fast
    /// path.
    async fn resolve_customer(&self, processor_ref: &str) -> Result<Option<Customer>> {
        let Some(processor_customer) = self.directory.fetch_customer(processor_ref).await? else {
            return Ok(None);
        };

        if let Some(raw_id) = processor_customer.metadata.get(CUSTOMER_ID_METADATA_KEY)
            && let Ok(id) = raw_id.parse::<Uuid>()
            && let Some(customer) = self.customers.get(id).await?
        {
            return Ok(Some(customer));
        }

        // Metadata absent or stale: match by email and backfill.
        let Some(email) = processor_customer.email.as_deref() else {
            return Ok(None);
        };
        let Some(customer) = self.customers.find_by_email(email).await? else {
            return Ok(None);
        };

        if let Err(e) = self
            .directory
            .set_customer_metadata(
                processor_ref,
                CUSTOMER_ID_METADATA_KEY,
                &customer.id.to_string(),
            )
            .await
        {
            warn!(
                processor_ref,
                customer_id = %customer.id,
                error = %e,
                "customer id backfill failed; next event will fall back to email again"
            );
        }
        Ok(Some(customer))
    }

    /// Marks the booking carrying this payment reference as paid.
    ///
    /// Active bookings are checked before past ones. When neither matches,
    /// a free-text search over audit notes annotates the first match as a
    /// weak, non-authoritative hit; otherwise the payment is recorded as
    /// unreconciled. The payment is already captured processor-side, so
    /// nothing here fails loudly.
    pub async fn mark_booking_paid(&self, payment_ref: &str, amount: Money) -> Result<()> {
        if let Some(mut booking) = self.bookings.find_active_by_invoice(payment_ref).await? {
            let updated = booking.mark_paid(amount, payment_ref);
            self.bookings.store(booking).await?;
            info!(payment_ref, %amount, updated, "active booking reconciled");
            return Ok(());
        }

        if let Some(mut booking) = self.bookings.find_past_by_invoice(payment_ref).await? {
            let updated = booking.mark_paid(amount, payment_ref);
            self.bookings.store(booking).await?;
            info!(payment_ref, %amount, updated, "past booking reconciled");
            return Ok(());
        }

        if let Some(mut booking) = self
            .bookings
            .find_first_by_note_fragment(payment_ref)
            .await?
        {
            // Legacy/unlinked data: annotate, never change payment status.
            booking.append_note_once(format!("payment of {amount} referenced {payment_ref}"));
            let booking_id = booking.id;
            self.bookings.store(booking).await?;
            warn!(
                payment_ref,
                %amount,
                booking_id = %booking_id,
                weak_match = true,
                "payment matched by free-text note only"
            );
            return Ok(());
        }

        warn!(payment_ref, %amount, "payment unreconciled; no booking matched");
        Ok(())
    }

    async fn notify_setup_confirmed(&self, processor_customer_ref: &str) {
        if let Err(e) = self.notifier.setup_confirmed(processor_customer_ref).await {
            warn!(
                processor_customer_ref,
                error = %e,
                "setup confirmation notification not delivered"
            );
        }
    }
}
