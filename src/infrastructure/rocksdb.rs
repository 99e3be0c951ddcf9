use crate::domain::assignment::CleanerAssignment;
use crate::domain::booking::Booking;
use crate::domain::payment_method::{Customer, PaymentMethodRecord};
use crate::domain::ports::{
    AssignmentStore, BookingStore, CustomerStore, PaymentMethodStore, SeriesStore,
};
use crate::domain::recurrence::RecurringSeries;
use crate::error::{BookingError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for bookings (active and past).
pub const CF_BOOKINGS: &str = "bookings";
/// Column Family for secondary cleaner assignments.
pub const CF_ASSIGNMENTS: &str = "assignments";
/// Column Family for recurring series.
pub const CF_SERIES: &str = "series";
/// Column Family for payment-method records.
pub const CF_PAYMENT_METHODS: &str = "payment_methods";
/// Column Family for the customer table.
pub const CF_CUSTOMERS: &str = "customers";

const ALL_CFS: &[&str] = &[
    CF_BOOKINGS,
    CF_ASSIGNMENTS,
    CF_SERIES,
    CF_PAYMENT_METHODS,
    CF_CUSTOMERS,
];

/// A persistent store implementation using RocksDB.
///
/// Each entity lives in its own Column Family with JSON values. Secondary
/// lookups (invoice reference, booking ownership, idempotency key) scan the
/// relevant family; the datasets behind them are small per tenant.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// all required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs: Vec<ColumnFamilyDescriptor> = ALL_CFS
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            BookingError::Storage(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value).map_err(|e| BookingError::Storage(Box::new(e)))?;
        self.db.put_cf(&cf, key, bytes)?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(&cf, key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| BookingError::Storage(Box::new(e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_key, bytes) = item?;
            let value =
                serde_json::from_slice(&bytes).map_err(|e| BookingError::Storage(Box::new(e)))?;
            values.push(value);
        }
        Ok(values)
    }
}

#[async_trait]
impl BookingStore for RocksDbStore {
    async fn store(&self, booking: Booking) -> Result<()> {
        self.put(CF_BOOKINGS, booking.id.as_bytes(), &booking)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>> {
        self.read(CF_BOOKINGS, id.as_bytes())
    }

    async fn find_active_by_invoice(&self, invoice_id: &str) -> Result<Option<Booking>> {
        let bookings: Vec<Booking> = self.scan(CF_BOOKINGS)?;
        Ok(bookings
            .into_iter()
            .find(|b| !b.completed && b.invoice_id.as_deref() == Some(invoice_id)))
    }

    async fn find_past_by_invoice(&self, invoice_id: &str) -> Result<Option<Booking>> {
        let bookings: Vec<Booking> = self.scan(CF_BOOKINGS)?;
        Ok(bookings
            .into_iter()
            .find(|b| b.completed && b.invoice_id.as_deref() == Some(invoice_id)))
    }

    async fn find_first_by_note_fragment(&self, fragment: &str) -> Result<Option<Booking>> {
        let mut matches: Vec<Booking> = self
            .scan::<Booking>(CF_BOOKINGS)?
            .into_iter()
            .filter(|b| b.audit_notes.iter().any(|n| n.contains(fragment)))
            .collect();
        matches.sort_by_key(|b| (b.date, b.id));
        Ok(matches.into_iter().next())
    }
}

#[async_trait]
impl AssignmentStore for RocksDbStore {
    async fn store(&self, assignment: CleanerAssignment) -> Result<()> {
        self.put(CF_ASSIGNMENTS, assignment.id.as_bytes(), &assignment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CleanerAssignment>> {
        self.read(CF_ASSIGNMENTS, id.as_bytes())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let cf = self.cf(CF_ASSIGNMENTS)?;
        self.db.delete_cf(&cf, id.as_bytes())?;
        Ok(())
    }

    async fn list_for_booking(&self, booking_id: Uuid) -> Result<Vec<CleanerAssignment>> {
        let mut list: Vec<CleanerAssignment> = self
            .scan::<CleanerAssignment>(CF_ASSIGNMENTS)?
            .into_iter()
            .filter(|a| a.booking_id == booking_id)
            .collect();
        list.sort_by_key(|a| a.id);
        Ok(list)
    }

    async fn delete_for_booking(&self, booking_id: Uuid) -> Result<()> {
        let owned = self.list_for_booking(booking_id).await?;
        let cf = self.cf(CF_ASSIGNMENTS)?;
        for assignment in owned {
            self.db.delete_cf(&cf, assignment.id.as_bytes())?;
        }
        Ok(())
    }
}

#[async_trait]
impl SeriesStore for RocksDbStore {
    async fn store(&self, series: RecurringSeries) -> Result<()> {
        self.put(CF_SERIES, series.id.as_bytes(), &series)
    }

    async fn get_by_group(&self, recurrence_group_id: Uuid) -> Result<Option<RecurringSeries>> {
        let series: Vec<RecurringSeries> = self.scan(CF_SERIES)?;
        Ok(series
            .into_iter()
            .find(|s| s.recurrence_group_id == recurrence_group_id))
    }
}

#[async_trait]
impl PaymentMethodStore for RocksDbStore {
    async fn store(&self, record: PaymentMethodRecord) -> Result<()> {
        self.put(CF_PAYMENT_METHODS, record.id.as_bytes(), &record)
    }

    async fn find(
        &self,
        customer_id: Uuid,
        processor_payment_method_ref: &str,
    ) -> Result<Option<PaymentMethodRecord>> {
        let records: Vec<PaymentMethodRecord> = self.scan(CF_PAYMENT_METHODS)?;
        Ok(records.into_iter().find(|r| {
            r.customer_id == customer_id
                && r.processor_payment_method_ref == processor_payment_method_ref
        }))
    }

    async fn count_for_customer(&self, customer_id: Uuid) -> Result<usize> {
        let records: Vec<PaymentMethodRecord> = self.scan(CF_PAYMENT_METHODS)?;
        Ok(records
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .count())
    }
}

#[async_trait]
impl CustomerStore for RocksDbStore {
    async fn get(&self, id: Uuid) -> Result<Option<Customer>> {
        self.read(CF_CUSTOMERS, id.as_bytes())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let customers: Vec<Customer> = self.scan(CF_CUSTOMERS)?;
        Ok(customers
            .into_iter()
            .find(|c| c.email.eq_ignore_ascii_case(email)))
    }
}

impl RocksDbStore {
    /// Seeds a customer row. The customer table is otherwise maintained by
    /// the account system, which is outside this core.
    pub fn insert_customer(&self, customer: &Customer) -> Result<()> {
        self.put(CF_CUSTOMERS, customer.id.as_bytes(), customer)
    }
}
