use crate::domain::allocation::allocate;
use crate::domain::booking::Booking;
use crate::domain::ports::{BookingStoreRef, SeriesStoreRef};
use crate::domain::recurrence::derive_series;
use crate::error::Result;
use tracing::{error, info};

/// Orchestrates the financial side of booking creation: the initial
/// primary-pay allocation, and for recurring frequencies the linked
/// series record.
pub struct IntakeService {
    bookings: BookingStoreRef,
    series: SeriesStoreRef,
}

impl IntakeService {
    pub fn new(bookings: BookingStoreRef, series: SeriesStoreRef) -> Self {
        Self { bookings, series }
    }

    /// Persists a new booking with its primary pay allocated, emitting a
    /// recurring series when the frequency calls for one.
    ///
    /// Series creation is best-effort: the booking stands even when the
    /// series write fails, which is reported and left for manual repair.
    pub async fn create_booking(&self, mut booking: Booking) -> Result<Booking> {
        // No secondary assignments can exist yet.
        let alloc = allocate(
            booking.total_hours,
            booking.total_cost,
            &booking.primary_rate,
            &[],
        );
        booking.primary_hours = alloc.primary_hours;
        booking.primary_cleaner_pay = alloc.primary_pay;

        let series = derive_series(&booking);
        if let Some(series) = &series {
            booking.recurrence_group_id = Some(series.recurrence_group_id);
        }

        self.bookings.store(booking.clone()).await?;

        if let Some(series) = series {
            let group = series.recurrence_group_id;
            match self.series.store(series).await {
                Ok(()) => info!(
                    booking_id = %booking.id,
                    recurrence_group_id = %group,
                    "recurring series created"
                ),
                Err(e) => error!(
                    booking_id = %booking.id,
                    recurrence_group_id = %group,
                    error = %e,
                    "recurring series creation failed; booking stands"
                ),
            }
        }

        Ok(booking)
    }
}
