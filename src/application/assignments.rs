use crate::domain::allocation::allocate;
use crate::domain::assignment::{AssignmentTerms, CleanerAssignment};
use crate::domain::booking::Booking;
use crate::domain::ports::{AssignmentStoreRef, BookingStoreRef};
use crate::error::{BookingError, Result};
use tracing::{error, warn};
use uuid::Uuid;

/// Manages secondary cleaner assignments for a booking.
///
/// Every mutation re-derives the owning booking's primary hours/pay from
/// the post-mutation assignment set, read fresh from the store. The
/// recompute is pure given that list, so a failed recompute leaves the
/// booking with stale pay that any later recompute repairs.
pub struct AssignmentService {
    bookings: BookingStoreRef,
    assignments: AssignmentStoreRef,
}

impl AssignmentService {
    pub fn new(bookings: BookingStoreRef, assignments: AssignmentStoreRef) -> Self {
        Self {
            bookings,
            assignments,
        }
    }

    pub async fn add_assignment(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        terms: AssignmentTerms,
    ) -> Result<CleanerAssignment> {
        terms.validate()?;
        let booking = self.require_booking(booking_id).await?;
        let assignment =
            CleanerAssignment::new(booking_id, cleaner_id, &terms, booking.total_cost)?;
        self.assignments.store(assignment.clone()).await?;
        self.recompute_after_mutation(booking).await;
        Ok(assignment)
    }

    pub async fn update_assignment(
        &self,
        id: Uuid,
        terms: AssignmentTerms,
    ) -> Result<CleanerAssignment> {
        terms.validate()?;
        let mut assignment = self
            .assignments
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("assignment {id}")))?;
        let booking = self.require_booking(assignment.booking_id).await?;
        assignment.apply(&terms, booking.total_cost);
        self.assignments.store(assignment.clone()).await?;
        self.recompute_after_mutation(booking).await;
        Ok(assignment)
    }

    pub async fn remove_assignment(&self, id: Uuid) -> Result<()> {
        let assignment = self
            .assignments
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("assignment {id}")))?;
        let booking = self.require_booking(assignment.booking_id).await?;
        self.assignments.delete(id).await?;
        self.recompute_after_mutation(booking).await;
        Ok(())
    }

    pub async fn list_assignments(&self, booking_id: Uuid) -> Result<Vec<CleanerAssignment>> {
        self.assignments.list_for_booking(booking_id).await
    }

    /// Re-derives and persists the booking's primary hours/pay from the
    /// current assignment set. Safe to call any number of times; exposed
    /// so a partial failure can be retried.
    pub async fn recompute_primary_pay(&self, booking_id: Uuid) -> Result<()> {
        let booking = self.require_booking(booking_id).await?;
        self.recompute(booking).await
    }

    async fn require_booking(&self, booking_id: Uuid) -> Result<Booking> {
        self.bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("booking {booking_id}")))
    }

    async fn recompute(&self, mut booking: Booking) -> Result<()> {
        // Always read the assignment list fresh; a concurrent editor may
        // have changed it since this mutation started.
        let assignments = self.assignments.list_for_booking(booking.id).await?;
        let alloc = allocate(
            booking.total_hours,
            booking.total_cost,
            &booking.primary_rate,
            &assignments,
        );
        if alloc.over_assigned {
            warn!(
                booking_id = %booking.id,
                total_hours = %booking.total_hours,
                "secondary hours exceed booking total; primary share clamped to zero"
            );
        }
        booking.primary_hours = alloc.primary_hours;
        booking.primary_cleaner_pay = alloc.primary_pay;
        self.bookings.store(booking).await
    }

    /// The assignment write already succeeded; a failed recompute leaves a
    /// recoverable stale-pay state rather than failing the mutation.
    async fn recompute_after_mutation(&self, booking: Booking) {
        let booking_id = booking.id;
        if let Err(e) = self.recompute(booking).await {
            error!(
                booking_id = %booking_id,
                error = %e,
                "primary pay recompute failed after assignment write; stale until retried"
            );
        }
    }
}
