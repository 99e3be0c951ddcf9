mod common;

use async_trait::async_trait;
use cleanbook::domain::booking::{Frequency, PrimaryRate};
use cleanbook::domain::money::Money;
use cleanbook::domain::ports::{BookingStore, SeriesStore};
use cleanbook::domain::recurrence::RecurringSeries;
use cleanbook::error::{BookingError, Result};
use cleanbook::application::intake::IntakeService;
use common::{booking_fixture, test_context};
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_recurring_booking_emits_linked_series() {
    let ctx = test_context();
    let mut booking = booking_fixture(dec!(5), dec!(150), PrimaryRate::Hourly(dec!(18)));
    booking.frequency = Frequency::Fortnightly;
    booking.first_visit_surcharge = Some(Money::new(dec!(30)));

    let booking = ctx.intake.create_booking(booking).await.unwrap();
    let group = booking.recurrence_group_id.expect("group id stamped");

    let series = ctx.series.get_by_group(group).await.unwrap().unwrap();
    assert_eq!(series.recurrence_group_id, group);
    assert_eq!(series.customer_id, booking.customer_id);
    assert_eq!(series.interval_days, 14);
    assert_eq!(series.weekday, "monday");
    assert_eq!(series.steady_state_cost, Money::new(dec!(120)));
    assert_eq!(series.start_date, booking.date);

    // The stored booking carries the same group id.
    let stored = ctx.bookings.get(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.recurrence_group_id, Some(group));
}

#[tokio::test]
async fn test_unrecognized_frequency_defaults_to_weekly_interval() {
    let ctx = test_context();
    let mut booking = booking_fixture(dec!(4), dec!(100), PrimaryRate::Unset);
    booking.frequency = Frequency::parse("every so often");

    let booking = ctx.intake.create_booking(booking).await.unwrap();
    let group = booking.recurrence_group_id.unwrap();
    let series = ctx.series.get_by_group(group).await.unwrap().unwrap();
    assert_eq!(series.interval_days, 7);
}

#[tokio::test]
async fn test_one_time_booking_has_no_series() {
    let ctx = test_context();
    let booking = booking_fixture(dec!(4), dec!(100), PrimaryRate::Unset);
    assert_eq!(booking.frequency, Frequency::OneTime);

    let booking = ctx.intake.create_booking(booking).await.unwrap();
    assert_eq!(booking.recurrence_group_id, None);
}

struct FailingSeriesStore;

#[async_trait]
impl SeriesStore for FailingSeriesStore {
    async fn store(&self, _series: RecurringSeries) -> Result<()> {
        Err(BookingError::Storage(Box::new(std::io::Error::other(
            "series table unavailable",
        ))))
    }

    async fn get_by_group(&self, _recurrence_group_id: Uuid) -> Result<Option<RecurringSeries>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_series_failure_does_not_block_booking() {
    let ctx = test_context();
    let intake = IntakeService::new(ctx.bookings.clone(), Arc::new(FailingSeriesStore));

    let mut booking = booking_fixture(dec!(5), dec!(150), PrimaryRate::Hourly(dec!(18)));
    booking.frequency = Frequency::Weekly;

    let booking = intake.create_booking(booking).await.unwrap();

    // The booking stands, group id and all, despite the failed series write.
    let stored = ctx.bookings.get(booking.id).await.unwrap().unwrap();
    assert!(stored.recurrence_group_id.is_some());
}
