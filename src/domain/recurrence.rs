use super::allocation::DEFAULT_HOURLY_RATE;
use super::booking::{Booking, Frequency, PrimaryRate};
use super::money::Money;
use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A template record driving repeated future bookings derived from one
/// originating booking. Created once at booking-creation time and never
/// touched by the pay allocator: it reflects the ongoing cost, not the
/// allocation of a specific visit.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct RecurringSeries {
    pub id: Uuid,
    /// Shared with the originating booking, linking them permanently.
    pub recurrence_group_id: Uuid,
    pub customer_id: Uuid,
    pub address_ref: String,
    pub cleaner_id: Option<Uuid>,
    pub frequency: Frequency,
    pub interval_days: u32,
    /// Lowercase English day-of-week name of the first occurrence.
    pub weekday: String,
    pub hourly_rate: Decimal,
    /// Per-visit cost excluding any one-off first-visit surcharge.
    pub steady_state_cost: Money,
    pub start_date: NaiveDate,
}

/// Days between visits for a given frequency. Unrecognized values fall back
/// to weekly rather than failing booking creation.
pub fn interval_days(frequency: &Frequency) -> u32 {
    match frequency {
        Frequency::Fortnightly => 14,
        Frequency::Monthly => 30,
        _ => 7,
    }
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Derives the recurring series for a freshly created booking, or `None`
/// for one-time bookings. The returned `recurrence_group_id` is fresh;
/// the caller stamps it onto the originating booking before persisting
/// either record.
pub fn derive_series(booking: &Booking) -> Option<RecurringSeries> {
    if !booking.frequency.is_recurring() {
        return None;
    }

    let hourly_rate = match booking.primary_rate {
        PrimaryRate::Hourly(rate) => rate,
        _ => DEFAULT_HOURLY_RATE,
    };

    Some(RecurringSeries {
        id: Uuid::new_v4(),
        recurrence_group_id: Uuid::new_v4(),
        customer_id: booking.customer_id,
        address_ref: booking.address_ref.clone(),
        cleaner_id: booking.primary_cleaner_id,
        frequency: booking.frequency.clone(),
        interval_days: interval_days(&booking.frequency),
        weekday: weekday_name(booking.date).to_string(),
        hourly_rate,
        steady_state_cost: booking.steady_state_cost(),
        start_date: booking.date,
    })
}
