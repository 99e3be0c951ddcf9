use super::assignment::{CleanerAssignment, PayMethod};
use super::booking::PrimaryRate;
use super::money::{Hours, Money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Hourly rate applied to the primary cleaner when a booking has no rate
/// configured. Pay display must always succeed, even for misconfigured
/// bookings, so the allocator defaults instead of failing.
pub const DEFAULT_HOURLY_RATE: Decimal = dec!(20);

/// The primary cleaner's share of a booking after secondary assignments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub primary_hours: Hours,
    pub primary_pay: Money,
    /// Secondary hourly assignments exceed the booking's total hours.
    /// The primary share is clamped to zero rather than going negative;
    /// callers should surface this condition.
    pub over_assigned: bool,
}

/// Computes the primary cleaner's hours and pay from the current secondary
/// assignment set.
///
/// Pure and deterministic: re-running with unchanged inputs yields the same
/// result bit-for-bit, which makes the post-mutation recompute idempotent.
/// Percentage-based secondaries are paid from cost share, so they contribute
/// nothing to the hours subtraction.
pub fn allocate(
    total_hours: Hours,
    total_cost: Money,
    primary_rate: &PrimaryRate,
    assignments: &[CleanerAssignment],
) -> Allocation {
    let secondary_hours = assignments
        .iter()
        .filter(|a| a.payment_method == PayMethod::Hourly)
        .fold(Hours::ZERO, |acc, a| acc + a.hours_assigned);

    let over_assigned = secondary_hours > total_hours;
    let primary_hours = total_hours.saturating_sub(secondary_hours);

    let primary_pay = match primary_rate {
        PrimaryRate::Hourly(rate) => primary_hours.at_rate(*rate),
        PrimaryRate::Percentage(pct) => {
            let hours_ratio = if total_hours.value() > Decimal::ZERO {
                primary_hours.value() / total_hours.value()
            } else {
                Decimal::ZERO
            };
            Money::new(total_cost.percent(*pct).value() * hours_ratio)
        }
        PrimaryRate::Unset => primary_hours.at_rate(DEFAULT_HOURLY_RATE),
    };

    Allocation {
        primary_hours,
        primary_pay,
        over_assigned,
    }
}
