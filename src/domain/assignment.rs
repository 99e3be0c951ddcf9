use super::money::{Hours, Money};
use crate::error::{BookingError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PayMethod {
    Hourly,
    Percentage,
}

/// The caller-supplied terms of a secondary assignment, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentTerms {
    pub payment_method: PayMethod,
    pub hourly_rate: Option<Decimal>,
    pub percentage_rate: Option<Decimal>,
    pub hours_assigned: Option<Decimal>,
}

impl AssignmentTerms {
    pub fn hourly(rate: Decimal, hours: Decimal) -> Self {
        Self {
            payment_method: PayMethod::Hourly,
            hourly_rate: Some(rate),
            percentage_rate: None,
            hours_assigned: Some(hours),
        }
    }

    pub fn percentage(rate: Decimal) -> Self {
        Self {
            payment_method: PayMethod::Percentage,
            hourly_rate: None,
            percentage_rate: Some(rate),
            hours_assigned: None,
        }
    }

    /// Rejects terms missing their method-required fields.
    pub fn validate(&self) -> Result<()> {
        match self.payment_method {
            PayMethod::Hourly => {
                let rate = self.hourly_rate.ok_or_else(|| {
                    BookingError::Validation("hourly assignment requires hourly_rate".to_string())
                })?;
                if rate < Decimal::ZERO {
                    return Err(BookingError::Validation(
                        "hourly_rate must not be negative".to_string(),
                    ));
                }
                let hours = self.hours_assigned.ok_or_else(|| {
                    BookingError::Validation("hourly assignment requires hours_assigned".to_string())
                })?;
                if hours <= Decimal::ZERO {
                    return Err(BookingError::Validation(
                        "hours_assigned must be positive".to_string(),
                    ));
                }
            }
            PayMethod::Percentage => {
                let pct = self.percentage_rate.ok_or_else(|| {
                    BookingError::Validation(
                        "percentage assignment requires percentage_rate".to_string(),
                    )
                })?;
                if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                    return Err(BookingError::Validation(
                        "percentage_rate must be between 0 and 100".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A secondary cleaner attached to a booking, sharing its hours/cost.
///
/// `computed_pay` is derived from the terms and the booking's total cost at
/// creation/edit time, and stored for display and audit.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CleanerAssignment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub cleaner_id: Uuid,
    pub payment_method: PayMethod,
    pub hourly_rate: Option<Decimal>,
    pub percentage_rate: Option<Decimal>,
    pub hours_assigned: Hours,
    pub computed_pay: Money,
}

impl CleanerAssignment {
    pub fn new(
        booking_id: Uuid,
        cleaner_id: Uuid,
        terms: &AssignmentTerms,
        booking_total_cost: Money,
    ) -> Result<Self> {
        terms.validate()?;
        let mut assignment = Self {
            id: Uuid::new_v4(),
            booking_id,
            cleaner_id,
            payment_method: terms.payment_method,
            hourly_rate: None,
            percentage_rate: None,
            hours_assigned: Hours::ZERO,
            computed_pay: Money::ZERO,
        };
        assignment.apply(terms, booking_total_cost);
        Ok(assignment)
    }

    /// Applies already-validated terms and recomputes `computed_pay`.
    ///
    /// Percentage assignments are paid from cost share, not time share, so
    /// their `hours_assigned` is forced to zero.
    pub fn apply(&mut self, terms: &AssignmentTerms, booking_total_cost: Money) {
        self.payment_method = terms.payment_method;
        match terms.payment_method {
            PayMethod::Hourly => {
                let rate = terms.hourly_rate.unwrap_or(Decimal::ZERO);
                let hours = Hours::new(terms.hours_assigned.unwrap_or(Decimal::ZERO));
                self.hourly_rate = Some(rate);
                self.percentage_rate = None;
                self.hours_assigned = hours;
                self.computed_pay = hours.at_rate(rate);
            }
            PayMethod::Percentage => {
                let pct = terms.percentage_rate.unwrap_or(Decimal::ZERO);
                self.hourly_rate = None;
                self.percentage_rate = Some(pct);
                self.hours_assigned = Hours::ZERO;
                self.computed_pay = booking_total_cost.percent(pct);
            }
        }
    }
}
