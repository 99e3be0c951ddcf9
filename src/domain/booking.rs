use super::money::{Hours, Money};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Authorized,
    Paid,
}

/// Visit frequency as selected on the intake form.
///
/// Parsed leniently: the form has shipped several spellings of "one-time"
/// over the years, and unrecognized values must still produce a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    OneTime,
    Weekly,
    Fortnightly,
    Monthly,
    Other(String),
}

impl Frequency {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "onetime" | "one-time" | "one time" => Self::OneTime,
            "weekly" => Self::Weekly,
            "fortnightly" | "bi-weekly" | "biweekly" => Self::Fortnightly,
            "monthly" => Self::Monthly,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::OneTime)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::OneTime => "one-time",
            Self::Weekly => "weekly",
            Self::Fortnightly => "fortnightly",
            Self::Monthly => "monthly",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Frequency {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.as_str().to_string()
    }
}

/// How the primary cleaner's pay is derived from a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", tag = "kind", content = "rate")]
pub enum PrimaryRate {
    Hourly(Decimal),
    Percentage(Decimal),
    #[default]
    Unset,
}

/// A single cleaning visit, with its financial state.
///
/// `primary_hours` and `primary_cleaner_pay` are derived fields, recomputed
/// from the current secondary-assignment set after every assignment mutation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub address_ref: String,
    pub date: NaiveDate,
    pub frequency: Frequency,
    pub total_cost: Money,
    pub total_hours: Hours,
    pub payment_status: PaymentStatus,
    /// Opaque payment-processor reference for the charge, when one exists.
    pub invoice_id: Option<String>,
    pub primary_cleaner_id: Option<Uuid>,
    pub primary_rate: PrimaryRate,
    pub primary_hours: Hours,
    pub primary_cleaner_pay: Money,
    pub recurrence_group_id: Option<Uuid>,
    /// One-off first-visit surcharge included in `total_cost`, if any.
    pub first_visit_surcharge: Option<Money>,
    /// True once the visit has happened and the booking moved to the past table.
    pub completed: bool,
    /// Append-only free-text audit trail.
    pub audit_notes: Vec<String>,
}

impl Booking {
    /// The ongoing per-visit cost of the booking, excluding any one-off
    /// first-visit surcharge.
    pub fn steady_state_cost(&self) -> Money {
        match self.first_visit_surcharge {
            Some(extra) => self.total_cost - extra,
            None => self.total_cost,
        }
    }

    /// Appends a note unless an identical note is already present.
    /// Returns whether the note was added.
    pub fn append_note_once(&mut self, note: String) -> bool {
        if self.audit_notes.contains(&note) {
            return false;
        }
        self.audit_notes.push(note);
        true
    }

    /// Marks the booking paid and records the reconciled amount.
    ///
    /// Returns false without touching anything if the booking is already
    /// paid, so replayed processor events are true no-ops.
    pub fn mark_paid(&mut self, amount: Money, reference: &str) -> bool {
        if self.payment_status == PaymentStatus::Paid {
            return false;
        }
        self.payment_status = PaymentStatus::Paid;
        self.append_note_once(format!("payment of {amount} reconciled ({reference})"));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn booking() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            address_ref: "addr-1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            frequency: Frequency::Weekly,
            total_cost: Money::new(dec!(120)),
            total_hours: Hours::new(dec!(6)),
            payment_status: PaymentStatus::Unpaid,
            invoice_id: Some("pi_123".to_string()),
            primary_cleaner_id: None,
            primary_rate: PrimaryRate::Unset,
            primary_hours: Hours::ZERO,
            primary_cleaner_pay: Money::ZERO,
            recurrence_group_id: None,
            first_visit_surcharge: None,
            completed: false,
            audit_notes: Vec::new(),
        }
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!(Frequency::parse("one-time"), Frequency::OneTime);
        assert_eq!(Frequency::parse("OneTime"), Frequency::OneTime);
        assert_eq!(Frequency::parse("bi-weekly"), Frequency::Fortnightly);
        assert_eq!(Frequency::parse("Monthly"), Frequency::Monthly);
        assert_eq!(
            Frequency::parse("every other day"),
            Frequency::Other("every other day".to_string())
        );
        assert!(!Frequency::parse("onetime").is_recurring());
        assert!(Frequency::parse("every other day").is_recurring());
    }

    #[test]
    fn test_steady_state_cost() {
        let mut b = booking();
        assert_eq!(b.steady_state_cost(), Money::new(dec!(120)));
        b.first_visit_surcharge = Some(Money::new(dec!(40)));
        assert_eq!(b.steady_state_cost(), Money::new(dec!(80)));
    }

    #[test]
    fn test_mark_paid_is_idempotent() {
        let mut b = booking();
        assert!(b.mark_paid(Money::new(dec!(120)), "pi_123"));
        assert_eq!(b.payment_status, PaymentStatus::Paid);
        assert_eq!(b.audit_notes.len(), 1);

        // Replay of the same processor event.
        assert!(!b.mark_paid(Money::new(dec!(120)), "pi_123"));
        assert_eq!(b.audit_notes.len(), 1);
    }

    #[test]
    fn test_append_note_once() {
        let mut b = booking();
        assert!(b.append_note_once("weak match pi_9".to_string()));
        assert!(!b.append_note_once("weak match pi_9".to_string()));
        assert_eq!(b.audit_notes.len(), 1);
    }
}
