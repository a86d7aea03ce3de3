//! Staff assignment payment rules.
//!
//! The amount owed comes from the rate and the length of the work block, the
//! due date from the payment terms, and the status from the due date unless the
//! assignment has been paid or cancelled.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{PaymentStatus, RateType, StaffAssignment};
use crate::types::{DatabaseError, DatabaseResult};

/// Whole minutes between start and end, zero for unparseable rows.
pub fn worked_minutes(assignment: &StaffAssignment) -> i64 {
    assignment
        .window()
        .map(|(starts, ends)| (ends - starts).num_minutes().max(0))
        .unwrap_or(0)
}

/// Amount owed in cents; hourly work is rounded half-up to the cent and
/// saturates at `i64::MAX`.
pub fn amount_due_cents(assignment: &StaffAssignment) -> i64 {
    match assignment.rate_type {
        RateType::Flat => assignment.rate_cents,
        RateType::Hourly => {
            let cents =
                (i128::from(assignment.rate_cents) * i128::from(worked_minutes(assignment)) + 30)
                    / 60;
            i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX })
        }
    }
}

/// Calendar day of the end of the work block plus the term's day count.
pub fn due_date(assignment: &StaffAssignment) -> Option<NaiveDate> {
    let (_, ends) = assignment.window()?;
    ends.date_naive()
        .checked_add_signed(Duration::days(assignment.payment_terms.days()))
}

pub fn derive_status(assignment: &StaffAssignment, today: NaiveDate) -> PaymentStatus {
    match assignment.payment_status {
        PaymentStatus::Cancelled => PaymentStatus::Cancelled,
        PaymentStatus::Paid => PaymentStatus::Paid,
        _ if assignment.paid_at.is_some() => PaymentStatus::Paid,
        _ => match due_date(assignment) {
            Some(due) if today > due => PaymentStatus::Overdue,
            _ => PaymentStatus::Pending,
        },
    }
}

pub fn ensure_can_mark_paid(assignment: &StaffAssignment) -> DatabaseResult<()> {
    match assignment.payment_status {
        PaymentStatus::Paid => Err(DatabaseError::Conflict(
            "assignment has already been paid".to_string(),
        )),
        PaymentStatus::Cancelled => Err(DatabaseError::Conflict(
            "cancelled assignments cannot be paid".to_string(),
        )),
        PaymentStatus::Pending | PaymentStatus::Overdue if assignment.paid_at.is_some() => Err(
            DatabaseError::Conflict("assignment has already been paid".to_string()),
        ),
        PaymentStatus::Pending | PaymentStatus::Overdue => Ok(()),
    }
}

/// Validates a status change requested through a regular update.
pub fn check_transition(current: PaymentStatus, requested: PaymentStatus) -> DatabaseResult<()> {
    if current == requested {
        return Ok(());
    }
    match (current, requested) {
        (PaymentStatus::Paid, _) => Err(DatabaseError::Conflict(
            "paid assignments cannot change payment status".to_string(),
        )),
        (_, PaymentStatus::Paid) => Err(DatabaseError::invalid(
            "payment_status",
            "use the mark paid operation to record a payment",
        )),
        (_, PaymentStatus::Overdue) => Err(DatabaseError::invalid(
            "payment_status",
            "overdue is derived from the due date",
        )),
        _ => Ok(()),
    }
}

/// An assignment together with its derived payment figures.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AssignmentPayment {
    #[serde(flatten)]
    pub assignment: StaffAssignment,
    pub amount_due_cents: i64,
    pub due_date: Option<String>,
}

impl AssignmentPayment {
    pub fn evaluate(mut assignment: StaffAssignment, today: NaiveDate) -> Self {
        assignment.payment_status = derive_status(&assignment, today);
        let amount_due_cents = amount_due_cents(&assignment);
        let due_date = due_date(&assignment).map(|d| d.format("%Y-%m-%d").to_string());
        Self {
            assignment,
            amount_due_cents,
            due_date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StaffCostSummary {
    pub assignment_count: i64,
    pub total_cents: i64,
    pub paid_cents: i64,
    pub pending_cents: i64,
    pub overdue_cents: i64,
}

/// Single pass over an event's assignments; cancelled ones are skipped.
pub fn summarize(assignments: &[StaffAssignment], today: NaiveDate) -> StaffCostSummary {
    assignments
        .iter()
        .fold(StaffCostSummary::default(), |mut summary, assignment| {
            let amount = amount_due_cents(assignment);
            match derive_status(assignment, today) {
                PaymentStatus::Cancelled => return summary,
                PaymentStatus::Paid => {
                    summary.paid_cents = summary.paid_cents.saturating_add(amount)
                }
                PaymentStatus::Pending => {
                    summary.pending_cents = summary.pending_cents.saturating_add(amount)
                }
                PaymentStatus::Overdue => {
                    summary.overdue_cents = summary.overdue_cents.saturating_add(amount)
                }
            }
            summary.assignment_count += 1;
            summary.total_cents = summary.total_cents.saturating_add(amount);
            summary
        })
}
