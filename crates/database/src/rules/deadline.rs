use chrono::NaiveDate;

use crate::entities::{Deadline, DeadlineStatus};

pub fn effective_status(deadline: &Deadline, today: NaiveDate) -> DeadlineStatus {
    if deadline.status == DeadlineStatus::Completed || deadline.completed_at.is_some() {
        return DeadlineStatus::Completed;
    }
    match NaiveDate::parse_from_str(&deadline.due_date, "%Y-%m-%d") {
        Ok(due) if today > due => DeadlineStatus::Overdue,
        _ => DeadlineStatus::Pending,
    }
}
