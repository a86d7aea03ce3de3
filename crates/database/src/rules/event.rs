use chrono::NaiveDate;

use crate::entities::{Event, EventStatus};

/// Status shown to users: drafts and cancellations are sticky, everything
/// else follows the calendar.
pub fn effective_status(event: &Event, today: NaiveDate) -> EventStatus {
    match event.status {
        EventStatus::Draft | EventStatus::Cancelled => event.status,
        _ => match event.date_range() {
            Some((start, _)) if today < start => EventStatus::Upcoming,
            Some((_, end)) if today > end => EventStatus::Completed,
            Some(_) => EventStatus::Active,
            None => event.status,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CreateEventRequest;

    fn event(status: EventStatus) -> Event {
        Event::from_request(
            "evt".into(),
            CreateEventRequest {
                name: "Summit".into(),
                description: None,
                venue: None,
                start_date: "2025-05-10".into(),
                end_date: "2025-05-12".into(),
                capacity: None,
                budget_cents: 0,
                status: Some(status),
            },
            "now",
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[test]
    fn follows_calendar_at_boundaries() {
        let event = event(EventStatus::Upcoming);
        assert_eq!(effective_status(&event, day(9)), EventStatus::Upcoming);
        assert_eq!(effective_status(&event, day(10)), EventStatus::Active);
        assert_eq!(effective_status(&event, day(12)), EventStatus::Active);
        assert_eq!(effective_status(&event, day(13)), EventStatus::Completed);
    }

    #[test]
    fn stored_completed_reopens_if_dates_move_forward() {
        let event = event(EventStatus::Completed);
        assert_eq!(effective_status(&event, day(1)), EventStatus::Upcoming);
    }

    #[test]
    fn draft_and_cancelled_are_sticky() {
        assert_eq!(effective_status(&event(EventStatus::Draft), day(11)), EventStatus::Draft);
        assert_eq!(
            effective_status(&event(EventStatus::Cancelled), day(11)),
            EventStatus::Cancelled
        );
    }
}
