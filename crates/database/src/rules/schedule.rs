//! Agenda scheduling checks.

use crate::entities::{AgendaSession, Event};
use crate::validation::ValidationErrors;

/// First session in the same room whose half-open interval overlaps `candidate`.
pub fn find_overlap<'a>(
    candidate: &AgendaSession,
    others: &'a [AgendaSession],
) -> Option<&'a AgendaSession> {
    let room = candidate.room()?;
    let (starts, ends) = candidate.window()?;

    others.iter().find(|other| {
        if other.id == candidate.id || other.room().as_deref() != Some(room.as_str()) {
            return false;
        }
        match other.window() {
            Some((other_starts, other_ends)) => starts < other_ends && other_starts < ends,
            None => false,
        }
    })
}

/// Sessions must start and end on days the event runs, in the session's own offset.
pub fn check_within_event(session: &AgendaSession, event: &Event, errors: &mut ValidationErrors) {
    let (Some((starts, ends)), Some((first_day, last_day))) = (session.window(), event.date_range())
    else {
        return;
    };

    if starts.date_naive() < first_day {
        errors.add("starts_at", "must not be before the event starts");
    }
    if ends.date_naive() > last_day {
        errors.add("ends_at", "must not be after the event ends");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CreateEventRequest, CreateSessionRequest};

    fn session(id: &str, location: Option<&str>, starts: &str, ends: &str) -> AgendaSession {
        AgendaSession::from_request(
            id.into(),
            "evt",
            CreateSessionRequest {
                title: format!("Session {id}"),
                description: None,
                session_type: None,
                starts_at: starts.into(),
                ends_at: ends.into(),
                location: location.map(str::to_string),
                speaker_id: None,
            },
            "now",
        )
    }

    #[test]
    fn overlapping_sessions_in_same_room_clash() {
        let existing = vec![
            session("a", Some("Room 1"), "2025-05-10T09:00:00Z", "2025-05-10T10:00:00Z"),
            session("b", Some("Room 2"), "2025-05-10T09:30:00Z", "2025-05-10T10:30:00Z"),
        ];
        let candidate = session("c", Some(" room 1 "), "2025-05-10T09:45:00Z", "2025-05-10T11:00:00Z");
        assert_eq!(find_overlap(&candidate, &existing).map(|s| s.id.as_str()), Some("a"));
    }

    #[test]
    fn back_to_back_sessions_do_not_clash() {
        let existing = vec![session("a", Some("Main"), "2025-05-10T09:00:00Z", "2025-05-10T10:00:00Z")];
        let candidate = session("c", Some("Main"), "2025-05-10T10:00:00Z", "2025-05-10T11:00:00Z");
        assert!(find_overlap(&candidate, &existing).is_none());
    }

    #[test]
    fn blank_rooms_and_self_are_ignored() {
        let existing = vec![
            session("a", None, "2025-05-10T09:00:00Z", "2025-05-10T10:00:00Z"),
            session("c", Some("Main"), "2025-05-10T09:00:00Z", "2025-05-10T10:00:00Z"),
        ];
        let unplaced = session("x", Some("  "), "2025-05-10T09:00:00Z", "2025-05-10T10:00:00Z");
        assert!(find_overlap(&unplaced, &existing).is_none());

        let moved = session("c", Some("Main"), "2025-05-10T09:30:00Z", "2025-05-10T10:30:00Z");
        assert!(find_overlap(&moved, &existing).is_none());
    }

    #[test]
    fn sessions_must_fit_event_days() {
        let event = Event::from_request(
            "evt".into(),
            CreateEventRequest {
                name: "Conf".into(),
                description: None,
                venue: None,
                start_date: "2025-05-10".into(),
                end_date: "2025-05-11".into(),
                capacity: None,
                budget_cents: 0,
                status: None,
            },
            "now",
        );

        let mut errors = ValidationErrors::new();
        check_within_event(
            &session("a", None, "2025-05-11T22:00:00+02:00", "2025-05-11T23:30:00+02:00"),
            &event,
            &mut errors,
        );
        assert!(errors.is_empty());

        check_within_event(
            &session("b", None, "2025-05-09T20:00:00Z", "2025-05-12T01:00:00Z"),
            &event,
            &mut errors,
        );
        assert!(errors.contains("starts_at"));
        assert!(errors.contains("ends_at"));
    }
}
