//! Domain entities stored by the repositories.
//!
//! Every entity owns its validation: requests are turned into (or applied to)
//! an entity value and the resulting value is validated as a whole before it
//! is written, so cross-field invariants survive partial updates.

/// Declares a text-backed status enum whose serde and SQL spellings agree.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            sqlx::Type,
            utoipa::ToSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                #[sqlx(rename = $text)]
                $variant
            ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} `{}`", stringify!($name), other)),
                }
            }
        }
    };
}

pub mod agenda;
pub mod budget;
pub mod communication;
pub mod deadline;
pub mod email_template;
pub mod event;
pub mod file;
pub mod participant;
pub mod speaker;
pub mod sponsor;
pub mod staff;
pub mod staff_assignment;

pub use agenda::{AgendaSession, CreateSessionRequest, SessionType, UpdateSessionRequest};
pub use budget::{
    BudgetCategory, BudgetItem, BudgetItemStatus, CreateBudgetCategoryRequest,
    CreateBudgetItemRequest, UpdateBudgetCategoryRequest, UpdateBudgetItemRequest,
};
pub use communication::{
    Audience, Channel, Communication, CommunicationStatus, CreateCommunicationRequest,
    UpdateCommunicationRequest,
};
pub use deadline::{
    CreateDeadlineRequest, Deadline, DeadlinePriority, DeadlineStatus, UpdateDeadlineRequest,
};
pub use email_template::{
    CreateEmailTemplateRequest, EmailTemplate, RenderedTemplate, UpdateEmailTemplateRequest,
};
pub use event::{CreateEventRequest, Event, EventFilter, EventStatus, UpdateEventRequest};
pub use file::{CreateFileRequest, FileRecord};
pub use participant::{
    CreateParticipantRequest, Participant, ParticipantCounts, ParticipantStatus, TicketType,
    UpdateParticipantRequest,
};
pub use speaker::{CreateSpeakerRequest, Speaker, SpeakerStatus, UpdateSpeakerRequest};
pub use sponsor::{CreateSponsorRequest, Sponsor, SponsorStatus, SponsorTier, UpdateSponsorRequest};
pub use staff::{CreateStaffRequest, Staff, UpdateStaffRequest};
pub use staff_assignment::{
    CreateAssignmentRequest, PaymentStatus, PaymentTerms, RateType, StaffAssignment,
    UpdateAssignmentRequest,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn text_enums_round_trip_through_strings() {
        for status in EventStatus::ALL {
            assert_eq!(EventStatus::from_str(status.as_str()), Ok(*status));
        }
        assert_eq!(PaymentTerms::Net30.as_str(), "net30");
        assert_eq!(SessionType::Break.to_string(), "break");
        assert!(SponsorTier::from_str("diamond").is_err());
    }

    #[test]
    fn text_enums_serialize_with_sql_spelling() {
        let json = serde_json::to_string(&PaymentTerms::Net15).unwrap();
        assert_eq!(json, "\"net15\"");
        let parsed: ParticipantStatus = serde_json::from_str("\"waitlisted\"").unwrap();
        assert_eq!(parsed, ParticipantStatus::Waitlisted);
    }
}
