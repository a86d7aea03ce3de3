//! Staff assignment entity definitions

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

text_enum! {
    pub enum RateType {
        Hourly => "hourly",
        Flat => "flat",
    }
    default = Hourly;
}

text_enum! {
    /// How long after the work block ends payment falls due.
    pub enum PaymentTerms {
        Immediate => "immediate",
        Net7 => "net7",
        Net15 => "net15",
        Net30 => "net30",
        Net60 => "net60",
    }
    default = Net30;
}

impl PaymentTerms {
    pub fn days(&self) -> i64 {
        match self {
            PaymentTerms::Immediate => 0,
            PaymentTerms::Net7 => 7,
            PaymentTerms::Net15 => 15,
            PaymentTerms::Net30 => 30,
            PaymentTerms::Net60 => 60,
        }
    }
}

text_enum! {
    pub enum PaymentStatus {
        Pending => "pending",
        Paid => "paid",
        Overdue => "overdue",
        Cancelled => "cancelled",
    }
    default = Pending;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StaffAssignment {
    pub id: String,
    pub event_id: String,
    pub staff_id: String,
    pub role: Option<String>,
    pub starts_at: String,
    pub ends_at: String,
    pub rate_type: RateType,
    pub rate_cents: i64,
    pub payment_terms: PaymentTerms,
    pub payment_status: PaymentStatus,
    pub paid_at: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAssignmentRequest {
    pub staff_id: String,
    pub role: Option<String>,
    pub starts_at: String,
    pub ends_at: String,
    pub rate_type: Option<RateType>,
    /// Falls back to the staff member's hourly rate
    pub rate_cents: Option<i64>,
    pub payment_terms: Option<PaymentTerms>,
    pub notes: Option<String>,
}

/// Paying an assignment goes through the dedicated mark-paid operation, so
/// `paid` is not accepted here.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAssignmentRequest {
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub role: Option<Option<String>>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub rate_type: Option<RateType>,
    pub rate_cents: Option<i64>,
    pub payment_terms: Option<PaymentTerms>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl StaffAssignment {
    pub fn from_request(
        id: String,
        event_id: &str,
        default_rate_cents: i64,
        request: CreateAssignmentRequest,
        now: &str,
    ) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            staff_id: request.staff_id,
            role: request.role,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            rate_type: request.rate_type.unwrap_or_default(),
            rate_cents: request.rate_cents.unwrap_or(default_rate_cents),
            payment_terms: request.payment_terms.unwrap_or_default(),
            payment_status: PaymentStatus::Pending,
            paid_at: None,
            notes: request.notes,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Applies the editable fields; status changes are checked by the caller.
    pub fn apply(&mut self, request: UpdateAssignmentRequest) {
        if let Some(role) = request.role {
            self.role = role;
        }
        if let Some(starts_at) = request.starts_at {
            self.starts_at = starts_at;
        }
        if let Some(ends_at) = request.ends_at {
            self.ends_at = ends_at;
        }
        if let Some(rate_type) = request.rate_type {
            self.rate_type = rate_type;
        }
        if let Some(rate_cents) = request.rate_cents {
            self.rate_cents = rate_cents;
        }
        if let Some(terms) = request.payment_terms {
            self.payment_terms = terms;
        }
        if let Some(status) = request.payment_status {
            self.payment_status = status;
        }
        if let Some(notes) = request.notes {
            self.notes = notes;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        if self.staff_id.trim().is_empty() {
            errors.add("staff_id", "is required");
        }
        validation::check_optional_text(&mut errors, "role", self.role.as_deref(), 100);
        let starts = validation::parse_instant(&mut errors, "starts_at", &self.starts_at);
        let ends = validation::parse_instant(&mut errors, "ends_at", &self.ends_at);
        validation::check_order(&mut errors, "ends_at", starts, ends, false);
        validation::check_amount(&mut errors, "rate_cents", self.rate_cents);
        validation::check_optional_text(&mut errors, "notes", self.notes.as_deref(), 5000);
        errors.into_result()
    }

    /// Parsed work block; `None` only for rows that bypassed validation.
    pub fn window(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let starts = DateTime::parse_from_rfc3339(&self.starts_at).ok()?;
        let ends = DateTime::parse_from_rfc3339(&self.ends_at).ok()?;
        Some((starts, ends))
    }
}
