//! Sponsor entity definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DatabaseResult;
use crate::validation::{self, ValidationErrors};

text_enum! {
    pub enum SponsorTier {
        Platinum => "platinum",
        Gold => "gold",
        Silver => "silver",
        Bronze => "bronze",
        Partner => "partner",
    }
    default = Partner;
}

text_enum! {
    pub enum SponsorStatus {
        Prospect => "prospect",
        Pending => "pending",
        Confirmed => "confirmed",
        Paid => "paid",
        Cancelled => "cancelled",
    }
    default = Prospect;
}

impl SponsorStatus {
    /// Contributions from these sponsors are counted as secured funding.
    pub fn is_secured(&self) -> bool {
        matches!(self, SponsorStatus::Confirmed | SponsorStatus::Paid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Sponsor {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub tier: SponsorTier,
    pub contribution_cents: i64,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub status: SponsorStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSponsorRequest {
    pub name: String,
    pub tier: Option<SponsorTier>,
    #[serde(default)]
    pub contribution_cents: i64,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub status: Option<SponsorStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSponsorRequest {
    pub name: Option<String>,
    pub tier: Option<SponsorTier>,
    pub contribution_cents: Option<i64>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    #[schema(value_type = Option<String>)]
    pub website: Option<Option<String>>,
    pub status: Option<SponsorStatus>,
}

impl Sponsor {
    pub fn from_request(id: String, event_id: &str, request: CreateSponsorRequest, now: &str) -> Self {
        Self {
            id,
            event_id: event_id.to_string(),
            name: request.name.trim().to_string(),
            tier: request.tier.unwrap_or_default(),
            contribution_cents: request.contribution_cents,
            contact_name: request.contact_name,
            contact_email: request.contact_email,
            website: request.website,
            status: request.status.unwrap_or_default(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    pub fn apply(&mut self, request: UpdateSponsorRequest) {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(tier) = request.tier {
            self.tier = tier;
        }
        if let Some(contribution_cents) = request.contribution_cents {
            self.contribution_cents = contribution_cents;
        }
        if let Some(contact_name) = request.contact_name {
            self.contact_name = contact_name;
        }
        if let Some(contact_email) = request.contact_email {
            self.contact_email = contact_email;
        }
        if let Some(website) = request.website {
            self.website = website;
        }
        if let Some(status) = request.status {
            self.status = status;
        }
    }

    pub fn validate(&self) -> DatabaseResult<()> {
        let mut errors = ValidationErrors::new();
        validation::require_text(&mut errors, "name", &self.name, 200);
        validation::check_amount(&mut errors, "contribution_cents", self.contribution_cents);
        validation::check_optional_text(&mut errors, "contact_name", self.contact_name.as_deref(), 200);
        validation::check_optional_email(&mut errors, "contact_email", self.contact_email.as_deref());
        validation::check_optional_url(&mut errors, "website", self.website.as_deref());
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn website_must_be_http() {
        let mut sponsor = Sponsor::from_request(
            "s1".into(),
            "evt",
            CreateSponsorRequest {
                name: "Ferris Corp".into(),
                tier: Some(SponsorTier::Gold),
                contribution_cents: 250_000,
                contact_name: None,
                contact_email: Some("hello@ferris.dev".into()),
                website: Some("https://ferris.dev".into()),
                status: None,
            },
            "now",
        );
        assert!(sponsor.validate().is_ok());
        assert!(!sponsor.status.is_secured());

        sponsor.apply(UpdateSponsorRequest {
            website: Some(Some("ferris.dev".into())),
            ..Default::default()
        });
        assert!(sponsor.validate().is_err());
    }
}
