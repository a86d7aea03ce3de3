//! Field-level input validation.
//!
//! Checks collect into a [`ValidationErrors`] map keyed by field name so the
//! HTTP layer can report every problem with a payload at once.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::types::DatabaseError;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url regex is valid"));

const MAX_EMAIL_LENGTH: usize = 255;
const MAX_URL_LENGTH: usize = 2048;

/// Upper bound for any stored money amount (100 billion in major units).
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    pub fn into_result(self) -> Result<(), DatabaseError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DatabaseError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field} {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Non-blank text no longer than `max` characters.
pub fn require_text(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.add(field, "is required");
    } else if value.chars().count() > max {
        errors.add(field, format!("must be at most {max} characters"));
    }
}

pub fn check_optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(value) = value {
        if value.chars().count() > max {
            errors.add(field, format!("must be at most {max} characters"));
        }
    }
}

pub fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.len() > MAX_EMAIL_LENGTH {
        errors.add(field, "is too long");
    } else if !EMAIL_REGEX.is_match(value) {
        errors.add(field, "is not a valid email address");
    }
}

pub fn check_optional_email(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        check_email(errors, field, value);
    }
}

pub fn check_url(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.len() > MAX_URL_LENGTH {
        errors.add(field, "is too long");
    } else if !URL_REGEX.is_match(value) {
        errors.add(field, "must be an http or https URL");
    }
}

pub fn check_optional_url(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        check_url(errors, field, value);
    }
}

pub fn check_non_negative(errors: &mut ValidationErrors, field: &str, value: i64) {
    if value < 0 {
        errors.add(field, "must not be negative");
    }
}

/// Money amount in cents between zero and [`MAX_AMOUNT_CENTS`].
pub fn check_amount(errors: &mut ValidationErrors, field: &str, value: i64) {
    if value < 0 {
        errors.add(field, "must not be negative");
    } else if value > MAX_AMOUNT_CENTS {
        errors.add(field, format!("must be at most {MAX_AMOUNT_CENTS}"));
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(errors: &mut ValidationErrors, field: &str, value: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "must be a date in YYYY-MM-DD format");
            None
        }
    }
}

/// Parse an RFC 3339 instant.
pub fn parse_instant(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(instant) => Some(instant),
        Err(_) => {
            errors.add(field, "must be an RFC 3339 timestamp");
            None
        }
    }
}

/// Record an error on `field` unless `end` comes after `start` (or equals it
/// when `allow_equal`).
pub fn check_order<T: PartialOrd>(
    errors: &mut ValidationErrors,
    field: &str,
    start: Option<T>,
    end: Option<T>,
    allow_equal: bool,
) {
    if let (Some(start), Some(end)) = (start, end) {
        let ordered = if allow_equal { end >= start } else { end > start };
        if !ordered {
            let message = if allow_equal {
                "must not be before the start"
            } else {
                "must be after the start"
            };
            errors.add(field, message);
        }
    }
}
