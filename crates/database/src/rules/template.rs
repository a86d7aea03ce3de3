//! `{{placeholder}}` substitution for email templates.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::entities::Event;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").expect("placeholder regex is valid")
});

/// Replaces known placeholders; unknown ones are left as written.
pub fn render(text: &str, variables: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Distinct placeholder names in order of their names.
pub fn placeholders(text: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Variables every event-scoped render can use.
pub fn event_variables(event: &Event) -> HashMap<String, String> {
    HashMap::from([
        ("event_name".to_string(), event.name.clone()),
        ("event_start_date".to_string(), event.start_date.clone()),
        ("event_end_date".to_string(), event.end_date.clone()),
        (
            "event_venue".to_string(),
            event.venue.clone().unwrap_or_default(),
        ),
    ])
}
