//! Shared types and result types for the database layer

pub mod errors;

pub use errors::DatabaseError;

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Pagination window shared by list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Deserializer for nullable fields of update requests: a missing key stays
/// `None` while an explicit `null` becomes `Some(None)` and clears the column.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}

/// Timestamp format used for every `created_at`/`updated_at` column.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_limits() {
        assert_eq!(Page::new(Some(0), Some(-4)), Page { limit: 1, offset: 0 });
        assert_eq!(Page::new(Some(10_000), None).limit, Page::MAX_LIMIT);
        assert_eq!(Page::default().limit, Page::DEFAULT_LIMIT);
    }

    #[derive(Debug, Default, serde::Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        venue: Option<Option<String>>,
    }

    #[test]
    fn nullable_tells_null_from_missing() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.venue, None);

        let cleared: Patch = serde_json::from_str(r#"{"venue": null}"#).unwrap();
        assert_eq!(cleared.venue, Some(None));

        let set: Patch = serde_json::from_str(r#"{"venue": "Pier 9"}"#).unwrap();
        assert_eq!(set.venue, Some(Some("Pier 9".to_string())));
    }
}
