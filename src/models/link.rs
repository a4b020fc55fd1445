// src/models/link.rs - Pure data structures
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents a stored short link
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// The short slug that identifies this link, unique across all records
    pub slug: String,

    /// The original, long URL that was shortened. Opaque text as far as the
    /// service is concerned; it is never parsed as a URL.
    pub original_url: String,

    /// When this link was created; immutable after insertion
    pub created_at: DateTime<Utc>,
}

// DTO for creating a new short link.
//
// A missing originalUrl deserializes to the empty string, so absent and
// empty input share the single validation path below.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "originalUrl is required"))]
    pub original_url: String,

    pub alias: Option<String>,
}

// DTO for the create response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn missing_original_url_fails_validation() {
        let dto: ShortenRequest = serde_json::from_str("{}").unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn empty_original_url_fails_validation() {
        let dto: ShortenRequest =
            serde_json::from_str(r#"{"originalUrl": ""}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn original_url_is_not_parsed_as_a_url() {
        // The redirect target is stored verbatim, even when it is not a
        // well-formed URL.
        let dto: ShortenRequest =
            serde_json::from_str(r#"{"originalUrl": "not a url at all"}"#).unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn link_serializes_with_wire_field_names() {
        let link = Link {
            slug: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["slug"], "abc123");
        assert_eq!(json["originalUrl"], "https://example.com");
        assert!(json.get("createdAt").is_some());
    }
}
