use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A submitted testimonial with its moderation status.
///
/// Serializes with camelCase keys and omits an absent `name`, matching the
/// shape already persisted by the site front end, so stored collections
/// written by either side stay readable by both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Opaque unique id, assigned at creation.
    pub id: String,
    /// Display text, trimmed at submission. May be empty; content
    /// validation is a UI concern.
    pub text: String,
    /// Optional display name; `None` when not provided or blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the review is displayed without attribution.
    #[serde(default = "default_anonymous")]
    pub anonymous: bool,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
    /// False while pending; flipped exactly once on approval.
    #[serde(default)]
    pub approved: bool,
}

fn default_anonymous() -> bool {
    true
}

impl Review {
    /// Create a pending review from raw form input.
    ///
    /// Trims `text`, drops a `name` that is blank after trimming, and
    /// stamps a fresh id and creation time.
    pub fn new(text: &str, name: Option<&str>, anonymous: bool) -> Self {
        Self {
            id: new_id(),
            text: text.trim().to_string(),
            name: name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned),
            anonymous,
            created_at: Utc::now().timestamp_millis(),
            approved: false,
        }
    }
}

/// Generate an opaque unique review id.
fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_review_is_pending() {
        let review = Review::new("Great service", Some("Olena"), false);

        assert!(!review.approved);
        assert!(!review.anonymous);
        assert_eq!(review.text, "Great service");
        assert_eq!(review.name.as_deref(), Some("Olena"));
        assert!(review.created_at > 0);
        assert!(!review.id.is_empty());
    }

    #[test]
    fn test_new_trims_text_and_name() {
        let review = Review::new("  solid work  ", Some("  Ann  "), true);

        assert_eq!(review.text, "solid work");
        assert_eq!(review.name.as_deref(), Some("Ann"));
    }

    #[test]
    fn test_blank_name_is_dropped() {
        let review = Review::new("fine", Some("   "), true);
        assert_eq!(review.name, None);

        let review = Review::new("fine", None, true);
        assert_eq!(review.name, None);
    }

    #[test]
    fn test_empty_text_is_accepted() {
        let review = Review::new("   ", None, true);
        assert_eq!(review.text, "");
    }

    #[test]
    fn test_serialized_shape_matches_stored_format() {
        let review = Review {
            id: "r-1".to_string(),
            text: "ok".to_string(),
            name: None,
            anonymous: true,
            created_at: 1_700_000_000_000,
            approved: true,
        };

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["createdAt"], 1_700_000_000_000i64);
        assert_eq!(value["anonymous"], true);
        assert_eq!(value["approved"], true);
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        // Seed entries written by the original front end carry only
        // id, text, createdAt and approved.
        let review: Review =
            serde_json::from_str(r#"{"id":"seed-1","text":"hello","createdAt":42}"#).unwrap();

        assert_eq!(review.id, "seed-1");
        assert_eq!(review.name, None);
        assert!(review.anonymous);
        assert!(!review.approved);
        assert_eq!(review.created_at, 42);
    }
}
