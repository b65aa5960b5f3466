//! Review store events and statistics.

use serde::{Deserialize, Serialize};

/// Kind of change reported by the review store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Created,
    Updated,
    Deleted,
}

impl std::fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewAction::Created => write!(f, "created"),
            ReviewAction::Updated => write!(f, "updated"),
            ReviewAction::Deleted => write!(f, "deleted"),
        }
    }
}

/// A review was created, updated or deleted.
///
/// Events without a content ID cannot be attributed and are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReviewEvent {
    #[serde(default)]
    pub content_id: Option<i64>,
    pub action: ReviewAction,
}

impl ReviewEvent {
    pub fn new(content_id: i64, action: ReviewAction) -> Self {
        Self {
            content_id: Some(content_id),
            action,
        }
    }
}

/// One approved, rated review picked for connectivity diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReviewSample {
    pub content_id: i64,
    pub rating: f64,
}

/// Store-wide review statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReviewStatistics {
    pub total_reviews: i64,
    pub approved_reviews: i64,
    pub sample: Option<ReviewSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_action_display() {
        assert_eq!(ReviewAction::Created.to_string(), "created");
        assert_eq!(ReviewAction::Updated.to_string(), "updated");
        assert_eq!(ReviewAction::Deleted.to_string(), "deleted");
    }

    #[test]
    fn test_review_event_deserialization() {
        let event: ReviewEvent =
            serde_json::from_str(r#"{"content_id": 42, "action": "updated"}"#).unwrap();
        assert_eq!(event, ReviewEvent::new(42, ReviewAction::Updated));

        let event: ReviewEvent = serde_json::from_str(r#"{"action": "deleted"}"#).unwrap();
        assert!(event.content_id.is_none());
    }
}
