//! Serializes a render plan into an embeddable markup block.

use serde::Serialize;
use tracing::warn;

use super::integration::RenderPlan;

pub const BLOCK_START: &str = "<!-- Aggregate Rating Schema -->";
pub const BLOCK_END: &str = "<!-- /Aggregate Rating Schema -->";

/// Pretty-printed JSON of a schema document.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Renders the `<script type="application/ld+json">` block for a plan.
///
/// Returns `None` for plans that emit nothing. `<` in the JSON is written
/// as `\u003c` so string values cannot close the script element.
pub fn render(plan: &RenderPlan) -> Option<String> {
    let RenderPlan::Standalone(document) = plan else {
        return None;
    };

    let json = match to_pretty_json(document) {
        Ok(json) => json.replace('<', "\\u003c"),
        Err(err) => {
            warn!(error = %err, "Failed to serialize schema document");
            return None;
        }
    };

    Some(format!(
        "{BLOCK_START}\n<script type=\"application/ld+json\">\n{json}\n</script>\n{BLOCK_END}\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SchemaDocument, SchemaRecord};
    use crate::services::integration::HandlerRegistration;
    use serde_json::{json, Value};

    fn extract_json(block: &str) -> Value {
        let start = block.find("ld+json\">").unwrap() + "ld+json\">".len();
        let end = block.find("</script>").unwrap();
        serde_json::from_str(&block[start..end]).unwrap()
    }

    #[test]
    fn test_suppressed_and_merge_render_nothing() {
        assert!(render(&RenderPlan::Suppressed).is_none());
        let plan = RenderPlan::MergeIntoExternal(HandlerRegistration {
            extension_point: "point".to_string(),
            content_id: 1,
        });
        assert!(render(&plan).is_none());
    }

    #[test]
    fn test_standalone_block_is_framed() {
        let doc = SchemaDocument::Graph(vec![json!({"@type": "Movie", "name": "Film"})]);
        let block = render(&RenderPlan::Standalone(doc)).unwrap();

        assert!(block.starts_with(BLOCK_START));
        assert!(block.trim_end().ends_with(BLOCK_END));
        assert!(block.contains("<script type=\"application/ld+json\">"));
        assert_eq!(extract_json(&block)[0]["name"], "Film");
    }

    #[test]
    fn test_angle_brackets_are_escaped() {
        let doc = SchemaDocument::Graph(vec![json!({"name": "</script><b>x</b>"})]);
        let block = render(&RenderPlan::Standalone(doc)).unwrap();

        assert_eq!(block.matches("</script>").count(), 1);
        assert_eq!(extract_json(&block)[0]["name"], "</script><b>x</b>");
    }

    #[test]
    fn test_record_round_trips_through_markup() {
        let record: SchemaRecord = serde_json::from_value(json!({
            "@context": "https://schema.org",
            "@type": "AggregateRating",
            "itemReviewed": {"@type": "Thing", "name": "Post", "url": "https://example.com/p"},
            "ratingValue": 90.0,
            "bestRating": 100,
            "worstRating": 1,
            "ratingCount": 3,
            "reviewCount": 3
        }))
        .unwrap();
        let block = render(&RenderPlan::Standalone(SchemaDocument::Record(record.clone()))).unwrap();

        let parsed: SchemaRecord = serde_json::from_value(extract_json(&block)).unwrap();
        assert_eq!(parsed, record);
    }
}
