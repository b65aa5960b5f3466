//! Structural checks on generated schema, for the admin preview.

use serde_json::Value;

use crate::models::SchemaValidationReport;

const ENTITY_REQUIRED: [&str; 4] = ["@context", "@type", "name", "aggregateRating"];
const RATING_ONLY_REQUIRED: [&str; 3] = ["@context", "@type", "itemReviewed"];
const RATING_REQUIRED: [&str; 3] = ["@type", "ratingValue", "ratingCount"];

/// Checks a schema record for the fields search engines require.
pub fn validate_schema(schema: &Value) -> SchemaValidationReport {
    let mut report = SchemaValidationReport::default();

    let Some(object) = schema.as_object() else {
        report.error("Schema must be a JSON object");
        return report;
    };

    // A ratings-only record carries the rating fields at the top level.
    let rating_only = object.contains_key("itemReviewed");
    let required: &[&str] = if rating_only {
        &RATING_ONLY_REQUIRED
    } else {
        &ENTITY_REQUIRED
    };
    for field in required {
        if !object.contains_key(*field) {
            report.error(format!("Missing required field: {field}"));
        }
    }

    let rating = if rating_only {
        Some(schema)
    } else {
        object.get("aggregateRating")
    };
    if let Some(rating) = rating {
        validate_rating(rating, &mut report);
    }

    report
}

fn validate_rating(rating: &Value, report: &mut SchemaValidationReport) {
    for field in RATING_REQUIRED {
        if rating.get(field).is_none() {
            report.error(format!("Missing required aggregateRating field: {field}"));
        }
    }

    if let Some(value) = rating.get("ratingValue").and_then(Value::as_f64) {
        if !(1.0..=100.0).contains(&value) {
            report.warning(format!("Rating value {value} is outside the 1-100 range"));
        }
    }

    if let Some(count) = rating.get("ratingCount").and_then(Value::as_f64) {
        if count < 1.0 {
            report.error("Rating count must be at least 1");
        }
    }
}
