//! Schema.org JSON-LD records.
//!
//! Field order of the structs is the serialization order of the emitted
//! markup.

use serde::{Deserialize, Serialize};

use super::aggregate::RatingFragment;

/// JSON-LD `@context` for every emitted record.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Entity types that also receive genre, publish date and author.
pub const CREATIVE_WORK_TYPES: [&str; 4] = ["CreativeWork", "Movie", "TVSeries", "Book"];

/// Third-party schema entry types that accept an `aggregateRating`.
pub const MERGEABLE_TYPES: [&str; 6] = [
    "Movie",
    "TVSeries",
    "Book",
    "CreativeWork",
    "Product",
    "LocalBusiness",
];

/// Taxonomies consulted for `genre`, in order of preference.
pub const GENRE_TAXONOMIES: [&str; 4] = ["anime_genre", "genre", "anime_category", "category"];

/// Returns true if a schema type gets the creative-work properties.
pub fn is_creative_work(schema_type: &str) -> bool {
    CREATIVE_WORK_TYPES.contains(&schema_type)
}

/// Returns true if a third-party entry of this type may carry a rating.
pub fn is_mergeable(schema_type: &str) -> bool {
    MERGEABLE_TYPES.contains(&schema_type)
}

/// The reviewed item of a ratings-only record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReviewed {
    #[serde(rename = "@type")]
    pub schema_type: String,
    pub name: String,
    pub url: String,
}

/// Standalone `AggregateRating` with the rating fields at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingOnlyRecord {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub schema_type: String,
    pub item_reviewed: ItemReviewed,
    pub rating_value: f64,
    pub best_rating: u32,
    pub worst_rating: u32,
    pub rating_count: u64,
    pub review_count: u64,
}

/// Publisher of a creative work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRef {
    #[serde(rename = "@type")]
    pub schema_type: String,
    pub name: String,
}

impl OrganizationRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema_type: "Organization".to_string(),
            name: name.into(),
        }
    }
}

/// Full typed entity (Movie, TVSeries, Book, ...) with a nested rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub schema_type: String,
    pub name: String,
    pub url: String,
    pub aggregate_rating: RatingFragment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<OrganizationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Record produced by the schema builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRecord {
    RatingOnly(RatingOnlyRecord),
    Entity(EntityRecord),
}

impl SchemaRecord {
    /// The record's `@type`.
    pub fn schema_type(&self) -> &str {
        match self {
            SchemaRecord::RatingOnly(r) => &r.schema_type,
            SchemaRecord::Entity(e) => &e.schema_type,
        }
    }

    /// Whether the record is the bare ratings-only fragment.
    pub fn is_rating_only(&self) -> bool {
        matches!(self, SchemaRecord::RatingOnly(_))
    }
}

/// A document ready to be embedded: either a record from the builder or
/// a third-party schema list with ratings spliced in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaDocument {
    Record(SchemaRecord),
    Graph(Vec<serde_json::Value>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::aggregate::{AggregateRecord, RatingTotals};

    fn fragment() -> RatingFragment {
        AggregateRecord::from_totals(RatingTotals {
            count: 3,
            average: Some(90.0),
        })
        .unwrap()
        .rating_fragment()
    }

    fn entity() -> EntityRecord {
        EntityRecord {
            context: SCHEMA_CONTEXT.to_string(),
            schema_type: "Movie".to_string(),
            name: "Spirited Away".to_string(),
            url: "https://example.com/anime/spirited-away/".to_string(),
            aggregate_rating: fragment(),
            genre: None,
            date_published: None,
            author: None,
            image: None,
            description: None,
        }
    }

    #[test]
    fn test_type_lists() {
        assert!(is_creative_work("Movie"));
        assert!(!is_creative_work("Product"));
        assert!(is_mergeable("LocalBusiness"));
        assert!(!is_mergeable("WebPage"));
    }

    #[test]
    fn test_entity_omits_absent_optionals() {
        let json = serde_json::to_value(SchemaRecord::Entity(entity())).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["@context"], "https://schema.org");
        assert_eq!(obj["@type"], "Movie");
        assert!(obj.contains_key("aggregateRating"));
        assert!(!obj.contains_key("genre"));
        assert!(!obj.contains_key("image"));
    }

    #[test]
    fn test_untagged_deserialization_picks_variant() {
        let entity_json = serde_json::to_string(&SchemaRecord::Entity(entity())).unwrap();
        let parsed: SchemaRecord = serde_json::from_str(&entity_json).unwrap();
        assert!(!parsed.is_rating_only());
        assert_eq!(parsed.schema_type(), "Movie");

        let rating_only = SchemaRecord::RatingOnly(RatingOnlyRecord {
            context: SCHEMA_CONTEXT.to_string(),
            schema_type: "AggregateRating".to_string(),
            item_reviewed: ItemReviewed {
                schema_type: "Thing".to_string(),
                name: "Spirited Away".to_string(),
                url: "https://example.com/anime/spirited-away/".to_string(),
            },
            rating_value: 90.0,
            best_rating: 100,
            worst_rating: 1,
            rating_count: 3,
            review_count: 3,
        });
        let json = serde_json::to_string(&rating_only).unwrap();
        let parsed: SchemaRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rating_only);
    }

    #[test]
    fn test_document_graph_serializes_as_array() {
        let doc = SchemaDocument::Graph(vec![serde_json::json!({"@type": "TVSeries"})]);
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.is_array());
    }
}
