//! Builds the schema.org record for a content item.

use crate::models::schema::{is_creative_work, GENRE_TAXONOMIES, SCHEMA_CONTEXT};
use crate::models::{
    AggregateRecord, ContentItem, EntityRecord, ItemReviewed, OrganizationRef, RatingOnlyRecord,
    SchemaRecord, SchemaSettings,
};
use shared::text::strip_tags;

/// Turns content metadata plus an aggregate into a JSON-LD record.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    site_name: String,
}

impl SchemaBuilder {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Builds the record for `content`.
    ///
    /// Content types without a mapped schema type get a standalone
    /// `AggregateRating` whose `itemReviewed` is a plain `Thing`. Mapped
    /// types get a full entity with the rating nested under
    /// `aggregateRating`.
    pub fn build(
        &self,
        content: &ContentItem,
        aggregate: &AggregateRecord,
        settings: &SchemaSettings,
    ) -> SchemaRecord {
        let fragment = aggregate.rating_fragment();
        let schema_type = settings.schema_type_for(&content.content_type);

        if schema_type.is_empty() {
            return SchemaRecord::RatingOnly(RatingOnlyRecord {
                context: SCHEMA_CONTEXT.to_string(),
                schema_type: fragment.schema_type,
                item_reviewed: ItemReviewed {
                    schema_type: "Thing".to_string(),
                    name: content.title.clone(),
                    url: content.permalink.clone(),
                },
                rating_value: fragment.rating_value,
                best_rating: fragment.best_rating,
                worst_rating: fragment.worst_rating,
                rating_count: fragment.rating_count,
                review_count: fragment.review_count,
            });
        }

        let mut entity = EntityRecord {
            context: SCHEMA_CONTEXT.to_string(),
            schema_type: schema_type.to_string(),
            name: content.title.clone(),
            url: content.permalink.clone(),
            aggregate_rating: fragment,
            genre: None,
            date_published: None,
            author: None,
            image: None,
            description: None,
        };

        if is_creative_work(schema_type) {
            entity.genre = genres(content);
            entity.date_published = Some(content.publish_date());
            entity.author = Some(OrganizationRef::new(
                settings.organization_name_or(&self.site_name),
            ));
        }

        entity.image = content
            .thumbnail_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        entity.description = content
            .excerpt
            .as_deref()
            .map(strip_tags)
            .filter(|text| !text.is_empty());

        SchemaRecord::Entity(entity)
    }
}

/// Term names of the first genre taxonomy with any terms.
fn genres(content: &ContentItem) -> Option<Vec<String>> {
    GENRE_TAXONOMIES
        .iter()
        .map(|taxonomy| content.term_names(taxonomy))
        .find(|names| !names.is_empty())
}
