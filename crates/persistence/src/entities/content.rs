//! Content item entities (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the content_items table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentItemEntity {
    pub id: i64,
    pub title: String,
    pub permalink: String,
    pub content_type: String,
    pub excerpt: Option<String>,
    pub thumbnail_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Database row mapping for the content_terms table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentTermEntity {
    pub taxonomy: String,
    pub name: String,
}

impl From<ContentTermEntity> for domain::models::TaxonomyTerm {
    fn from(entity: ContentTermEntity) -> Self {
        Self {
            taxonomy: entity.taxonomy,
            name: entity.name,
        }
    }
}

impl ContentItemEntity {
    /// Combines the row with its ordered taxonomy terms.
    pub fn into_domain(self, terms: Vec<ContentTermEntity>) -> domain::models::ContentItem {
        domain::models::ContentItem {
            id: self.id,
            title: self.title,
            permalink: self.permalink,
            content_type: self.content_type,
            excerpt: self.excerpt,
            thumbnail_url: self.thumbnail_url,
            published_at: self.published_at,
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_domain_keeps_term_order() {
        let entity = ContentItemEntity {
            id: 42,
            title: "Film".to_string(),
            permalink: "https://example.com/film".to_string(),
            content_type: "anime".to_string(),
            excerpt: None,
            thumbnail_url: Some("https://example.com/film.jpg".to_string()),
            published_at: Utc::now(),
        };
        let terms = vec![
            ContentTermEntity {
                taxonomy: "genre".to_string(),
                name: "Drama".to_string(),
            },
            ContentTermEntity {
                taxonomy: "genre".to_string(),
                name: "Action".to_string(),
            },
        ];

        let item = entity.into_domain(terms);
        assert_eq!(item.id, 42);
        assert_eq!(item.term_names("genre"), vec!["Drama", "Action"]);
    }
}
