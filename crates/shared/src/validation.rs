//! Common validation utilities.

use regex::Regex;
use std::collections::BTreeMap;
use validator::ValidationError;

/// Maximum length of a content type or schema type identifier.
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

lazy_static::lazy_static! {
    static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

fn identifier_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a content type or schema type identifier.
///
/// Identifiers are 1-64 characters of ASCII letters, digits, `_` or `-`.
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(identifier_error(
            "identifier_length",
            "Identifier must be 1-64 characters",
        ));
    }
    if !IDENTIFIER_REGEX.is_match(value) {
        return Err(identifier_error(
            "identifier_format",
            "Identifier may only contain letters, digits, '_' and '-'",
        ));
    }
    Ok(())
}

/// Validates every entry of an identifier list.
pub fn validate_identifier_list(values: &[String]) -> Result<(), ValidationError> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .try_for_each(validate_identifier)
}

/// Validates a content-type to schema-type mapping table.
///
/// Keys must be identifiers. Values must be identifiers or empty, where an
/// empty value selects ratings-only output.
pub fn validate_type_mappings(mappings: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    for (content_type, schema_type) in mappings {
        validate_identifier(content_type.trim())?;
        let schema_type = schema_type.trim();
        if !schema_type.is_empty() {
            validate_identifier(schema_type)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_valid() {
        assert!(validate_identifier("post").is_ok());
        assert!(validate_identifier("anime-series").is_ok());
        assert!(validate_identifier("TVSeries").is_ok());
        assert!(validate_identifier("anime_genre").is_ok());
    }

    #[test]
    fn test_validate_identifier_invalid() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("movie entry").is_err());
        assert!(validate_identifier("<script>").is_err());
        assert!(validate_identifier(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_identifier_error_message() {
        let err = validate_identifier("bad type").unwrap_err();
        assert_eq!(err.code, "identifier_format");
        assert!(err.message.is_some());
    }

    #[test]
    fn test_validate_identifier_list_skips_blank() {
        let values = vec!["post".to_string(), "  ".to_string(), "page".to_string()];
        assert!(validate_identifier_list(&values).is_ok());

        let values = vec!["post".to_string(), "bad type".to_string()];
        assert!(validate_identifier_list(&values).is_err());
    }

    #[test]
    fn test_validate_type_mappings_allows_ratings_only() {
        let mut mappings = BTreeMap::new();
        mappings.insert("anime".to_string(), "TVSeries".to_string());
        mappings.insert("page".to_string(), String::new());
        assert!(validate_type_mappings(&mappings).is_ok());

        mappings.insert("manga".to_string(), "Book (Manga)".to_string());
        assert!(validate_type_mappings(&mappings).is_err());
    }
}
