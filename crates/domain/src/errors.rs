//! Domain error types.

use thiserror::Error;

/// Failure reported by an external collaborator (review store, content
/// source, settings store).
///
/// The rating pipeline never surfaces these to page output; they are
/// logged and treated as "no data".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed stored data: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::Unavailable("reviews table missing".into()).to_string(),
            "Store unavailable: reviews table missing"
        );
        assert_eq!(
            StoreError::Query("timeout".into()).to_string(),
            "Query failed: timeout"
        );
        assert_eq!(
            StoreError::Decode("bad json".into()).to_string(),
            "Malformed stored data: bad json"
        );
    }
}
