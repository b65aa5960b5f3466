//! Repository implementations for database operations.
//!
//! Each repository implements one of the domain collaborator traits.

pub mod content;
pub mod review;
pub mod schema_settings;

pub use content::{ContentRepository, DEFAULT_EXTERNAL_SCHEMA_META_KEY};
pub use review::ReviewRepository;
pub use schema_settings::SchemaSettingsRepository;

use domain::StoreError;

/// Maps a database error onto the domain store error.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Decode(err.to_string())
        }
        _ => StoreError::Query(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            store_error(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            store_error(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
    }
}
