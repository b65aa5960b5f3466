//! Admin API key authentication extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use shared::crypto::{sha256_hex, verify_key};

pub const ADMIN_KEY_HEADER: &str = "X-API-Key";

/// Authenticated admin caller.
///
/// Only a short fingerprint of the presented key's digest is kept, for
/// log correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminKeyAuth {
    pub key_fingerprint: String,
}

impl AdminKeyAuth {
    /// Checks a presented key against the configured SHA-256 hex digest.
    pub fn validate(presented: Option<&str>, expected_hash: &str) -> Result<Self, ApiError> {
        if expected_hash.is_empty() {
            tracing::warn!("Admin request rejected: no admin key configured");
            return Err(ApiError::Unauthorized(
                "Admin access is not configured".to_string(),
            ));
        }

        let presented = presented
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Invalid or missing API key".to_string()))?;

        if !verify_key(presented, expected_hash) {
            return Err(ApiError::Unauthorized(
                "Invalid or missing API key".to_string(),
            ));
        }

        let digest = sha256_hex(presented);
        Ok(AdminKeyAuth {
            key_fingerprint: digest[..8].to_string(),
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminKeyAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<AdminKeyAuth>() {
            return Ok(auth.clone());
        }

        let presented = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        Self::validate(presented, &state.config.security.admin_api_key_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_matching_key() {
        let hash = sha256_hex("rs_admin_key");
        let auth = AdminKeyAuth::validate(Some("rs_admin_key"), &hash).unwrap();
        assert_eq!(auth.key_fingerprint, &hash[..8]);
    }

    #[test]
    fn test_validate_rejects_wrong_key() {
        let hash = sha256_hex("rs_admin_key");
        let result = AdminKeyAuth::validate(Some("rs_other_key"), &hash);
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let hash = sha256_hex("rs_admin_key");
        assert!(AdminKeyAuth::validate(None, &hash).is_err());
        assert!(AdminKeyAuth::validate(Some("   "), &hash).is_err());
    }

    #[test]
    fn test_validate_rejects_everything_without_configured_hash() {
        let result = AdminKeyAuth::validate(Some("rs_admin_key"), "");
        assert!(matches!(result, Err(ApiError::Unauthorized(msg)) if msg.contains("not configured")));
    }
}
