//! Admin authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::admin_key::{AdminKeyAuth, ADMIN_KEY_HEADER};

/// Rejects requests whose `X-API-Key` does not hash to the configured
/// admin digest. The authenticated caller is stored in request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match AdminKeyAuth::validate(presented, &state.config.security.admin_api_key_hash) {
        Ok(auth) => {
            tracing::debug!(key = %auth.key_fingerprint, "Admin request authenticated");
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(ApiError::Unauthorized(message)) => unauthorized_response(&message),
        Err(err) => err.into_response(),
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_response() {
        let response = unauthorized_response("Invalid or missing API key");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
