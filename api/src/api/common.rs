use axum::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::db::{ScopedSession, SessionProvider};
use crate::error::SetupFault;
use crate::AppState;

// Database session extractor - one scoped session per request, released when the handler returns
#[async_trait]
impl<P: SessionProvider> FromRequestParts<Arc<AppState<P>>> for ScopedSession<P> {
    type Rejection = SetupFault;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &Arc<AppState<P>>,
    ) -> Result<Self, Self::Rejection> {
        let db = state.db.as_ref().ok_or(SetupFault::NotConfigured)?;
        db.scoped().await
    }
}

impl IntoResponse for SetupFault {
    fn into_response(self) -> Response {
        let error_type = match self {
            SetupFault::NotConfigured => "DATABASE_NOT_CONFIGURED",
            SetupFault::Unreachable(_) => "DATABASE_UNAVAILABLE",
        };
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: self.to_string(),
                error_type: error_type.to_string(),
            }),
        )
            .into_response()
    }
}

/// Standard error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error type code
    pub error_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn setup_fault_renders_as_service_unavailable() {
        let response = SetupFault::Unreachable("pool timed out".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error_type"], "DATABASE_UNAVAILABLE");
        assert!(json["error"].as_str().unwrap().contains("pool timed out"));
    }

    #[test]
    fn unconfigured_database_has_its_own_error_type() {
        let response = SetupFault::NotConfigured.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
