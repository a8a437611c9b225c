use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::{Probe, ScopedSession, SessionProvider};
use crate::error::SetupFault;
use crate::health::HealthReport;
use crate::AppState;

/// Liveness check
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthReport)
    )
)]
pub async fn liveness<P: SessionProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<HealthReport> {
    Json(state.health.liveness())
}

/// Database readiness check
///
/// Always answers 200; a failing database shows up as `"status": "unhealthy"` in the body.
#[utoipa::path(
    get,
    path = "/api/v1/health/db",
    tag = "Health",
    responses(
        (status = 200, description = "Readiness report", body = HealthReport)
    )
)]
pub async fn readiness<P>(
    State(state): State<Arc<AppState<P>>>,
    session: Result<ScopedSession<P>, SetupFault>,
) -> Json<HealthReport>
where
    P: SessionProvider,
    P::Handle: Probe,
{
    let report = match session {
        Ok(mut session) => {
            let report = state.health.readiness(&mut session).await;
            // Release before the response goes out
            drop(session);
            report
        }
        Err(fault) => state.health.acquisition_failed(&fault),
    };
    Json(report)
}
