use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::db::SessionProvider;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    message: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Root",
    responses(
        (status = 200, description = "Service banner", body = RootResponse)
    )
)]
pub async fn root<P: SessionProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} is running", state.settings.project_name),
    })
}
