pub mod common;
pub mod health;
pub mod root;

pub use health::{liveness, readiness};
pub use root::root;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Settings;
use crate::db::{Probe, SessionProvider};
use crate::AppState;

/// Flow7 API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Flow7 API",
        version = "0.1.0",
        description = "AI Agent Platform API"
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    paths(
        root::root,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        crate::health::HealthReport,
        crate::health::HealthStatus,
        crate::health::DatabaseState,
        crate::health::CheckStage,
        common::ErrorResponse,
        root::RootResponse,
    )),
    tags(
        (name = "Health", description = "Liveness and readiness checks"),
    )
)]
pub struct ApiDoc;

pub fn router<P>(state: Arc<AppState<P>>) -> Router
where
    P: SessionProvider,
    P::Handle: Probe,
{
    let settings = &state.settings;

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/api/redoc", ApiDoc::openapi()))
        .route("/", get(root::<P>))
        .route(&settings.liveness_path(), get(liveness::<P>))
        .route(&settings.readiness_path(), get(readiness::<P>))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(settings))
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    // Origins were validated when settings were loaded
    let origins: Vec<axum::http::HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentials rule out wildcards, so methods and headers mirror the preflight request
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
