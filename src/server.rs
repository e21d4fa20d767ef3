//! # Server Configuration
//!
//! This module contains the router assembly and server startup for the
//! Platform API. The two mandatory pipeline stages (correlation id, tenant
//! resolution) are recorded in a [`PipelineRegistry`] as they are layered,
//! and the startup guardrail refuses to serve traffic unless both are wired.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{JwtService, authenticate_middleware};
use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry;
use crate::tenant::guardrail::{
    self, PipelineRegistry, REQUEST_ID_STAGE, TENANT_RESOLUTION_STAGE,
};
use crate::tenant::middleware::tenant_resolution_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        let jwt = Arc::new(JwtService::new(&config));
        Self {
            config: Arc::new(config),
            db,
            jwt,
        }
    }
}

/// Creates and configures the Axum application router, returning the router
/// together with the registry of pipeline stages that were actually wired.
pub fn create_app(state: AppState) -> (Router, PipelineRegistry) {
    let mut registry = PipelineRegistry::default();

    // Layers run bottom-up: the last layer added executes first, so the
    // request-id stage wraps resolution, which wraps authentication.
    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/api/v1/screens",
            get(handlers::screens::get_published_screen),
        )
        .route(
            "/api/v1/admin/screens",
            get(handlers::screens::list_screens).post(handlers::screens::create_screen),
        )
        .route(
            "/api/v1/admin/screens/{id}",
            get(handlers::screens::get_screen)
                .put(handlers::screens::update_screen)
                .delete(handlers::screens::delete_screen),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_middleware,
        ));

    router = router.layer(middleware::from_fn_with_state(
        state.clone(),
        tenant_resolution_middleware,
    ));
    registry.register(TENANT_RESOLUTION_STAGE);

    router = router.layer(middleware::from_fn(telemetry::request_id_middleware));
    registry.register(REQUEST_ID_STAGE);

    let router = router
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()));

    (router, registry)
}

/// Starts the server with the given configuration. Aborts before binding the
/// listener if the tenant isolation wiring is incomplete.
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let state = AppState::new(config.clone(), db);
    let (app, registry) = create_app(state);

    guardrail::validate_isolation_wiring(&registry)?;

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, profile = %config.profile, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::auth::login,
        crate::handlers::screens::get_published_screen,
        crate::handlers::screens::list_screens,
        crate::handlers::screens::create_screen,
        crate::handlers::screens::get_screen,
        crate::handlers::screens::update_screen,
        crate::handlers::screens::delete_screen,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::screens::ScreenDto,
            crate::handlers::screens::CreateScreenDto,
            crate::handlers::screens::UpdateScreenDto,
            crate::models::screen::ScreenType,
            crate::models::screen::ScreenStatus,
            crate::error::ApiError,
        )
    ),
    info(
        title = "Platform API",
        description = "Multi-tenant content platform API",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
