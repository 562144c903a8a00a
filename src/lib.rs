// Library exports for the Clippers backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, ConfigError, Environment};
pub use db::{DieselDatabaseConfig, DieselPool};
pub use middleware::{auth_middleware, require_role, AuthenticatedUser};
pub use models::auth::SessionClaims;
pub use models::{Profile, UserRole};
pub use services::{
    AuthService, CampaignService, JwtConfig, JwtError, JwtService, ParticipationService,
};
pub use utils::{AuthError, ServiceError};

// Re-export handler route builders
pub use handlers::{brand_routes, clipper_routes, protected_auth_routes, public_auth_routes};

// Library initialization function for the binary and test harness
pub async fn initialize_app_state(
    config: AppConfig,
) -> Result<AppState, Box<dyn std::error::Error>> {
    use std::sync::Arc;
    use tracing::info;

    // Initialize database pool
    info!("Initializing database pool...");
    let db_config = db::DieselDatabaseConfig::from_app_config(&config);
    let max_connections = db_config.max_connections;
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    // Run embedded migrations
    info!("Running embedded migrations...");
    db::run_migrations(&config.database_url)
        .await
        .map_err(|e| format!("Migration failed: {}", e))?;

    // Initialize services
    let jwt_service = Arc::new(JwtService::new(JwtConfig::from_app_config(&config)));

    // Create app state
    Ok(AppState {
        config: Arc::new(config),
        diesel_pool,
        jwt_service,
        max_connections,
    })
}

// Full application router: public routes, role-gated groups, CORS and tracing
pub fn build_router(state: AppState) -> axum::Router {
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    axum::Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/auth", handlers::public_auth_routes())
        .nest("/auth", handlers::protected_auth_routes(state.clone()))
        .nest("/brand", handlers::brand_routes(state.clone()))
        .nest("/clipper", handlers::clipper_routes(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::dynamic_cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Greeting handler for the root path
pub async fn root() -> impl axum::response::IntoResponse {
    axum::Json(serde_json::json!({ "message": "Hello Clippers" }))
}

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::Json;

    let mut overall_healthy = true;
    let timestamp = chrono::Utc::now().to_rfc3339();

    // Check PostgreSQL
    let postgres_health = match db::check_diesel_health(&state.diesel_pool).await {
        Ok(_) => serde_json::json!({
            "status": "healthy",
            "max_connections": state.max_connections,
            "error": null
        }),
        Err(e) => {
            overall_healthy = false;
            serde_json::json!({
                "status": "unhealthy",
                "error": format!("Database connection failed: {}", e)
            })
        },
    };

    // Liveness endpoint: a degraded dependency is reported in the body, the
    // request itself still succeeds
    Json(serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "clippers-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health
        }
    }))
}
