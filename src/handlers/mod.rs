// HTTP handlers and route builders

pub mod auth;
pub mod brand;
pub mod clipper;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::{
    app::AppState,
    middleware::{auth_middleware, require_role},
    models::UserRole,
};

// Authentication routes that require no session
pub fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify-email", post(auth::verify_email))
}

// Authentication routes behind the session middleware
pub fn protected_auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/change-password", post(auth::change_password))
        .route(
            "/profile",
            get(auth::get_profile).patch(auth::update_profile),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

// Brand routes: session middleware runs first, then the role gate
pub fn brand_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(brand::dashboard))
        .route(
            "/campaigns",
            post(brand::create_campaign).get(brand::list_campaigns),
        )
        .route(
            "/campaigns/{id}",
            patch(brand::update_campaign).delete(brand::delete_campaign),
        )
        .route("/campaigns/{id}/toggle", patch(brand::toggle_campaign))
        .route(
            "/campaigns/{id}/participants",
            get(brand::list_participants),
        )
        .layer(middleware::from_fn(|request, next| {
            require_role(request, next, UserRole::Brand)
        }))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

// Clipper routes: session middleware runs first, then the role gate
pub fn clipper_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(clipper::dashboard))
        .route("/campaigns", get(clipper::list_active_campaigns))
        .route(
            "/campaigns/{id}/participate",
            post(clipper::participate),
        )
        .route("/participations", get(clipper::my_participations))
        .layer(middleware::from_fn(|request, next| {
            require_role(request, next, UserRole::Clipper)
        }))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
