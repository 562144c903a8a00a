// Application state and configuration
use std::sync::Arc;

use crate::{app_config::AppConfig, db::DieselPool, services::JwtService};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub diesel_pool: DieselPool,
    pub jwt_service: Arc<JwtService>,
    pub max_connections: u32,
}
