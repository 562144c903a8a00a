use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clippers_backend::{app_config::AppConfig, build_router, db, initialize_app_state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clippers_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Load configuration eagerly so a bad environment fails before anything binds
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("✗ Configuration error: {}", e);
            error!("Configuration error: {}", e);
            return Err(anyhow::anyhow!(e));
        },
    };

    let bind_address = config.bind_address.clone();
    println!("=== STARTING CLIPPERS BACKEND API ===");
    info!("Starting Clippers Backend API on {}", bind_address);

    // Initialize database pool and services
    println!("Initializing database pool...");
    println!(
        "Database URL: {}",
        db::mask_connection_string(&config.database_url)
    );

    let state = match initialize_app_state(config).await {
        Ok(state) => {
            println!("✓ Database connection pool initialized successfully");
            info!("Database connection pool initialized successfully");
            state
        },
        Err(e) => {
            println!("✗ Failed to initialize application state: {}", e);
            error!("Failed to initialize application state: {}", e);
            return Err(anyhow::anyhow!("Application initialization failed: {}", e));
        },
    };

    let app = build_router(state);

    println!("Starting HTTP server on {}...", bind_address);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
