// Common test utilities and helper structs
// Shared across all test files to avoid duplication

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tower::util::ServiceExt;
use uuid::Uuid;

use clippers_backend::{
    app::AppState,
    app_config::{AppConfig, Environment},
    build_router,
    db::{self, create_diesel_pool, DieselDatabaseConfig, DieselPool},
    services::{JwtConfig, JwtService},
};

/// Generate a unique email for test isolation
pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, Uuid::new_v4().simple())
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub diesel_pool: DieselPool,
    pub jwt_service: Arc<JwtService>,
}

impl TestApp {
    /// Send a POST request
    pub fn post(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "POST", uri)
    }

    /// Send a GET request
    pub fn get(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "GET", uri)
    }

    /// Send a PATCH request
    pub fn patch(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "PATCH", uri)
    }

    /// Send a DELETE request
    pub fn delete(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "DELETE", uri)
    }

    /// Send an OPTIONS request
    pub fn options(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "OPTIONS", uri)
    }
}

/// Test request builder
pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: String,
    uri: String,
    body: Option<Vec<u8>>,
    bearer: Option<String>,
    headers: Vec<(String, String)>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &str, uri: &str) -> Self {
        Self {
            app,
            method: method.to_string(),
            uri: uri.to_string(),
            body: None,
            bearer: None,
            headers: Vec::new(),
        }
    }

    /// Add JSON body to request
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_vec(body).unwrap());
        self
    }

    /// Add a bearer token to the Authorization header
    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    /// Add an arbitrary header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Send the request
    pub async fn send(self) -> TestResponse {
        let mut builder = Request::builder().method(self.method.as_str()).uri(self.uri);

        if let Some(token) = &self.bearer {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let request = match self.body {
            Some(bytes) => builder
                .header("content-type", "application/json")
                .body(Body::from(bytes))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.app.clone().oneshot(request).await.unwrap();

        TestResponse { response }
    }
}

/// Test response wrapper
pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    /// Get status code
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Get a response header as text
    pub fn header(&self, name: &str) -> Option<String> {
        self.response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    }

    /// Parse JSON response
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Get response body as text
    pub async fn text(self) -> String {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}

/// Test configuration with everything except the database URL fixed
pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        bind_address: "127.0.0.1:0".to_string(),
        port: 0,
        environment: Environment::Test,
        database_url: database_url.to_string(),
        database_max_connections: 5,
        database_min_connections: 1,
        database_connect_timeout: 5,
        database_idle_timeout: 60,
        database_max_lifetime: 300,
        jwt_secret: "integration-test-secret-at-least-32-chars!".to_string(),
        session_token_expiry: 604800,
        jwt_audience: "test.clippers.app".to_string(),
        jwt_issuer: "test.clippers.app".to_string(),
        cors_allowed_origins: vec!["*".to_string()],
    }
}

static MIGRATIONS_APPLIED: OnceCell<()> = OnceCell::const_new();

/// Setup test application with all dependencies
///
/// Returns None when DATABASE_URL is not set so callers can skip instead of
/// failing in environments without a database.
pub async fn setup_test_app() -> Option<TestApp> {
    // Load test environment
    dotenv::dotenv().ok();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        },
    };

    // Tests share one schema; apply migrations exactly once per process
    MIGRATIONS_APPLIED
        .get_or_init(|| async {
            db::run_migrations(&database_url)
                .await
                .expect("Failed to run migrations for tests");
        })
        .await;

    let config = test_config(&database_url);

    // Initialize test database pool
    let db_config = DieselDatabaseConfig::from_app_config(&config);
    let diesel_pool = create_diesel_pool(db_config)
        .await
        .expect("Failed to create test database pool");

    // Initialize services
    let jwt_service = Arc::new(JwtService::new(JwtConfig::from_app_config(&config)));

    // Create app state
    let app_state = AppState {
        config: Arc::new(config),
        diesel_pool: diesel_pool.clone(),
        jwt_service: jwt_service.clone(),
        max_connections: 5,
    };

    let app = build_router(app_state);

    Some(TestApp {
        app,
        diesel_pool,
        jwt_service,
    })
}

/// Test app over a pool that never connects, for routing and middleware tests
/// that must run without a database
pub fn app_without_database() -> TestApp {
    use diesel_async::pooled_connection::AsyncDieselConnectionManager;
    use diesel_async::AsyncPgConnection;

    // .invalid never resolves, so anything that does touch the pool fails fast
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(
        "postgresql://db.invalid:5432/clippers",
    );
    let diesel_pool = bb8::Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_secs(1))
        .build_unchecked(manager);

    let config = test_config("postgresql://db.invalid:5432/clippers");
    let jwt_service = Arc::new(JwtService::new(JwtConfig::from_app_config(&config)));

    let app_state = AppState {
        config: Arc::new(config),
        diesel_pool: diesel_pool.clone(),
        jwt_service: jwt_service.clone(),
        max_connections: 1,
    };

    TestApp {
        app: build_router(app_state),
        diesel_pool,
        jwt_service,
    }
}

/// Register an account through the API and return the response body
///
/// Asserts the registration succeeded so callers can rely on the token and
/// verification_token fields being present.
pub async fn register_account(app: &TestApp, email: &str, role: &str) -> serde_json::Value {
    let response = app
        .post("/auth/register")
        .json(&serde_json::json!({
            "email": email,
            "password": "secret1",
            "role": role,
        }))
        .send()
        .await;

    let status = response.status();
    let body: serde_json::Value = response.json().await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "registration of {} failed: {}",
        email,
        body
    );

    body
}

/// Register an account and return just its session token
pub async fn register_and_token(app: &TestApp, email: &str, role: &str) -> String {
    let body = register_account(app, email, role).await;
    body["token"].as_str().expect("token missing").to_string()
}

/// Create a campaign as the given brand and return the campaign body
pub async fn create_campaign(app: &TestApp, token: &str, name: &str) -> serde_json::Value {
    let response = app
        .post("/brand/campaigns")
        .bearer(token)
        .json(&serde_json::json!({
            "name": name,
            "description": "A campaign description long enough to pass",
            "rules": "Follow the brief",
            "budget": 250.0,
        }))
        .send()
        .await;

    let status = response.status();
    let body: serde_json::Value = response.json().await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "campaign create failed: {}",
        body
    );

    body["campaign"].clone()
}
