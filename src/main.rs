use axum::{middleware as axum_middleware, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use urbantree_api::database::{bootstrap, manager::DatabaseManager};
use urbantree_api::handlers;
use urbantree_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "urbantree_api=info,tower_http=info".into()),
        )
        .init();

    let config = urbantree_api::config::config();
    tracing::info!("Starting Urban Tree API in {:?} mode", config.environment);

    // Best effort: the server still starts when the database is down, with
    // /health reporting degraded until it comes back.
    match DatabaseManager::pool().await {
        Ok(pool) => {
            if let Err(e) = bootstrap::ensure_schema(&pool).await {
                tracing::warn!("schema bootstrap failed: {}", e);
            }
        }
        Err(e) => tracing::warn!("database unavailable at startup: {}", e),
    }

    let app = app();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Urban Tree API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API behind bearer-token middleware
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    use axum::routing::post;
    use handlers::{public::auth, sensor::upload};

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // CSV ingestion reauthenticates per request from form fields
        .route("/upload", post(upload::post))
}

fn protected_routes() -> Router {
    use axum::routing::{patch, post};
    use handlers::{protected::auth, protected::profiles, protected::users, sensor::data};

    Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/profile/me", get(auth::me))
        .route("/api/profile/role/:user_id", patch(auth::update_role))
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/:id",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .route("/api/profiles", get(profiles::list))
        .route("/api/profiles/:id", get(profiles::get))
        .route("/api/treedata", get(data::get))
        .layer(axum_middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Urban Tree API",
        "version": version,
        "description": "Tree-sensor data platform backend",
        "endpoints": {
            "health": "/health (public)",
            "auth": "/auth/register, /auth/login (public)",
            "upload": "/upload (public - per-request credentials)",
            "profile": "/api/profile/me, /api/profile/role/:user_id (protected)",
            "users": "/api/users[/:id] (protected)",
            "profiles": "/api/profiles[/:id] (protected)",
            "treedata": "/api/treedata?limit=N (protected)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
