use std::sync::Arc;

use axum::{middleware, routing::get, routing::post, Extension, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use product_api_rust::database::manager::StoreManager;
use product_api_rust::handlers;
use product_api_rust::middleware::jwt_auth_middleware;
use product_api_rust::services::ProductRegistry;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = product_api_rust::config::config();
    tracing::info!("Starting Product API in {:?} mode", config.environment);

    // Create and seed the credential store before accepting traffic
    StoreManager::pool()
        .await
        .unwrap_or_else(|e| panic!("failed to initialize credential store: {}", e));

    let registry = Arc::new(ProductRegistry::new());
    let app = app(registry);

    // Allow tests or deployments to override port via env
    let port = std::env::var("PRODUCT_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Product API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(registry: Arc<ProductRegistry>) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .merge(auth_public_routes())
        // Protected API
        .merge(product_routes(registry))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use handlers::public::auth;

    Router::new().route("/auth/login", post(auth::login_post))
}

fn product_routes(registry: Arc<ProductRegistry>) -> Router {
    use handlers::protected::products;

    Router::new()
        .route(
            "/api/products",
            get(products::products_get).post(products::products_post),
        )
        .layer(middleware::from_fn(jwt_auth_middleware))
        .layer(Extension(registry))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Product API (Rust)",
        "version": version,
        "description": "JWT-gated product registry built with Rust (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "login": "POST /auth/login (public - token acquisition)",
            "products": "GET|POST /api/products (protected)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match StoreManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "credential_store": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "credential_store_error": e.to_string()
            })),
        ),
    }
}
