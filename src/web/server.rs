use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::cors::{CorsLayer, Any};

use super::api::{AppState, create_api_router};

/// The full application: JSON API under `/api`, the home page at `/` and
/// any other static asset from `static_dir`.
pub fn create_app(state: AppState, static_dir: &str) -> Router {
    let api_router = create_api_router(state);
    let home_page = Path::new(static_dir).join("home.html");

    Router::new()
        .nest("/api", api_router)
        .route_service("/", ServeFile::new(home_page))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

pub async fn start_web_server<F>(
    state: AppState,
    static_dir: &str,
    port: u16,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_app(state, static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Web server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| format!("Server error: {}", e).into())
}
