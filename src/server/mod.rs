//! # HTTP Server for Framing Photos and Collecting Feedback
//!
//! Renders framed photos and backs the feedback widget and its dashboard.
//!
//! ## Usage
//!
//! ```bash
//! marco serve --listen 0.0.0.0:8080 --data feedback.json
//! ```
//!
//! ## Routes
//!
//! | Method | Path | |
//! |--------|------|-|
//! | GET | `/api/frames` | frame catalog |
//! | POST | `/api/frames/render` | frame an image URL, PNG out |
//! | POST | `/api/frames/upload` | frame an uploaded image, PNG out |
//! | POST | `/api/frames/hit-test` | does a click hit the Download control |
//! | POST | `/api/feedback` | submit the feedback form |
//! | GET | `/api/feedback` | submissions, newest first |
//! | GET | `/api/feedback/analytics` | dashboard aggregates |

pub mod handlers;
mod state;

pub use handlers::frames::HIT_REGION_HEADER;
pub use state::AppState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::MarcoError;

/// Uploads above this size are rejected; matches the download cap.
pub const UPLOAD_LIMIT: usize = crate::render::loader::MAX_IMAGE_BYTES;

/// Build the application router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frame API
        .route("/api/frames", get(handlers::frames::list))
        .route("/api/frames/render", post(handlers::frames::render))
        .route(
            "/api/frames/upload",
            post(handlers::frames::upload).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
        .route("/api/frames/hit-test", post(handlers::frames::hit_test))
        // Feedback API
        .route(
            "/api/feedback",
            post(handlers::feedback::submit).get(handlers::feedback::list),
        )
        .route("/api/feedback/analytics", get(handlers::feedback::analytics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use marco::config::ServerConfig;
/// use marco::server::serve;
///
/// # async fn example() -> Result<(), marco::error::MarcoError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), MarcoError> {
    let state = Arc::new(AppState::from_config(&config)?);
    let frames = state.catalog().len();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| MarcoError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;

    tracing::info!(
        listen = %config.listen_addr,
        frames,
        store = ?config.data_path,
        notify = ?config.notify_url,
        "marco server started"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| MarcoError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
