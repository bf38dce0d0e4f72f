//! Axum application builder.
//!
//! Configures routes, CORS and request logging for the server.

use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::controller;
use crate::state::AppState;

/// Methods browsers may use cross-origin.
pub const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Create the Axum application with all routes.
pub fn create_app(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([cors_origin]))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            "/notes",
            get(controller::find_all).post(controller::create_note),
        )
        .route(
            "/notes/",
            get(controller::find_all).post(controller::create_note),
        )
        .route(
            "/notes/{id}",
            get(controller::find_one)
                .put(controller::update_note)
                .delete(controller::delete_note),
        )
        .route("/health", get(controller::health))
        .layer(cors)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(req: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;

    let code = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if code.is_server_error() {
        warn!(
            "event=http_request module=server status=error method={method} path={path} code={} duration_ms={duration_ms}",
            code.as_u16()
        );
    } else {
        info!(
            "event=http_request module=server status=ok method={method} path={path} code={} duration_ms={duration_ms}",
            code.as_u16()
        );
    }
    response
}
