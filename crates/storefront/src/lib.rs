//! Multivendor Storefront library.
//!
//! The shopper-facing front end of the marketplace as a library, so that the
//! binary and the integration tests build the same router.
//!
//! # Layers
//!
//! - [`storage`] - durable client-side key/value storage
//! - [`session`] - the shopper's session, split into reader and writer
//! - [`api`] - HTTP clients for the auth, catalog and shopping services
//! - [`views`] - per-screen controllers holding local state
//! - [`routes`] - axum handlers that drive views and render templates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod views;

use axum::{Router, http::Uri, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::state::AppState;

/// Build the storefront router with its tracing layer.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backends.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::storage::MemoryStorage;

    /// Router over backends that refuse every connection.
    fn router() -> Router {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "AUTH_SERVICE_URL" | "CATALOG_SERVICE_URL" | "SHOPPING_SERVICE_URL" => {
                Some("http://127.0.0.1:9/".to_string())
            }
            _ => None,
        })
        .unwrap();
        let state = AppState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap();
        app(state)
    }

    async fn body(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, "ok");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = router()
            .oneshot(Request::get("/shop").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_guest_home_links_to_login() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("href=\"/login\""));
        assert!(html.contains("href=\"/register\""));
    }

    #[tokio::test]
    async fn test_unreachable_backend_renders_network_message() {
        let response = router()
            .oneshot(Request::get("/all-products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains(crate::api::NETWORK_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_logout_redirects_home() {
        let response = router()
            .oneshot(Request::post("/logout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_malformed_quantity_is_a_bad_request() {
        let request = Request::post("/all-products/cart")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("product_id=p1&quantity=lots"))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stylesheet_is_served() {
        let response = router()
            .oneshot(Request::get("/static/style.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
