use std::sync::Arc;

use axum::{
    body::Body,
    http::HeaderName,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::credentials::AdmissionEngine;

mod handlers;
mod types;

pub use handlers::{handle_webhook, health_check, method_not_allowed};
pub use types::{ErrorResponse, WebhookPayload, WebhookResponse};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub fn create_router(engine: Arc<AdmissionEngine>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // The gateway may be pointed at any path; every path but /health is the webhook.
        .route("/", post(handle_webhook).fallback(method_not_allowed))
        .route("/*path", post(handle_webhook).fallback(method_not_allowed))
        .with_state(engine)
        .layer(middleware::from_fn(set_request_id))
        .layer(TraceLayer::new_for_http())
}

async fn set_request_id(
    mut request: axum::http::Request<Body>,
    next: Next,
) -> axum::response::Response {
    let request_id = Uuid::new_v4().to_string();

    if let Ok(header_value) = axum::http::HeaderValue::from_str(&request_id) {
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), header_value);
    }

    let mut response = next.run(request).await;

    if !response.headers().contains_key(&REQUEST_ID_HEADER) {
        if let Ok(header_value) = axum::http::HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), header_value);
        }
    }

    response
}
