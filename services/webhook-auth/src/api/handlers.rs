use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use crate::credentials::{AdmissionEngine, AdmissionError};

use super::types::{ErrorResponse, WebhookPayload, WebhookResponse};

type ApiError = (StatusCode, Json<ErrorResponse>);

#[instrument(skip(engine, body))]
pub async fn handle_webhook(
    State(engine): State<Arc<AdmissionEngine>>,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), ApiError> {
    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|err| {
        debug!(error = %err, "rejecting undecodable webhook body");
        client_error(StatusCode::BAD_REQUEST, "Invalid JSON", "INVALID_JSON")
    })?;

    let request = payload.to_admission_request();
    let verdict = engine
        .decide(&request)
        .map_err(map_admission_error)?;

    let status = if verdict.admitted {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    };

    info!(
        action = %request.action,
        admitted = verdict.admitted,
        "webhook handled"
    );

    Ok((
        status,
        Json(WebhookResponse {
            stream_key: verdict.stream_key,
        }),
    ))
}

pub async fn method_not_allowed() -> ApiError {
    client_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "Only POST method is accepted",
        "METHOD_NOT_ALLOWED",
    )
}

#[instrument(skip(engine))]
pub async fn health_check(State(engine): State<Arc<AdmissionEngine>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "stream-gate-webhook-auth",
        "stream_keys": engine.mapping().len()
    }))
}

fn map_admission_error(err: AdmissionError) -> ApiError {
    match err {
        AdmissionError::UnrecognizedAction(ref action) => {
            warn!(%action, "webhook carried an unrecognized action");
            client_error(StatusCode::BAD_REQUEST, "Invalid action", "INVALID_ACTION")
        }
    }
}

fn client_error(status: StatusCode, error: &str, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
        }),
    )
}
