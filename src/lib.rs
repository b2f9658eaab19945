//! Core library for Textaid.  This module wires together request
//! validation, prompt construction, the outbound completion client and the
//! HTTP handlers.  Every terminal outcome is funneled through one envelope
//! shape and recorded in the audit log before the response is emitted.

mod config;

pub mod audit;
pub mod completion;
pub mod error;
pub mod prompt;
pub mod request;

pub use config::AppConfig;

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::audit::{AuditLog, LogRecord, UNKNOWN_CALLER};
use crate::completion::CompletionClient;
use crate::error::AssistError;

/// Envelope returned for every terminal outcome.  Exactly one of `data`
/// (success) or `message` (error) is serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: EnvelopeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Unix epoch seconds at response generation.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

impl ResponseEnvelope {
    fn success(data: String) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data: Some(data),
            message: None,
            timestamp: Utc::now().timestamp(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            data: None,
            message: Some(message),
            timestamp: Utc::now().timestamp(),
        }
    }
}

/// Shared state handed to every handler.  Both members are cheap clones
/// over `Arc`-backed internals; no per-request state lives here.
#[derive(Clone)]
pub struct AppState {
    pub completion: CompletionClient,
    pub audit: AuditLog,
}

/// Construct state from an explicit configuration.
pub fn build_state(config: &AppConfig) -> AppState {
    let completion = CompletionClient::new(
        config.api_endpoint.clone(),
        config.api_key.clone(),
        config.upstream_timeout,
    );
    if completion.is_fallback() {
        tracing::info!("no completion credential configured; canned fallback active");
    }
    let audit = match config.log_file.as_deref() {
        Some(path) => AuditLog::open(path),
        None => {
            tracing::warn!("audit logging disabled: no log file configured");
            AuditLog::disabled()
        }
    };
    AppState { completion, audit }
}

/// Construct state from environment variables.  See `AppConfig::from_env`.
pub fn build_state_from_env() -> anyhow::Result<AppState> {
    Ok(build_state(&AppConfig::from_env()?))
}

/// Build the Axum router.  The CORS headers mirror the public contract:
/// every response carries the same allow-origin/method/header values, so
/// they are attached as response layers rather than per handler.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/assist",
            post(assist_handler)
                .options(preflight_handler)
                .fallback(method_not_allowed_handler),
        )
        .route("/healthz", get(healthz_handler))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .with_state(state)
}

/// Handler for `POST /assist`.  Runs the linear pipeline: decode and
/// validate, build the prompt, invoke the completion provider, format the
/// envelope.  The audit logger sees every terminal outcome before the
/// response leaves this function.
async fn assist_handler(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> axum::response::Response {
    let caller = caller_address(connect.as_ref());

    let payload = match request::decode_payload(&body) {
        Ok(payload) => payload,
        Err(err) => {
            audit_failure(&state, &caller, "unknown", 0, &err);
            return respond_with_error(&err);
        }
    };
    let action_label = payload.action_label().to_string();
    let text_chars = payload.text_chars();

    let validated = match request::validate(&payload) {
        Ok(validated) => validated,
        Err(err) => {
            audit_failure(&state, &caller, &action_label, text_chars, &err);
            return respond_with_error(&err);
        }
    };

    let prompt = prompt::build_prompt(validated.action, &validated.text);
    match state.completion.complete(&prompt).await {
        Ok(completion) => {
            state.audit.append(&LogRecord {
                caller: &caller,
                action: validated.action.as_str(),
                text_chars,
                outcome: "success",
            });
            tracing::info!(action = %validated.action, chars = text_chars, "request completed");
            (
                StatusCode::OK,
                Json(ResponseEnvelope::success(completion.text)),
            )
                .into_response()
        }
        Err(err) => {
            audit_failure(&state, &caller, validated.action.as_str(), text_chars, &err);
            tracing::warn!(action = %validated.action, error = %err, "request failed");
            respond_with_error(&err)
        }
    }
}

/// CORS preflight.  The allow-* headers are attached by the response
/// layers; the body is intentionally empty.
async fn preflight_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
    )
}

/// Any non-POST, non-OPTIONS method on the assist endpoint.
async fn method_not_allowed_handler(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
) -> axum::response::Response {
    let caller = caller_address(connect.as_ref());
    let err = AssistError::MethodNotAllowed;
    audit_failure(&state, &caller, "unknown", 0, &err);
    respond_with_error(&err)
}

/// Simple health endpoint for container readiness / liveness checks.
async fn healthz_handler(State(state): State<AppState>) -> axum::response::Response {
    let json = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "fallback": state.completion.is_fallback(),
    });
    (StatusCode::OK, Json(json)).into_response()
}

fn caller_address(connect: Option<&ConnectInfo<SocketAddr>>) -> String {
    connect
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| UNKNOWN_CALLER.to_string())
}

fn audit_failure(state: &AppState, caller: &str, action: &str, text_chars: usize, err: &AssistError) {
    let outcome = format!("error: {}", err);
    state.audit.append(&LogRecord {
        caller,
        action,
        text_chars,
        outcome: &outcome,
    });
}

fn respond_with_error(err: &AssistError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ResponseEnvelope::error(err.to_string()))).into_response()
}
