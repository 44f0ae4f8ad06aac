//! # MedAssist API Server Logic
//!
//! File: cli/src/commands/srv/server_logic.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The Axum application behind `medassist srv`. Every route is a thin,
//! stateless adapter over the engines; the only shared state is the
//! read-only reference data (and report template) behind an `Arc`.
//!
//! | Method | Path              | Body                      | Response                         |
//! |--------|-------------------|---------------------------|----------------------------------|
//! | GET    | `/api/health`     |                           | `{status, data_version}`         |
//! | GET    | `/api/symptoms`   |                           | symptom labels                   |
//! | GET    | `/api/conditions` |                           | condition records                |
//! | POST   | `/api/diagnose`   | `{symptoms: [..]}`        | match result                     |
//! | POST   | `/api/chat`       | `{message}`               | `{reply}`                        |
//! | POST   | `/api/report`     | `{symptoms: [..]}`        | `text/plain` attachment          |
//!
//! Failures are returned as `{error}` JSON: 422 for an empty symptom
//! selection, the extractor's status (400, 415 or 422) for a body that is not
//! the expected JSON, 500 for anything else.
//!
//! ## Startup
//!
//! 1. Find a free port, starting from the configured one.
//! 2. Build the router with tracing and (optionally) permissive CORS.
//! 3. Serve until Ctrl+C or SIGTERM, then shut down gracefully.
//!
use super::config::ServerConfig;
use crate::commands::diagnose::{self, report};
use crate::core::error::{MedassistError, Result};
use crate::engine::matcher::{self, MatchResult};
use crate::engine::reference::{Condition, ReferenceData, Symptom};
use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, warn, Level};

const MAX_PORT_ATTEMPTS: u8 = 10;

/// Read-only data shared by all requests.
#[derive(Debug)]
pub struct AppState {
    pub reference: ReferenceData,
    pub report_template: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    data_version: u32,
}

#[derive(Debug, Deserialize)]
struct SymptomsRequest {
    symptoms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Error returned by handlers, rendered as `{error}` JSON.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<MedassistError> for ApiError {
    fn from(err: MedassistError) -> Self {
        let status = match err {
            MedassistError::EmptySymptomSelection => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<MedassistError>() {
            Some(MedassistError::EmptySymptomSelection) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            _ => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("{:#}", err),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.message);
        }
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Binds, prints the banner and serves until a shutdown signal arrives.
pub async fn run_server(config: ServerConfig, state: Arc<AppState>) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    let app = create_app(state.clone(), config.enable_cors);

    println!("\n=================================================================");
    println!("🩺 MedAssist API");
    println!("🌐 Local URL:         http://{}", addr);
    println!(
        "📋 Catalogue:         {} conditions, {} symptoms",
        state.reference.catalogue.conditions.len(),
        state.reference.catalogue.symptoms.len()
    );
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting API server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Builds the router. Separate from `run_server` so tests can drive it in-process.
pub fn create_app(state: Arc<AppState>, enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/api/health", get(health))
        .route("/api/symptoms", get(list_symptoms))
        .route("/api/conditions", get(list_conditions))
        .route("/api/diagnose", post(diagnose_symptoms))
        .route("/api/chat", post(chat))
        .route("/api/report", post(download_report))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(trace_layer).layer(cors_layer))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        data_version: state.reference.version,
    })
}

async fn list_symptoms(State(state): State<Arc<AppState>>) -> Json<Vec<Symptom>> {
    Json(state.reference.catalogue.symptoms.clone())
}

async fn list_conditions(State(state): State<Arc<AppState>>) -> Json<Vec<Condition>> {
    Json(state.reference.catalogue.conditions.clone())
}

async fn diagnose_symptoms(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SymptomsRequest>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let Json(request) = payload?;
    let symptoms = diagnose::collect_symptoms(&request.symptoms, &state.reference.catalogue);
    let result = run_match(&symptoms, &state.reference)?;
    Ok(Json(result).into_response())
}

async fn chat(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    let selection = state.reference.chat.select(&request.message);
    debug!("Reply chosen by {}", selection.describe());
    Ok(Json(ChatResponse {
        reply: selection.text().to_string(),
    }))
}

async fn download_report(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SymptomsRequest>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let Json(request) = payload?;
    let symptoms = diagnose::collect_symptoms(&request.symptoms, &state.reference.catalogue);
    let result = run_match(&symptoms, &state.reference)?;
    let now = Local::now();
    let content = report::render_report(&state.report_template, &symptoms, &result, now.date_naive())?;
    let disposition = format!("attachment; filename=\"{}\"", report::report_file_name(now));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}

fn run_match<'a>(
    symptoms: &[Symptom],
    reference: &'a ReferenceData,
) -> std::result::Result<MatchResult<'a>, MedassistError> {
    let selected: BTreeSet<Symptom> = symptoms.iter().cloned().collect();
    matcher::match_condition(&selected, &reference.catalogue)
}

/// Completes on Ctrl+C or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Tries `start_port` and the following ports until one can be bound.
async fn find_available_port(
    host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, using available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(port) => port,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        host,
        start_port,
        max_attempts
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::net::{IpAddr, Ipv4Addr};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState {
            reference: ReferenceData::builtin().unwrap(),
            report_template: report::BUILTIN_TEMPLATE.to_string(),
        };
        create_app(Arc::new(state), true)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "ok", "data_version": 1})
        );
    }

    #[tokio::test]
    async fn test_symptoms_and_conditions() {
        let response = app().oneshot(get_request("/api/symptoms")).await.unwrap();
        let symptoms = body_json(response).await;
        assert_eq!(symptoms.as_array().unwrap().len(), 28);
        assert_eq!(symptoms[0], "Fever");

        let response = app().oneshot(get_request("/api/conditions")).await.unwrap();
        let conditions = body_json(response).await;
        assert_eq!(conditions[0]["name"], "COVID-19");
        assert_eq!(conditions[1]["severity"], "mild");
    }

    #[tokio::test]
    async fn test_diagnose_reports_base_probability() {
        let request = post_json(
            "/api/diagnose",
            json!({"symptoms": ["Fever", "Cough", "Loss of taste"]}),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["condition"]["name"], "COVID-19");
        assert_eq!(body["confidence"], 0.85);
        assert_eq!(body["matched_symptom_count"], 3);
        assert_eq!(body["total_symptom_count"], 5);
        assert_eq!(body["defaulted"], false);
    }

    #[tokio::test]
    async fn test_diagnose_empty_selection_is_422() {
        let request = post_json("/api/diagnose", json!({"symptoms": []}));
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("No symptoms selected"));
    }

    #[tokio::test]
    async fn test_diagnose_defaults_without_overlap() {
        let request = post_json("/api/diagnose", json!({"symptoms": ["Rash"]}));
        let body = body_json(app().oneshot(request).await.unwrap()).await;
        assert_eq!(body["condition"]["name"], "Common Cold");
        assert_eq!(body["defaulted"], true);
    }

    #[tokio::test]
    async fn test_chat_reply() {
        let request = post_json("/api/chat", json!({"message": "Any DIET advice?"}));
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["reply"].as_str().unwrap().starts_with("A healthy diet"));
    }

    #[tokio::test]
    async fn test_report_is_text_attachment() {
        let request = post_json("/api/report", json!({"symptoms": ["Fever", "Chills"]}));
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"medical-report-"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("PREDICTED CONDITION: Influenza"));
        assert!(text.contains("• Fever\n• Chills\n"));
    }

    #[tokio::test]
    async fn test_malformed_bodies_get_json_errors() {
        let wrong_field = post_json("/api/diagnose", json!({"symptom": ["Fever"]}));
        let response = app().oneshot(wrong_field).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("missing field `symptoms`"));

        for uri in ["/api/diagnose", "/api/chat", "/api/report"] {
            let not_json = Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("not json"))
                .unwrap();
            let response = app().oneshot(not_json).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            let body = body_json(response).await;
            assert!(body["error"].is_string(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_missing_content_type_gets_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .body(Body::from(r#"{"message": "hi"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_report_empty_selection_is_422() {
        let request = post_json("/api/report", json!({"symptoms": []}));
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_api_error_status_mapping() {
        let err: ApiError = MedassistError::EmptySymptomSelection.into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = MedassistError::EmptyCatalogue.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "disk on fire");
    }

    #[tokio::test]
    async fn test_find_available_port_start_is_free() -> Result<()> {
        let host: IpAddr = Ipv4Addr::LOCALHOST.into();
        let addr = find_available_port(host, 50000, 5).await?;
        assert_eq!(addr.port(), 50000);
        assert_eq!(addr.ip(), host);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_start_occupied() -> Result<()> {
        let host: IpAddr = Ipv4Addr::LOCALHOST.into();
        let start_port = 51000;
        let _listener = TcpListener::bind(SocketAddr::new(host, start_port)).await?;

        let addr = find_available_port(host, start_port, 5).await?;
        assert!(addr.port() > start_port);
        assert!(addr.port() < start_port + 5);
        Ok(())
    }
}
