//! Axum HTTP boundary for the reflection service.
//!
//! One write endpoint plus a liveness probe, with the gateway hygiene the
//! rest of our services carry: request body size limit, request timeout,
//! and cross-origin headers on every response so the web and mobile
//! clients can call it directly.

mod handlers;

use handlers::{handle_health, handle_method_not_allowed, handle_preflight, handle_reflect};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    Router, middleware,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::Config;
use crate::reflection::ReflectionService;

/// Maximum request body size (64KB) — journal entries are text, not uploads.
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s) — prevents slow-loris attacks.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Headers the browser clients send (hosted-auth tokens included).
const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Shared state for all axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReflectionService>,
    /// Whether an external provider credential was configured at startup.
    pub external_strategy: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            service: Arc::new(ReflectionService::new(config)),
            external_strategy: config.external_strategy_enabled(),
        }
    }

    pub fn with_service(service: ReflectionService, external_strategy: bool) -> Self {
        Self {
            service: Arc::new(service),
            external_strategy,
        }
    }
}

/// Append permissive cross-origin headers to every response. Done in a
/// middleware rather than a per-handler helper so 405 and error paths get
/// them too; pre-flight is answered by an explicit OPTIONS route because
/// the clients expect an empty 204.
async fn apply_cors(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    response
}

/// Build the router. Exposed so integration tests can drive it directly.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route(
            "/reflect",
            post(handle_reflect)
                .options(handle_preflight)
                .fallback(handle_method_not_allowed),
        )
        .with_state(state)
        .layer(middleware::from_fn(apply_cors))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Bind and run the HTTP gateway.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_gateway_with_listener(listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let state = AppState::from_config(&config);
    tracing::info!(
        addr = %listener.local_addr()?,
        external_strategy = state.external_strategy,
        "reflectd listening"
    );

    let app = build_app(state);
    axum::serve(listener, app).await?;

    Ok(())
}
