// crates/component-gateway-mcp/src/server.rs
// ============================================================================
// Module: MCP HTTP Server
// Description: JSON-RPC over HTTP front end with CORS and scoped endpoints.
// Purpose: Expose the component gateway to MCP clients.
// Dependencies: axum, tokio
// ============================================================================

//! ## Overview
//! Every path is served by one fallback handler so CORS headers are applied
//! on every outcome, including 404, 405, and 413. OPTIONS short-circuits
//! before any JSON-RPC processing. JSON-RPC failures use HTTP 200;
//! notifications are acknowledged with HTTP 202 and an empty body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Body;
use axum::body::to_bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::ALLOW;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use http_body_util::LengthLimitError;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;

use crate::audit::GatewayAuditSink;
use crate::audit::McpAuditEvent;
use crate::audit::McpAuditEventParams;
use crate::audit::audit_sink_from_config;
use crate::config::GatewayConfig;
use crate::gateway::Gateway;
use crate::gateway::RequestContext;
use crate::protocol::ErrorCode;
use crate::protocol::JsonRpcResponse;
use crate::protocol::RpcError;
use crate::protocol::parse_request;
use crate::resolver::ComponentResolver;
use crate::scope::READONLY_HEADER;
use crate::scope::TOOLSETS_HEADER;
use crate::scope::ToolScope;
use crate::telemetry::GatewayMetricEvent;
use crate::telemetry::GatewayMetrics;
use crate::telemetry::McpMethod;
use crate::telemetry::McpOutcome;
use crate::telemetry::latency_bucket_ms;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Session header exchanged with clients.
pub const SESSION_HEADER: &str = "mcp-session-id";
/// Methods accepted on gateway endpoints.
const ALLOWED_METHODS: &str = "POST, OPTIONS";
/// Request headers clients may send cross-origin.
const ALLOWED_HEADERS: &str = "Content-Type, Mcp-Session-Id, X-MCP-Toolsets, X-MCP-Readonly";
/// Response headers exposed to cross-origin clients.
const EXPOSED_HEADERS: &str = "Mcp-Session-Id";

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Server configuration.
    config: GatewayConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl McpServer {
    /// Builds a server from configuration with the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when initialization fails.
    pub fn from_config(config: GatewayConfig) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let audit = audit_sink_from_config(&config.audit)
            .map_err(|err| McpServerError::Init(format!("audit sink: {err}")))?;
        let gateway = Gateway::from_config(&config, Arc::clone(&audit))
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        Ok(Self::assemble(config, gateway, audit, Arc::new(NoopMetrics)))
    }

    /// Builds a server with explicit resolver and observability sinks.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when initialization fails.
    pub fn with_components(
        config: GatewayConfig,
        resolver: &dyn ComponentResolver,
        audit: Arc<dyn GatewayAuditSink>,
        metrics: Arc<dyn GatewayMetrics>,
    ) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let gateway = Gateway::with_resolver(&config, resolver, Arc::clone(&audit))
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        Ok(Self::assemble(config, gateway, audit, metrics))
    }

    /// Wires shared state.
    fn assemble(
        config: GatewayConfig,
        gateway: Gateway,
        audit: Arc<dyn GatewayAuditSink>,
        metrics: Arc<dyn GatewayMetrics>,
    ) -> Self {
        let state = Arc::new(ServerState {
            gateway,
            audit,
            metrics,
            max_body_bytes: config.server.max_body_bytes,
        });
        Self {
            config,
            state,
        }
    }

    /// Returns the axum router serving every gateway endpoint.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new().fallback(handle_http).with_state(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        let addr = self
            .config
            .server
            .bind_addr()
            .map_err(|err| McpServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
        self.serve_listener(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the server fails.
    pub async fn serve_listener<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), McpServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|_| McpServerError::Transport("http server failed".to_string()))
    }
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

// ============================================================================
// SECTION: HTTP Handling
// ============================================================================

/// Shared server state for HTTP handlers.
struct ServerState {
    /// Gateway core.
    gateway: Gateway,
    /// Request audit sink.
    audit: Arc<dyn GatewayAuditSink>,
    /// Request metrics sink.
    metrics: Arc<dyn GatewayMetrics>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

/// Observation recorded once per JSON-RPC exchange.
struct Observation {
    /// Request identifier when known.
    request_id: Option<String>,
    /// Method classification.
    method: McpMethod,
    /// Exposed tool name for `tools/call`.
    tool: Option<String>,
    /// HTTP status returned.
    status: StatusCode,
    /// JSON-RPC error code when present.
    error_code: Option<i64>,
    /// Request body size in bytes.
    request_bytes: usize,
    /// Response body size in bytes.
    response_bytes: usize,
    /// Scope label.
    scope: String,
    /// Whether a session id was presented.
    has_session: bool,
}

impl ServerState {
    /// Records audit and metric events for one exchange.
    fn observe(&self, observation: Observation, started: Instant) {
        let outcome =
            if observation.error_code.is_some() { McpOutcome::Error } else { McpOutcome::Ok };
        let error_kind =
            observation.error_code.and_then(ErrorCode::from_code).map(ErrorCode::kind);
        let metric = GatewayMetricEvent {
            method: observation.method,
            tool: observation.tool.clone(),
            outcome,
            error_code: observation.error_code,
            request_bytes: observation.request_bytes,
            response_bytes: observation.response_bytes,
        };
        self.metrics.record_request(metric.clone());
        let latency = started.elapsed();
        self.metrics.record_latency(metric, latency);
        self.audit.record(&McpAuditEvent::new(McpAuditEventParams {
            request_id: observation.request_id,
            method: observation.method,
            tool: observation.tool,
            outcome,
            http_status: observation.status.as_u16(),
            error_code: observation.error_code,
            error_kind,
            request_bytes: observation.request_bytes,
            response_bytes: observation.response_bytes,
            latency_bucket_ms: latency_bucket_ms(latency),
            scope: observation.scope,
            has_session: observation.has_session,
        }));
    }
}

/// Handles every HTTP request to the gateway.
async fn handle_http(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    if method == Method::OPTIONS {
        return preflight_response();
    }
    let Some(scope) = ToolScope::from_path(uri.path()) else {
        return not_found_response("unknown endpoint");
    };
    if let Some(component) = scope.component()
        && state.gateway.directory().get(component).is_none()
    {
        return not_found_response("unknown component");
    }
    if method != Method::POST {
        return method_not_allowed_response();
    }
    let started = Instant::now();
    let scope = scope
        .with_toolsets(header_str(&headers, TOOLSETS_HEADER))
        .with_readonly_header(header_str(&headers, READONLY_HEADER));
    let session_id = header_str(&headers, SESSION_HEADER).map(str::to_string);
    let mut observation = Observation {
        request_id: None,
        method: McpMethod::Invalid,
        tool: None,
        status: StatusCode::OK,
        error_code: None,
        request_bytes: 0,
        response_bytes: 0,
        scope: scope.label(),
        has_session: session_id.is_some(),
    };
    let bytes = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) => {
            let (status, message) = if exceeds_body_limit(&err) {
                (StatusCode::PAYLOAD_TOO_LARGE, "request body too large")
            } else {
                (StatusCode::BAD_REQUEST, "request body could not be read")
            };
            let envelope =
                JsonRpcResponse::failure(Value::Null, RpcError::invalid_request(message));
            observation.status = status;
            observation.error_code = envelope.error_code();
            return finish(&state, observation, started, envelope, None);
        }
    };
    observation.request_bytes = bytes.len();
    let request = match parse_request(&bytes) {
        Ok(request) => request,
        Err(rejected) => {
            let envelope = JsonRpcResponse::failure(rejected.id, rejected.error);
            observation.error_code = envelope.error_code();
            return finish(&state, observation, started, envelope, None);
        }
    };
    observation.request_id = request.id.as_ref().map(Value::to_string);
    let context = RequestContext {
        scope,
        session_id,
    };
    let outcome = state.gateway.handle(request, &context).await;
    observation.method = outcome.method;
    observation.tool = outcome.tool;
    let Some(envelope) = outcome.response else {
        observation.status = StatusCode::ACCEPTED;
        state.observe(observation, started);
        let mut response = StatusCode::ACCEPTED.into_response();
        apply_cors(&mut response);
        return response;
    };
    observation.error_code = envelope.error_code();
    finish(&state, observation, started, envelope, outcome.opened_session)
}

/// Renders a JSON-RPC envelope and records the exchange.
fn finish(
    state: &ServerState,
    mut observation: Observation,
    started: Instant,
    envelope: JsonRpcResponse,
    opened_session: Option<String>,
) -> Response {
    let payload = envelope.to_bytes();
    observation.response_bytes = payload.len();
    let status = observation.status;
    state.observe(observation, started);
    let mut response = json_response(status, payload);
    if let Some(session) = opened_session
        && let Ok(value) = HeaderValue::from_str(&session)
    {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

// ============================================================================
// SECTION: Response Helpers
// ============================================================================

/// Builds a JSON response with CORS headers.
fn json_response(status: StatusCode, payload: Vec<u8>) -> Response {
    let mut response = (status, payload).into_response();
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    apply_cors(&mut response);
    response
}

/// Answers a CORS preflight with no body.
fn preflight_response() -> Response {
    let mut response = StatusCode::OK.into_response();
    response.headers_mut().insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    apply_cors(&mut response);
    response
}

/// Answers a request for a path outside the gateway endpoints.
fn not_found_response(message: &str) -> Response {
    let payload = serde_json::to_vec(&json!({ "error": message })).unwrap_or_default();
    json_response(StatusCode::NOT_FOUND, payload)
}

/// Answers an HTTP method other than POST or OPTIONS.
fn method_not_allowed_response() -> Response {
    let mut response = StatusCode::METHOD_NOT_ALLOWED.into_response();
    response.headers_mut().insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    apply_cors(&mut response);
    response
}

/// Applies the permissive CORS headers.
fn apply_cors(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert("access-control-allow-methods", HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert("access-control-allow-headers", HeaderValue::from_static(ALLOWED_HEADERS));
    headers.insert("access-control-expose-headers", HeaderValue::from_static(EXPOSED_HEADERS));
}

/// Returns true when a body read failed on the configured size limit.
fn exceeds_body_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return true;
        }
        source = current.source();
    }
    false
}

/// Returns a header value as UTF-8 text.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
