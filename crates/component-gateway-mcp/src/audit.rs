// crates/component-gateway-mcp/src/audit.rs
// ============================================================================
// Module: Gateway Audit Logging
// Description: Structured request and operational events for the gateway.
// Purpose: Emit JSON-line logs without a hard logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Two event families flow through one [`GatewayAuditSink`]:
//! [`McpAuditEvent`] once per HTTP request and [`GatewayLogEvent`] for
//! operational warnings such as failed component fetches. Events never carry
//! tool arguments, component bodies, or internal addresses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::AuditConfig;
use crate::telemetry::McpMethod;
use crate::telemetry::McpOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Per-request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct McpAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Method classification.
    pub method: McpMethod,
    /// Exposed tool name for `tools/call`.
    pub tool: Option<String>,
    /// Request outcome.
    pub outcome: McpOutcome,
    /// HTTP status returned.
    pub http_status: u16,
    /// JSON-RPC error code when present.
    pub error_code: Option<i64>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Latency histogram bucket bound in milliseconds (`None` above the top bucket).
    pub latency_bucket_ms: Option<u64>,
    /// Scope label derived from the request path.
    pub scope: String,
    /// Whether the request carried a session id.
    pub has_session: bool,
}

/// Inputs required to construct a request audit event.
pub struct McpAuditEventParams {
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Method classification.
    pub method: McpMethod,
    /// Exposed tool name for `tools/call`.
    pub tool: Option<String>,
    /// Request outcome.
    pub outcome: McpOutcome,
    /// HTTP status returned.
    pub http_status: u16,
    /// JSON-RPC error code when present.
    pub error_code: Option<i64>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Latency histogram bucket bound in milliseconds (`None` above the top bucket).
    pub latency_bucket_ms: Option<u64>,
    /// Scope label derived from the request path.
    pub scope: String,
    /// Whether the request carried a session id.
    pub has_session: bool,
}

impl McpAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: McpAuditEventParams) -> Self {
        Self {
            event: "mcp_request",
            timestamp_ms: now_ms(),
            request_id: params.request_id,
            method: params.method,
            tool: params.tool,
            outcome: params.outcome,
            http_status: params.http_status,
            error_code: params.error_code,
            error_kind: params.error_kind,
            request_bytes: params.request_bytes,
            response_bytes: params.response_bytes,
            latency_bucket_ms: params.latency_bucket_ms,
            scope: params.scope,
            has_session: params.has_session,
        }
    }
}

/// Operational event kind.
///
/// # Invariants
/// - Variants are stable log labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayLogKind {
    /// A component metadata fetch failed or timed out.
    ComponentFetchFailed,
    /// The discovery cycle deadline abandoned pending fetches.
    DiscoveryDeadlineExceeded,
    /// A component listed the same tool name twice.
    DuplicateToolInListing,
    /// Two components published the same tool name.
    DuplicateToolAcrossComponents,
    /// A tool invocation failed downstream.
    DispatchFailed,
    /// A session was evicted to make room for a new one.
    SessionEvicted,
}

/// Operational warning event payload.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayLogEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event kind.
    pub kind: GatewayLogKind,
    /// Component identifier when relevant.
    pub component: Option<String>,
    /// Tool name when relevant.
    pub tool: Option<String>,
    /// Short description without addresses or payloads.
    pub message: String,
}

impl GatewayLogEvent {
    /// Creates a new operational event with a consistent timestamp.
    #[must_use]
    pub fn new(kind: GatewayLogKind, message: impl Into<String>) -> Self {
        Self {
            event: "gateway_log",
            timestamp_ms: now_ms(),
            kind,
            component: None,
            tool: None,
            message: message.into(),
        }
    }

    /// Attaches a component identifier.
    #[must_use]
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Attaches a tool name.
    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for gateway events.
pub trait GatewayAuditSink: Send + Sync {
    /// Record a request audit event.
    fn record(&self, event: &McpAuditEvent);

    /// Record an operational event.
    fn record_log(&self, _event: &GatewayLogEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl GatewayAuditSink for StderrAuditSink {
    fn record(&self, event: &McpAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_log(&self, event: &GatewayLogEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized line.
    fn append(&self, payload: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl GatewayAuditSink for FileAuditSink {
    fn record(&self, event: &McpAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.append(&payload);
        }
    }

    fn record_log(&self, event: &GatewayLogEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.append(&payload);
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl GatewayAuditSink for NoopAuditSink {
    fn record(&self, _event: &McpAuditEvent) {}

    fn record_log(&self, _event: &GatewayLogEvent) {}
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds the sink described by the audit configuration.
///
/// # Errors
///
/// Returns an error when the configured audit file cannot be opened.
pub fn audit_sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn GatewayAuditSink>> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => Ok(Arc::new(FileAuditSink::new(path)?)),
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Returns the current time in milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
