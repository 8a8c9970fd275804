// crates/component-gateway-mcp/src/telemetry.rs
// ============================================================================
// Module: Gateway Telemetry
// Description: Observability hooks for JSON-RPC request handling.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for request counters and
//! latency histograms. Deployments plug in their own backend; the gateway
//! ships only [`NoopMetrics`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for request histograms.
pub const MCP_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// JSON-RPC method classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum McpMethod {
    /// `initialize`.
    Initialize,
    /// `initialized` or `notifications/initialized`.
    Initialized,
    /// `ping`.
    Ping,
    /// `tools/list`.
    ToolsList,
    /// `tools/call`.
    ToolsCall,
    /// `prompts/list`.
    PromptsList,
    /// `resources/list`.
    ResourcesList,
    /// Any other notification.
    Notification,
    /// Invalid or malformed request.
    Invalid,
    /// Unsupported method.
    Other,
}

impl McpMethod {
    /// Classifies a method name.
    #[must_use]
    pub fn classify(method: &str) -> Self {
        match method {
            "initialize" => Self::Initialize,
            "initialized" | "notifications/initialized" => Self::Initialized,
            "ping" => Self::Ping,
            "tools/list" => Self::ToolsList,
            "tools/call" => Self::ToolsCall,
            "prompts/list" => Self::PromptsList,
            "resources/list" => Self::ResourcesList,
            other if other.starts_with("notifications/") => Self::Notification,
            _ => Self::Other,
        }
    }
}

/// Request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum McpOutcome {
    /// Successful request or accepted notification.
    Ok,
    /// Failed request.
    Error,
}

/// Returns the smallest latency bucket bound covering `latency`.
///
/// Returns `None` when the latency exceeds every bucket.
#[must_use]
pub fn latency_bucket_ms(latency: Duration) -> Option<u64> {
    let elapsed = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
    MCP_LATENCY_BUCKETS_MS.iter().copied().find(|bound| elapsed <= *bound)
}

/// Request metric event payload.
#[derive(Debug, Clone)]
pub struct GatewayMetricEvent {
    /// Method classification.
    pub method: McpMethod,
    /// Exposed tool name for `tools/call`.
    pub tool: Option<String>,
    /// Request outcome.
    pub outcome: McpOutcome,
    /// JSON-RPC error code when present.
    pub error_code: Option<i64>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for gateway requests and latencies.
pub trait GatewayMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: GatewayMetricEvent);
    /// Records a latency observation for the request.
    fn record_latency(&self, event: GatewayMetricEvent, latency: Duration);
}

/// No-op metrics sink.
pub struct NoopMetrics;

impl GatewayMetrics for NoopMetrics {
    fn record_request(&self, _event: GatewayMetricEvent) {}

    fn record_latency(&self, _event: GatewayMetricEvent, _latency: Duration) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
