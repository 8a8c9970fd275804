// crates/component-gateway-mcp/src/lib.rs
// ============================================================================
// Module: Component Gateway MCP
// Description: MCP gateway aggregating tools from internal components.
// Purpose: Discover, validate, and route tool calls across components.
// Dependencies: component-gateway-config, axum, jsonschema, reqwest, tokio
// ============================================================================

//! ## Overview
//! The gateway speaks MCP (JSON-RPC 2.0 over HTTP) to clients and fans out
//! to independently deployed components over the internal network. Tool
//! metadata is aggregated per request, call arguments are validated against
//! each tool's input schema, and calls are forwarded to the owning
//! component with their bytes unchanged.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod discovery;
pub mod dispatch;
pub mod gateway;
pub mod outbound;
pub mod protocol;
pub mod resolver;
pub mod scope;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::GatewayAuditSink;
pub use audit::GatewayLogEvent;
pub use audit::GatewayLogKind;
pub use audit::McpAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use catalog::ToolCatalog;
pub use catalog::ToolDescriptor;
pub use config::GatewayConfig;
pub use directory::ComponentDirectory;
pub use directory::ComponentRef;
pub use discovery::DiscoveryAggregator;
pub use dispatch::Dispatcher;
pub use gateway::Gateway;
pub use gateway::RequestContext;
pub use resolver::ComponentResolver;
pub use resolver::InternalDomainResolver;
pub use resolver::StaticResolver;
pub use server::McpServer;
pub use server::McpServerError;
pub use telemetry::GatewayMetricEvent;
pub use telemetry::GatewayMetrics;
pub use telemetry::MCP_LATENCY_BUCKETS_MS;
pub use telemetry::McpMethod;
pub use telemetry::McpOutcome;
pub use telemetry::NoopMetrics;
pub use validation::SchemaValidator;
