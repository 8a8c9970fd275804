// crates/component-gateway-mcp/src/gateway.rs
// ============================================================================
// Module: Gateway Core
// Description: JSON-RPC method routing over discovery, validation, and dispatch.
// Purpose: Implement the MCP handshake and tool methods for a request scope.
// Dependencies: serde_json, tokio
// ============================================================================

//! ## Overview
//! [`Gateway`] owns the component directory, the discovery aggregator, the
//! argument validator, the dispatcher, and the session table. It is
//! transport-agnostic: the HTTP layer parses the envelope, derives the
//! [`RequestContext`], and renders the [`GatewayOutcome`].
//!
//! Sequencing: only `initialize` and `ping` are accepted before a session
//! reaches [`HandshakeState::Ready`]; everything else fails with `-32002`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::audit::GatewayAuditSink;
use crate::audit::GatewayLogEvent;
use crate::audit::GatewayLogKind;
use crate::catalog::ToolCatalog;
use crate::catalog::ToolDescriptor;
use crate::config::GatewayConfig;
use crate::config::ToolNaming;
use crate::directory::ComponentDirectory;
use crate::discovery::DiscoveryAggregator;
use crate::discovery::DiscoveryError;
use crate::dispatch::Dispatcher;
use crate::outbound::build_client;
use crate::protocol::CallToolParams;
use crate::protocol::InitializeParams;
use crate::protocol::InitializeResult;
use crate::protocol::JsonRpcResponse;
use crate::protocol::PROTOCOL_VERSION;
use crate::protocol::RpcError;
use crate::protocol::RpcRequest;
use crate::protocol::ServerCapabilities;
use crate::protocol::ServerInfo;
use crate::protocol::ToolsCapability;
use crate::protocol::to_raw;
use crate::resolver::ComponentResolver;
use crate::resolver::resolver_from_config;
use crate::scope::ToolScope;
use crate::session::HandshakeState;
use crate::session::SessionStore;
use crate::telemetry::McpMethod;
use crate::validation::SchemaValidator;
use crate::validation::ValidationFailure;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Gateway construction errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The outbound HTTP client could not be built.
    #[error("http client build failed: {0}")]
    Client(String),
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Per-request context derived by the transport.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Component scope for the request.
    pub scope: ToolScope,
    /// Session id presented by the client.
    pub session_id: Option<String>,
}

/// Result of handling one request.
#[derive(Debug)]
pub struct GatewayOutcome {
    /// Response envelope; `None` for notifications.
    pub response: Option<JsonRpcResponse>,
    /// Session opened by `initialize`.
    pub opened_session: Option<String>,
    /// Method classification.
    pub method: McpMethod,
    /// Exposed tool name for `tools/call`.
    pub tool: Option<String>,
}

/// `tools/list` result.
#[derive(Serialize)]
struct ToolsListResult {
    /// Exposed tools.
    tools: Vec<ToolDescriptor>,
}

/// Component gateway core.
pub struct Gateway {
    /// Configured components.
    directory: ComponentDirectory,
    /// Metadata fan-out.
    discovery: DiscoveryAggregator,
    /// Argument validator.
    validator: SchemaValidator,
    /// Tool call forwarding.
    dispatcher: Dispatcher,
    /// Handshake state per session.
    sessions: SessionStore,
    /// Exposed tool naming.
    naming: ToolNaming,
    /// Identification returned by `initialize`.
    server_info: ServerInfo,
    /// Sink for operational events.
    audit: Arc<dyn GatewayAuditSink>,
}

impl Gateway {
    /// Builds a gateway using the resolver described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the outbound client cannot be built.
    pub fn from_config(
        config: &GatewayConfig,
        audit: Arc<dyn GatewayAuditSink>,
    ) -> Result<Self, GatewayError> {
        let resolver = resolver_from_config(&config.components);
        Self::with_resolver(config, resolver.as_ref(), audit)
    }

    /// Builds a gateway with an explicit resolver.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the outbound client cannot be built.
    pub fn with_resolver(
        config: &GatewayConfig,
        resolver: &dyn ComponentResolver,
        audit: Arc<dyn GatewayAuditSink>,
    ) -> Result<Self, GatewayError> {
        let client = build_client().map_err(|err| GatewayError::Client(err.to_string()))?;
        let directory = ComponentDirectory::resolve(&config.components.names, resolver);
        Ok(Self {
            directory,
            discovery: DiscoveryAggregator::new(
                client.clone(),
                &config.discovery,
                Arc::clone(&audit),
            ),
            validator: SchemaValidator::new(config.validation.validate_arguments),
            dispatcher: Dispatcher::new(client, &config.dispatch),
            sessions: SessionStore::new(
                config.server.max_sessions,
                config.server.session_idle_timeout(),
            ),
            naming: config.discovery.tool_naming,
            server_info: ServerInfo {
                name: config.server.server_name.clone(),
                version: config.server.server_version.clone(),
            },
            audit,
        })
    }

    /// Returns the component directory.
    #[must_use]
    pub const fn directory(&self) -> &ComponentDirectory {
        &self.directory
    }

    /// Handles one parsed request.
    ///
    /// Notifications are never answered. Tool notifications still run under
    /// the same handshake and scope rules with their result discarded.
    pub async fn handle(&self, request: RpcRequest, context: &RequestContext) -> GatewayOutcome {
        let method = McpMethod::classify(&request.method);
        let mut outcome = GatewayOutcome {
            response: None,
            opened_session: None,
            method,
            tool: None,
        };
        if request.is_notification() {
            match method {
                McpMethod::Initialized => {
                    self.sessions.mark_ready(context.session_id.as_deref());
                }
                McpMethod::ToolsList | McpMethod::ToolsCall => {
                    let _ = self.route(&request, context, &mut outcome).await;
                }
                _ => {}
            }
            return outcome;
        }
        let id = request.response_id();
        let result = self.route(&request, context, &mut outcome).await;
        outcome.response = Some(match result {
            Ok(raw) => JsonRpcResponse::success(id, raw),
            Err(error) => JsonRpcResponse::failure(id, error),
        });
        outcome
    }

    /// Routes a request by method, enforcing the handshake.
    async fn route(
        &self,
        request: &RpcRequest,
        context: &RequestContext,
        outcome: &mut GatewayOutcome,
    ) -> Result<Box<RawValue>, RpcError> {
        let session_id = context.session_id.as_deref();
        match outcome.method {
            McpMethod::Initialize => {
                let (result, session) = self.initialize(request)?;
                outcome.opened_session = Some(session);
                Ok(result)
            }
            McpMethod::Ping => to_raw(&json!({})),
            method if self.sessions.state(session_id) != HandshakeState::Ready => {
                if method == McpMethod::Initialized {
                    self.sessions.mark_ready(session_id);
                    to_raw(&json!({}))
                } else {
                    Err(RpcError::not_initialized())
                }
            }
            McpMethod::Initialized => to_raw(&json!({})),
            McpMethod::ToolsList => self.list_tools(&context.scope).await,
            McpMethod::ToolsCall => {
                let params = parse_call_params(request);
                outcome.tool = params.as_ref().ok().map(|params| params.name.clone());
                self.call_tool(params?, &context.scope).await
            }
            McpMethod::PromptsList => to_raw(&json!({"prompts": []})),
            McpMethod::ResourcesList => to_raw(&json!({"resources": []})),
            McpMethod::Notification | McpMethod::Invalid | McpMethod::Other => {
                Err(RpcError::method_not_found(&request.method))
            }
        }
    }

    /// Handles `initialize`, opening a session.
    fn initialize(&self, request: &RpcRequest) -> Result<(Box<RawValue>, String), RpcError> {
        let params = request
            .params
            .as_ref()
            .ok_or_else(|| RpcError::invalid_params("initialize requires params"))?;
        let params: InitializeParams = serde_json::from_str(params.get())
            .map_err(|_| RpcError::invalid_params("invalid initialize params"))?;
        if params.protocol_version != PROTOCOL_VERSION {
            return Err(RpcError::invalid_params("unsupported protocol version").with_data(
                json!({
                    "supported": [PROTOCOL_VERSION],
                    "requested": params.protocol_version,
                }),
            ));
        }
        let result = to_raw(&InitializeResult {
            protocol_version: PROTOCOL_VERSION,
            server_info: self.server_info.clone(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            instructions: format!(
                "Tools are aggregated from {} component(s) and listed per request.",
                self.directory.len()
            ),
        })?;
        let opened = self.sessions.open();
        if opened.evicted.is_some() {
            self.audit.record_log(&GatewayLogEvent::new(
                GatewayLogKind::SessionEvicted,
                "session table full; least recently used session evicted",
            ));
        }
        Ok((result, opened.id))
    }

    /// Handles `tools/list` for the scope.
    async fn list_tools(&self, scope: &ToolScope) -> Result<Box<RawValue>, RpcError> {
        let catalog = self.catalog_for(scope).await?;
        to_raw(&ToolsListResult {
            tools: catalog.listed_descriptors(),
        })
    }

    /// Handles `tools/call` for the scope.
    async fn call_tool(
        &self,
        params: CallToolParams,
        scope: &ToolScope,
    ) -> Result<Box<RawValue>, RpcError> {
        if scope.is_readonly() {
            return Err(RpcError::invalid_request("tool execution is disabled in readonly mode"));
        }
        let arguments = params.arguments.as_deref().map_or("{}", RawValue::get);
        if !arguments.trim_start().starts_with('{') {
            return Err(RpcError::invalid_params("tool arguments must be a JSON object"));
        }
        let catalog = self.catalog_for(scope).await?;
        let entry = catalog
            .lookup(&params.name)
            .ok_or_else(|| RpcError::invalid_params(format!("tool '{}' not found", params.name)))?;
        if self.validator.is_enabled() {
            let value: Value = serde_json::from_str(arguments)
                .map_err(|_| RpcError::invalid_params("tool arguments must be a JSON object"))?;
            self.validator.validate(&entry.tool, &value).map_err(validation_error)?;
        }
        self.dispatcher.dispatch(&entry.component, entry.tool.name(), arguments).await.map_err(
            |err| {
                self.audit.record_log(
                    &GatewayLogEvent::new(GatewayLogKind::DispatchFailed, err.to_string())
                        .with_component(err.component())
                        .with_tool(entry.tool.name()),
                );
                RpcError::internal(err.to_string())
            },
        )
    }

    /// Runs discovery over the components in scope.
    async fn catalog_for(&self, scope: &ToolScope) -> Result<ToolCatalog, RpcError> {
        let components = scope.select(&self.directory);
        let prefixed = self.naming == ToolNaming::ComponentPrefixed && scope.is_unscoped();
        self.discovery.build_catalog(&components, prefixed).await.map_err(|err| match err {
            DiscoveryError::DuplicateTool(duplicate) => RpcError::internal(duplicate.to_string()),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses `tools/call` params.
fn parse_call_params(request: &RpcRequest) -> Result<CallToolParams, RpcError> {
    let params = request
        .params
        .as_ref()
        .ok_or_else(|| RpcError::invalid_params("tools/call requires params"))?;
    serde_json::from_str(params.get()).map_err(|_| RpcError::invalid_params("invalid tool params"))
}

/// Maps a validation failure to its JSON-RPC error.
fn validation_error(failure: ValidationFailure) -> RpcError {
    match &failure {
        ValidationFailure::InvalidArguments {
            violations, ..
        } => RpcError::invalid_params(failure.to_string()).with_data(json!({ "errors": violations })),
        ValidationFailure::InvalidSchema {
            ..
        } => RpcError::internal(failure.to_string()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
