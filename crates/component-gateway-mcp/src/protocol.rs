// crates/component-gateway-mcp/src/protocol.rs
// ============================================================================
// Module: JSON-RPC Protocol
// Description: JSON-RPC 2.0 envelopes, error codes, and MCP payload shapes.
// Purpose: Parse untrusted request bodies and render protocol responses.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Requests are parsed in two passes: a syntax pass that distinguishes parse
//! errors (`-32700`) from structurally invalid envelopes (`-32600`), then a
//! typed pass into [`RpcRequest`]. Params stay as [`RawValue`] so tool
//! arguments can be forwarded byte-for-byte, and successful results are
//! rendered from raw JSON so component bodies pass through unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::IgnoredAny;
use serde_json::Value;
use serde_json::value::RawValue;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON-RPC protocol version accepted and emitted.
pub const JSONRPC_VERSION: &str = "2.0";
/// MCP protocol version negotiated by `initialize`.
pub const PROTOCOL_VERSION: &str = "2025-06-18";
/// Fallback payload used when a response cannot be serialized.
const SERIALIZATION_FALLBACK: &[u8] =
    b"{\"jsonrpc\":\"2.0\",\"id\":null,\"error\":{\"code\":-32603,\"message\":\"response \
      serialization failed\"}}";

// ============================================================================
// SECTION: Error Codes
// ============================================================================

/// JSON-RPC error classification.
///
/// # Invariants
/// - Numeric codes are stable wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Body is not valid JSON.
    ParseError,
    /// Envelope is valid JSON but not a valid request.
    InvalidRequest,
    /// Method is not supported.
    MethodNotFound,
    /// Params are missing, malformed, or fail validation.
    InvalidParams,
    /// Gateway or downstream failure.
    InternalError,
    /// Method invoked before the handshake completed.
    NotInitialized,
}

impl ErrorCode {
    /// Returns the numeric wire code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::NotInitialized => -32002,
        }
    }

    /// Maps a numeric wire code back to its classification.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            -32700 => Some(Self::ParseError),
            -32600 => Some(Self::InvalidRequest),
            -32601 => Some(Self::MethodNotFound),
            -32602 => Some(Self::InvalidParams),
            -32603 => Some(Self::InternalError),
            -32002 => Some(Self::NotInitialized),
            _ => None,
        }
    }

    /// Returns a stable label for logging.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::InvalidRequest => "invalid_request",
            Self::MethodNotFound => "method_not_found",
            Self::InvalidParams => "invalid_params",
            Self::InternalError => "internal_error",
            Self::NotInitialized => "not_initialized",
        }
    }
}

/// Protocol error carried to the response envelope.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RpcError {
    /// Error classification.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Optional structured diagnostics.
    pub data: Option<Value>,
}

impl RpcError {
    /// Creates an error without structured data.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attaches structured diagnostics.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Unparseable JSON body.
    #[must_use]
    pub fn parse_error() -> Self {
        Self::new(ErrorCode::ParseError, "parse error")
    }

    /// Structurally invalid request.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Unsupported method.
    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self::new(ErrorCode::MethodNotFound, format!("method not found: {method}"))
    }

    /// Invalid params.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    /// Internal or downstream failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Method invoked before the session is ready.
    #[must_use]
    pub fn not_initialized() -> Self {
        Self::new(ErrorCode::NotInitialized, "server not initialized")
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Wire-level request shape before envelope checks.
#[derive(Deserialize)]
struct WireRequest {
    /// Protocol version marker.
    #[serde(default)]
    jsonrpc: Option<Value>,
    /// Request identifier; `Some(Null)` when present as `null`.
    #[serde(default, deserialize_with = "deserialize_present")]
    id: Option<Value>,
    /// Method name, type-checked after the id is known.
    #[serde(default)]
    method: Option<Value>,
    /// Raw params payload.
    #[serde(default)]
    params: Option<Box<RawValue>>,
}

/// Parsed JSON-RPC request.
#[derive(Debug)]
pub struct RpcRequest {
    /// Request identifier; `None` when absent.
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Raw params payload.
    pub params: Option<Box<RawValue>>,
}

impl RpcRequest {
    /// Returns true when the request must not be answered.
    ///
    /// A request without `id` is a notification; `id: null` only counts as a
    /// notification on notification methods.
    #[must_use]
    pub fn is_notification(&self) -> bool {
        match &self.id {
            None => true,
            Some(Value::Null) => is_notification_method(&self.method),
            Some(_) => false,
        }
    }

    /// Returns the identifier echoed in the response.
    #[must_use]
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }
}

/// Request rejected before method routing.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRequest {
    /// Identifier to echo, `null` when unknown.
    pub id: Value,
    /// Rejection error.
    pub error: RpcError,
}

/// Parses a raw HTTP body into a JSON-RPC request.
///
/// # Errors
///
/// Returns [`RejectedRequest`] with `-32700` for invalid JSON and `-32600`
/// for batches, non-object bodies, and invalid envelopes.
pub fn parse_request(bytes: &[u8]) -> Result<RpcRequest, RejectedRequest> {
    let reject = |id: Value, error: RpcError| RejectedRequest {
        id,
        error,
    };
    if serde_json::from_slice::<IgnoredAny>(bytes).is_err() {
        return Err(reject(Value::Null, RpcError::parse_error()));
    }
    match bytes.iter().find(|byte| !byte.is_ascii_whitespace()) {
        Some(b'{') => {}
        Some(b'[') => {
            return Err(reject(
                Value::Null,
                RpcError::invalid_request("batch requests are not supported"),
            ));
        }
        _ => {
            return Err(reject(Value::Null, RpcError::invalid_request("request must be an object")));
        }
    }
    let wire: WireRequest = serde_json::from_slice(bytes)
        .map_err(|_| reject(Value::Null, RpcError::invalid_request("invalid json-rpc request")))?;
    let id = match wire.id {
        Some(value @ (Value::Null | Value::String(_) | Value::Number(_))) => Some(value),
        Some(_) => {
            return Err(reject(
                Value::Null,
                RpcError::invalid_request("id must be a string, number, or null"),
            ));
        }
        None => None,
    };
    let echo = id.clone().unwrap_or(Value::Null);
    if wire.jsonrpc.as_ref().and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(reject(echo, RpcError::invalid_request("invalid json-rpc version")));
    }
    let method = match wire.method {
        Some(Value::String(method)) if !method.is_empty() => method,
        Some(Value::String(_)) | None => {
            return Err(reject(echo, RpcError::invalid_request("missing method")));
        }
        Some(_) => {
            return Err(reject(echo, RpcError::invalid_request("method must be a string")));
        }
    };
    Ok(RpcRequest {
        id,
        method,
        params: wire.params,
    })
}

/// Returns true for methods that are notifications by definition.
#[must_use]
pub fn is_notification_method(method: &str) -> bool {
    method == "initialized" || method.starts_with("notifications/")
}

/// Deserializes a field that distinguishes `null` from absence.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload, rendered verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Box<RawValue>>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
    /// Optional structured diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    /// Builds a success response from a raw result.
    #[must_use]
    pub const fn success(id: Value, result: Box<RawValue>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error response.
    #[must_use]
    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(JsonRpcError {
                code: error.code.code(),
                message: error.message,
                data: error.data,
            }),
        }
    }

    /// Returns the error code when the response is a failure.
    #[must_use]
    pub fn error_code(&self) -> Option<i64> {
        self.error.as_ref().map(|error| error.code)
    }

    /// Serializes the envelope, falling back to a fixed internal error.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|_| SERIALIZATION_FALLBACK.to_vec())
    }
}

/// Serializes a typed result into raw JSON.
///
/// # Errors
///
/// Returns an internal [`RpcError`] when serialization fails.
pub fn to_raw<T: Serialize>(value: &T) -> Result<Box<RawValue>, RpcError> {
    serde_json::value::to_raw_value(value)
        .map_err(|_| RpcError::internal("result serialization failed"))
}

// ============================================================================
// SECTION: MCP Payloads
// ============================================================================

/// `initialize` params.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Requested protocol version.
    pub protocol_version: String,
    /// Client capabilities (opaque to the gateway).
    #[serde(default)]
    pub capabilities: Value,
    /// Client identification.
    pub client_info: ClientInfo,
}

/// Client identification sent with `initialize`.
#[derive(Debug, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// `initialize` result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Negotiated protocol version.
    pub protocol_version: &'static str,
    /// Gateway identification.
    pub server_info: ServerInfo,
    /// Gateway capabilities.
    pub capabilities: ServerCapabilities,
    /// Usage instructions for the client.
    pub instructions: String,
}

/// Gateway identification.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

/// Capabilities advertised by the gateway.
#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    /// Tool capability flags.
    pub tools: ToolsCapability,
}

/// Tool capability flags.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// The tool list is recomputed per request; no change notifications.
    pub list_changed: bool,
}

/// `tools/call` params.
#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    /// Exposed tool name.
    pub name: String,
    /// Raw arguments, forwarded byte-for-byte.
    #[serde(default)]
    pub arguments: Option<Box<RawValue>>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
