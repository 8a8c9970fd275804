// crates/component-gateway-mcp/tests/common/mod.rs
// ============================================================================
// Module: Gateway Test Harness
// Description: Mock components, an in-memory audit sink, and an MCP client.
// Purpose: Drive the gateway end to end over real sockets.
// Dependencies: component-gateway-mcp, reqwest, tiny_http, tokio
// ============================================================================

//! ## Overview
//! Mock components are `tiny_http` servers on ephemeral ports that record
//! every request. The gateway is bound to `127.0.0.1:0` and addressed with
//! `reqwest`. Component addresses are wired through `components.addresses`.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::io::Read;
use std::io::Write;
use std::net::TcpListener as StdTcpListener;
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use component_gateway_mcp::GatewayAuditSink;
use component_gateway_mcp::GatewayConfig;
use component_gateway_mcp::GatewayLogEvent;
use component_gateway_mcp::GatewayLogKind;
use component_gateway_mcp::McpAuditEvent;
use component_gateway_mcp::McpServer;
use component_gateway_mcp::NoopMetrics;
use component_gateway_mcp::resolver::resolver_from_config;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use tokio::sync::oneshot;

// ============================================================================
// SECTION: Mock Components
// ============================================================================

/// Request observed by a mock component.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Raw request body.
    pub body: String,
}

/// Canned behavior for a mock component.
#[derive(Debug, Clone)]
pub struct ComponentBehavior {
    /// Metadata status code.
    pub metadata_status: u16,
    /// Metadata response body.
    pub metadata_body: String,
    /// Delay before answering metadata requests.
    pub metadata_delay: Duration,
    /// Tool invocation status code.
    pub call_status: u16,
    /// Tool invocation response body.
    pub call_body: String,
}

impl ComponentBehavior {
    /// Publishes the given descriptors and answers calls with a text result.
    pub fn publishing(descriptors: &Value) -> Self {
        Self {
            metadata_status: 200,
            metadata_body: descriptors.to_string(),
            metadata_delay: Duration::ZERO,
            call_status: 200,
            call_body: json!({"content": [{"type": "text", "text": "ok"}]}).to_string(),
        }
    }

    /// Overrides the tool invocation reply.
    pub fn with_call_reply(mut self, status: u16, body: impl Into<String>) -> Self {
        self.call_status = status;
        self.call_body = body.into();
        self
    }

    /// Delays metadata replies.
    pub const fn with_metadata_delay(mut self, delay: Duration) -> Self {
        self.metadata_delay = delay;
        self
    }

    /// Overrides the metadata reply.
    pub fn with_metadata_reply(mut self, status: u16, body: impl Into<String>) -> Self {
        self.metadata_status = status;
        self.metadata_body = body.into();
        self
    }
}

/// Mock component backed by `tiny_http`.
pub struct MockComponent {
    /// Base URL with trailing slash.
    pub url: String,
    /// Requests observed so far.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Server handle used to stop the accept loop.
    server: Arc<Server>,
}

impl MockComponent {
    /// Starts a mock component on an ephemeral port.
    pub fn spawn(behavior: ComponentBehavior) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let loop_server = Arc::clone(&server);
        let loop_requests = Arc::clone(&requests);
        thread::spawn(move || {
            for mut request in loop_server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let method = request.method().to_string();
                loop_requests.lock().unwrap().push(RecordedRequest {
                    method: method.clone(),
                    path: request.url().to_string(),
                    body,
                });
                let (status, payload) = if method == "GET" {
                    thread::sleep(behavior.metadata_delay);
                    (behavior.metadata_status, behavior.metadata_body.clone())
                } else {
                    (behavior.call_status, behavior.call_body.clone())
                };
                let response = Response::from_string(payload)
                    .with_status_code(status)
                    .with_header(json_content_type());
                let _ = request.respond(response);
            }
        });
        Self {
            url: format!("http://{addr}/"),
            requests,
            server,
        }
    }

    /// Returns every recorded request.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns recorded tool invocations.
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|request| request.method == "POST").collect()
    }

    /// Returns the number of metadata fetches observed.
    pub fn metadata_fetches(&self) -> usize {
        self.requests().iter().filter(|request| request.method == "GET").count()
    }
}

impl Drop for MockComponent {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

/// Returns a JSON content type header.
fn json_content_type() -> Header {
    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap()
}

/// Returns a URL on which nothing is listening.
pub fn unreachable_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

/// How a scripted component treats tool invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// Close the connection without replying.
    Drop,
    /// Hold the connection open without replying.
    Hang,
}

/// Raw TCP component that serves metadata but misbehaves on invocation.
pub struct ScriptedComponent {
    /// Base URL with trailing slash.
    pub url: String,
}

impl ScriptedComponent {
    /// Starts a scripted component publishing `metadata`.
    pub fn spawn(metadata: &Value, mode: CallMode) -> Self {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let metadata = metadata.to_string();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let metadata = metadata.clone();
                thread::spawn(move || serve_scripted(stream, &metadata, mode));
            }
        });
        Self {
            url: format!("http://{addr}/"),
        }
    }
}

/// Handles one scripted connection.
fn serve_scripted(mut stream: TcpStream, metadata: &str, mode: CallMode) {
    let mut head = Vec::new();
    let mut buf = [0_u8; 1024];
    while !head.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(read) => head.extend_from_slice(&buf[..read]),
        }
    }
    if head.starts_with(b"GET") {
        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{metadata}",
            metadata.len()
        );
        let _ = stream.write_all(reply.as_bytes());
        return;
    }
    match mode {
        CallMode::Drop => drop(stream),
        CallMode::Hang => thread::sleep(Duration::from_secs(30)),
    }
}

/// Builds a minimal tool descriptor.
pub fn tool(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} tool"),
        "inputSchema": {"type": "object"}
    })
}

/// Builds a tool descriptor with an input schema.
pub fn tool_with_schema(name: &str, schema: Value) -> Value {
    json!({
        "name": name,
        "inputSchema": schema
    })
}

// ============================================================================
// SECTION: Audit Capture
// ============================================================================

/// In-memory audit sink.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Request events.
    events: Mutex<Vec<McpAuditEvent>>,
    /// Operational events.
    logs: Mutex<Vec<GatewayLogEvent>>,
}

impl MemoryAuditSink {
    /// Returns captured request events.
    pub fn events(&self) -> Vec<McpAuditEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns captured operational events.
    pub fn logs(&self) -> Vec<GatewayLogEvent> {
        self.logs.lock().unwrap().clone()
    }

    /// Returns captured operational events of one kind.
    pub fn logs_of(&self, kind: GatewayLogKind) -> Vec<GatewayLogEvent> {
        self.logs().into_iter().filter(|event| event.kind == kind).collect()
    }
}

impl GatewayAuditSink for MemoryAuditSink {
    fn record(&self, event: &McpAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn record_log(&self, event: &GatewayLogEvent) {
        self.logs.lock().unwrap().push(event.clone());
    }
}

// ============================================================================
// SECTION: Gateway Harness
// ============================================================================

/// Builds a config wired to the given components.
pub fn config_for(components: &[(&str, &str)]) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.components.names = components.iter().map(|(name, _)| (*name).to_string()).collect();
    config.components.addresses = components
        .iter()
        .map(|(name, url)| ((*name).to_string(), (*url).to_string()))
        .collect();
    config.audit.enabled = false;
    config.discovery.fetch_timeout_ms = 2_000;
    config.discovery.cycle_deadline_ms = 3_000;
    config.dispatch.timeout_ms = 2_000;
    config
}

/// Running gateway bound to an ephemeral port.
pub struct GatewayHandle {
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Captured audit events.
    pub audit: Arc<MemoryAuditSink>,
    /// Shutdown trigger.
    shutdown: Option<oneshot::Sender<()>>,
}

impl GatewayHandle {
    /// Returns the URL for a gateway path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Returns an MCP client for the unscoped endpoint.
    pub fn client(&self) -> McpClient {
        McpClient::new(self.url("/mcp"))
    }

    /// Returns an MCP client for a gateway path.
    pub fn client_at(&self, path: &str) -> McpClient {
        McpClient::new(self.url(path))
    }
}

impl Drop for GatewayHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Starts a gateway for the configuration.
pub async fn spawn_gateway(config: GatewayConfig) -> GatewayHandle {
    let audit = Arc::new(MemoryAuditSink::default());
    let resolver = resolver_from_config(&config.components);
    let server = McpServer::with_components(
        config,
        resolver.as_ref(),
        Arc::clone(&audit) as Arc<dyn GatewayAuditSink>,
        Arc::new(NoopMetrics),
    )
    .unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = server
            .serve_listener(listener, async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    GatewayHandle {
        base_url: format!("http://{addr}"),
        audit,
        shutdown: Some(shutdown_tx),
    }
}

// ============================================================================
// SECTION: MCP Client
// ============================================================================

/// Raw HTTP reply.
pub struct HttpReply {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: reqwest::header::HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpReply {
    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Returns a header value as text.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).and_then(|value| value.to_str().ok()).map(str::to_string)
    }
}

/// Minimal MCP client that tracks the session id.
pub struct McpClient {
    /// HTTP client.
    http: reqwest::Client,
    /// Endpoint URL.
    url: String,
    /// Session id from `initialize`.
    pub session: Option<String>,
    /// Next request id.
    next_id: i64,
    /// Extra headers sent on every request.
    extra_headers: Vec<(String, String)>,
}

impl McpClient {
    /// Creates a client for an endpoint.
    pub fn new(url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            session: None,
            next_id: 1,
            extra_headers: Vec::new(),
        }
    }

    /// Adds a header sent on every request.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Posts a raw body.
    pub async fn post_raw(&self, body: impl Into<String>) -> HttpReply {
        let mut request = self
            .http
            .post(&self.url)
            .header("content-type", "application/json")
            .body(body.into());
        if let Some(session) = &self.session {
            request = request.header("mcp-session-id", session);
        }
        for (name, value) in &self.extra_headers {
            request = request.header(name, value);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.unwrap().to_vec();
        HttpReply {
            status,
            headers,
            body,
        }
    }

    /// Sends a request and returns the parsed envelope.
    pub async fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        let body = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});
        let reply = self.post_raw(body.to_string()).await;
        assert_eq!(reply.status, 200, "unexpected status for {method}");
        reply.json()
    }

    /// Sends a notification and returns the HTTP status.
    pub async fn notify(&self, method: &str) -> u16 {
        let body = json!({"jsonrpc": "2.0", "method": method});
        self.post_raw(body.to_string()).await.status
    }

    /// Sends `initialize` and stores the session id.
    pub async fn initialize(&mut self) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-06-18",
                "capabilities": {},
                "clientInfo": {"name": "harness", "version": "1.0.0"}
            }
        });
        let reply = self.post_raw(body.to_string()).await;
        self.session = reply.header("mcp-session-id");
        reply.json()
    }

    /// Completes the handshake.
    pub async fn handshake(&mut self) {
        let envelope = self.initialize().await;
        assert!(envelope.get("result").is_some(), "initialize failed: {envelope}");
        assert_eq!(self.notify("notifications/initialized").await, 202);
    }

    /// Lists exposed tool names.
    pub async fn tool_names(&mut self) -> Vec<String> {
        let envelope = self.request("tools/list", json!({})).await;
        envelope["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|tool| tool["name"].as_str().unwrap().to_string())
            .collect()
    }

    /// Calls a tool with raw argument text.
    pub async fn call_raw(&mut self, name: &str, arguments: &str) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        let body = format!(
            r#"{{"jsonrpc":"2.0","id":{id},"method":"tools/call","params":{{"name":{},"arguments":{arguments}}}}}"#,
            Value::String(name.to_string())
        );
        let reply = self.post_raw(body).await;
        assert_eq!(reply.status, 200);
        reply.json()
    }
}
