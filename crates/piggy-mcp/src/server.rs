// crates/piggy-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: MCP server implementations for stdio and HTTP transports.
// Purpose: Expose the Piggy Explorer resources and tool via JSON-RPC 2.0.
// Dependencies: piggy-config, piggy-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! The MCP server speaks JSON-RPC 2.0 over stdio (one message per line, with
//! `Content-Length` header framing accepted as well) or HTTP (`POST /rpc`). Every request is routed through
//! [`crate::tools::ToolRouter`] and produces one audit event. The server is
//! handed its session explicitly and releases it when the transport stops,
//! including on SIGINT or SIGTERM.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use piggy_config::PiggyConfig;
use piggy_config::ServerTransport;
use piggy_gate::VerdictKind;
use piggy_store_sqlite::SessionState;
use piggy_store_sqlite::SqliteSession;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
#[cfg(unix)]
use tokio::signal::unix::Signal;
#[cfg(unix)]
use tokio::signal::unix::SignalKind;
#[cfg(unix)]
use tokio::signal::unix::signal;
use tokio::sync::oneshot;

use crate::audit::McpAuditEvent;
use crate::audit::McpAuditEventParams;
use crate::audit::McpAuditSink;
use crate::audit::McpMethod;
use crate::audit::McpOutcome;
use crate::audit::SessionAction;
use crate::audit::SessionAuditEvent;
use crate::audit::sink_from_config;
use crate::resources::INTRO_TEXT;
use crate::resources::ResourceContents;
use crate::resources::ResourceDefinition;
use crate::tools::ToolDefinition;
use crate::tools::ToolError;
use crate::tools::ToolRouter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Server name reported by `initialize`.
pub const SERVER_NAME: &str = "Piggy Explorer";
/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Fallback body when a response cannot be serialized.
const SERIALIZATION_FAILURE_BODY: &str =
    "{\"jsonrpc\":\"2.0\",\"id\":null,\"error\":{\"code\":-32060,\"message\":\"serialization \
     failed\"}}";

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Server configuration.
    config: PiggyConfig,
    /// Shared dispatch state.
    state: Arc<ServerState>,
}

impl McpServer {
    /// Builds a new MCP server over an active session.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when configuration is invalid or the audit
    /// sink cannot be opened.
    pub fn new(config: PiggyConfig, session: Arc<SqliteSession>) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let audit = sink_from_config(&config.server.audit)
            .map_err(|err| McpServerError::Init(format!("audit sink: {err}")))?;
        Ok(Self::with_audit(config, session, audit))
    }

    /// Builds a server with an explicit audit sink.
    #[must_use]
    pub fn with_audit(
        config: PiggyConfig,
        session: Arc<SqliteSession>,
        audit: Arc<dyn McpAuditSink>,
    ) -> Self {
        if session.state() == SessionState::Active {
            record_session(audit.as_ref(), &session, SessionAction::Opened);
        }
        let state = Arc::new(ServerState {
            router: ToolRouter::new(session),
            audit,
            max_body_bytes: config.server.max_body_bytes,
        });
        Self {
            config,
            state,
        }
    }

    /// Serves requests using the configured transport, then releases the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the transport or the release fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        let stop = ShutdownSignal::register()?;
        let served = match self.config.server.transport {
            ServerTransport::Stdio => serve_stdio(Arc::clone(&self.state), stop).await,
            ServerTransport::Http => serve_http(&self.config, Arc::clone(&self.state), stop).await,
        };
        let released = self.shutdown();
        served.and(released)
    }

    /// Releases the session and records the transition.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError::Session`] when the handle fails to close.
    pub fn shutdown(&self) -> Result<(), McpServerError> {
        let session = self.state.router.session();
        let was_active = session.state() == SessionState::Active;
        session.release().map_err(|err| McpServerError::Session(err.to_string()))?;
        if was_active {
            record_session(self.state.audit.as_ref(), session, SessionAction::Released);
        }
        Ok(())
    }
}

/// Emits a session lifecycle audit event.
fn record_session(audit: &dyn McpAuditSink, session: &SqliteSession, action: SessionAction) {
    let config = session.config();
    audit.record_session(&SessionAuditEvent::new(action, &config.path, &config.view_name));
}

/// Shared server state for all transports.
struct ServerState {
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Audit sink for request events.
    audit: Arc<dyn McpAuditSink>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
}

/// Per-request transport metadata.
#[derive(Debug, Clone)]
struct RequestContext {
    /// Transport carrying the request.
    transport: ServerTransport,
    /// Peer IP address when known.
    peer_ip: Option<String>,
}

impl RequestContext {
    /// Context for stdio requests.
    const fn stdio() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            peer_ip: None,
        }
    }

    /// Context for HTTP requests.
    fn http(peer: SocketAddr) -> Self {
        Self {
            transport: ServerTransport::Http,
            peer_ip: Some(peer.ip().to_string()),
        }
    }
}

/// Facts gathered while handling a request, for auditing.
#[derive(Debug, Clone)]
struct RequestFacts {
    /// Request identifier when provided.
    request_id: Option<String>,
    /// JSON-RPC method classification.
    method: McpMethod,
    /// Tool name or resource URI.
    target: Option<String>,
    /// Submitted SQL length in bytes.
    query_bytes: Option<usize>,
    /// Gate verdict for the submitted SQL.
    verdict: Option<VerdictKind>,
}

impl Default for RequestFacts {
    fn default() -> Self {
        Self {
            request_id: None,
            method: McpMethod::Invalid,
            target: None,
            query_bytes: None,
            verdict: None,
        }
    }
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// Serves JSON-RPC requests over stdin/stdout until stdin closes or a stop
/// signal arrives.
///
/// The blocking stdin loop runs on a detached thread so a pending read never
/// keeps the process alive after a signal.
async fn serve_stdio(
    state: Arc<ServerState>,
    stop: ShutdownSignal,
) -> Result<(), McpServerError> {
    let (sender, receiver) = oneshot::channel();
    let _worker = std::thread::Builder::new()
        .name("piggy-stdio".to_string())
        .spawn(move || {
            let mut reader = BufReader::new(std::io::stdin());
            let mut writer = std::io::stdout();
            let _ = sender.send(serve_stream(&state, &mut reader, &mut writer));
        })
        .map_err(|_| McpServerError::Transport("stdio worker spawn failed".to_string()))?;
    tokio::select! {
        served = receiver => served.unwrap_or_else(|_| {
            Err(McpServerError::Transport("stdio worker stopped".to_string()))
        }),
        () = stop.recv() => Ok(()),
    }
}

/// Serves framed JSON-RPC requests from any reader/writer pair.
fn serve_stream(
    state: &ServerState,
    reader: &mut BufReader<impl Read>,
    writer: &mut impl Write,
) -> Result<(), McpServerError> {
    let context = RequestContext::stdio();
    while let Some(frame) = read_framed(reader, state.max_body_bytes)? {
        let (_, payload) = dispatch(state, &context, &frame.body);
        if let Some(payload) = payload {
            write_framed(writer, &payload, frame.framing)?;
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Serves JSON-RPC requests over HTTP until a stop signal arrives.
async fn serve_http(
    config: &PiggyConfig,
    state: Arc<ServerState>,
    stop: ShutdownSignal,
) -> Result<(), McpServerError> {
    let addr =
        config.server.bind_addr().map_err(|err| McpServerError::Config(err.to_string()))?;
    let app = Router::new().route("/rpc", post(handle_http)).with_state(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| McpServerError::Transport("http bind failed".to_string()))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(stop.recv())
        .await
        .map_err(|_| McpServerError::Transport("http server failed".to_string()))
}

// ============================================================================
// SECTION: Shutdown Signals
// ============================================================================

/// Process signals that stop the server.
#[cfg(unix)]
struct ShutdownSignal {
    /// SIGINT stream.
    interrupt: Signal,
    /// SIGTERM stream.
    terminate: Signal,
}

#[cfg(unix)]
impl ShutdownSignal {
    /// Installs the SIGINT and SIGTERM handlers.
    fn register() -> Result<Self, McpServerError> {
        let install = |kind: SignalKind| {
            signal(kind)
                .map_err(|_| McpServerError::Init("signal handler install failed".to_string()))
        };
        Ok(Self {
            interrupt: install(SignalKind::interrupt())?,
            terminate: install(SignalKind::terminate())?,
        })
    }

    /// Resolves when either signal arrives.
    async fn recv(mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => {}
            _ = self.terminate.recv() => {}
        }
    }
}

/// Process signals that stop the server.
#[cfg(not(unix))]
struct ShutdownSignal;

#[cfg(not(unix))]
impl ShutdownSignal {
    /// Ctrl-C is installed lazily on first poll.
    #[allow(clippy::unnecessary_wraps, reason = "Matches the unix signature.")]
    const fn register() -> Result<Self, McpServerError> {
        Ok(Self)
    }

    /// Resolves on Ctrl-C.
    async fn recv(self) {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Handles HTTP JSON-RPC requests.
async fn handle_http(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    bytes: Bytes,
) -> Response {
    let context = RequestContext::http(peer);
    match dispatch(&state, &context, &bytes) {
        (status, Some(payload)) => {
            (status, [(CONTENT_TYPE, "application/json")], payload).into_response()
        }
        (_, None) => StatusCode::ACCEPTED.into_response(),
    }
}

// ============================================================================
// SECTION: JSON-RPC Handling
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier; absent for notifications.
    #[serde(default)]
    id: Option<Value>,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
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
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Value,
}

/// Resource read parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ResourceReadParams {
    /// Resource URI.
    uri: String,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Registered tool definitions.
    tools: Vec<ToolDefinition>,
}

/// Tool call response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolCallResult {
    /// Tool output content.
    content: Vec<ToolContent>,
    /// Always false: query faults are delivered as text.
    is_error: bool,
}

/// Tool output payloads for JSON-RPC responses.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ToolContent {
    /// Text tool output.
    Text {
        /// Text payload.
        text: String,
    },
}

/// Resource list response payload.
#[derive(Debug, Serialize)]
struct ResourceListResult {
    /// Published resources.
    resources: Vec<ResourceDefinition>,
}

/// Resource read response payload.
#[derive(Debug, Serialize)]
struct ResourceReadResult {
    /// Resource bodies.
    contents: Vec<ResourceContents>,
}

/// Handles one raw request end to end and records its audit event.
fn dispatch(
    state: &ServerState,
    context: &RequestContext,
    bytes: &[u8],
) -> (StatusCode, Option<Vec<u8>>) {
    let mut facts = RequestFacts::default();
    let (status, response) = parse_request(state, &mut facts, bytes);
    let error_code = response.as_ref().and_then(|response| response.error.as_ref()).map(|e| e.code);
    let payload = response.map(|response| {
        serde_json::to_vec(&response)
            .unwrap_or_else(|_| SERIALIZATION_FAILURE_BODY.as_bytes().to_vec())
    });
    state.audit.record(&McpAuditEvent::new(McpAuditEventParams {
        request_id: facts.request_id,
        transport: context.transport,
        peer_ip: context.peer_ip.clone(),
        method: facts.method,
        target: facts.target,
        outcome: if error_code.is_some() { McpOutcome::Error } else { McpOutcome::Ok },
        error_code,
        request_bytes: bytes.len(),
        response_bytes: payload.as_ref().map_or(0, Vec::len),
        query_bytes: facts.query_bytes,
        verdict: facts.verdict,
    }));
    (status, payload)
}

/// Parses and validates a JSON-RPC request payload.
fn parse_request(
    state: &ServerState,
    facts: &mut RequestFacts,
    bytes: &[u8],
) -> (StatusCode, Option<JsonRpcResponse>) {
    if bytes.len() > state.max_body_bytes {
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            Value::Null,
            -32070,
            "request body too large".to_string(),
        );
    }
    let request: Result<JsonRpcRequest, _> = serde_json::from_slice(bytes);
    request.map_or_else(
        |_| {
            error_response(
                StatusCode::BAD_REQUEST,
                Value::Null,
                -32600,
                "invalid json-rpc request".to_string(),
            )
        },
        |request| handle_request(&state.router, facts, request),
    )
}

/// Dispatches a JSON-RPC request to the tool router.
fn handle_request(
    router: &ToolRouter,
    facts: &mut RequestFacts,
    request: JsonRpcRequest,
) -> (StatusCode, Option<JsonRpcResponse>) {
    facts.method = McpMethod::from_name(&request.method);
    facts.request_id = request.id.as_ref().map(Value::to_string);
    if request.jsonrpc != "2.0" {
        return error_response(
            StatusCode::BAD_REQUEST,
            request.id.unwrap_or(Value::Null),
            -32600,
            "invalid json-rpc version".to_string(),
        );
    }
    let Some(id) = request.id else {
        return (StatusCode::ACCEPTED, None);
    };
    let params = request.params.unwrap_or(Value::Null);
    match request.method.as_str() {
        "initialize" => respond(id, &initialize_result()),
        "ping" => respond(id, &json!({})),
        "tools/list" => respond(
            id,
            &ToolListResult {
                tools: router.list_tools(),
            },
        ),
        "tools/call" => {
            let Ok(call) = serde_json::from_value::<ToolCallParams>(params) else {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    id,
                    -32602,
                    "invalid tool params".to_string(),
                );
            };
            facts.target = Some(call.name.clone());
            match with_blocking(|| router.handle_tool_call(&call.name, call.arguments)) {
                Ok(outcome) => {
                    facts.query_bytes = Some(outcome.query_bytes);
                    facts.verdict = Some(outcome.verdict);
                    respond(
                        id,
                        &ToolCallResult {
                            content: vec![ToolContent::Text {
                                text: outcome.text,
                            }],
                            is_error: false,
                        },
                    )
                }
                Err(err) => jsonrpc_error(id, err),
            }
        }
        "resources/list" => respond(
            id,
            &ResourceListResult {
                resources: router.list_resources(),
            },
        ),
        "resources/read" => {
            let Ok(read) = serde_json::from_value::<ResourceReadParams>(params) else {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    id,
                    -32602,
                    "invalid resource params".to_string(),
                );
            };
            facts.target = Some(read.uri.clone());
            match with_blocking(|| router.read_resource(&read.uri)) {
                Ok(contents) => respond(
                    id,
                    &ResourceReadResult {
                        contents: vec![contents],
                    },
                ),
                Err(err) => jsonrpc_error(id, err),
            }
        }
        _ => error_response(StatusCode::BAD_REQUEST, id, -32601, "method not found".to_string()),
    }
}

/// Builds the `initialize` result payload.
fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "resources": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        },
        "instructions": INTRO_TEXT
    })
}

/// Runs handle-touching work, shifting to a blocking context when available.
fn with_blocking<T>(work: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

/// Builds a successful JSON-RPC response.
fn respond<T: Serialize>(id: Value, result: &T) -> (StatusCode, Option<JsonRpcResponse>) {
    match serde_json::to_value(result) {
        Ok(value) => (
            StatusCode::OK,
            Some(JsonRpcResponse {
                jsonrpc: "2.0",
                id,
                result: Some(value),
                error: None,
            }),
        ),
        Err(_) => jsonrpc_error(id, ToolError::Serialization),
    }
}

/// Builds a JSON-RPC error response.
fn error_response(
    status: StatusCode,
    id: Value,
    code: i64,
    message: String,
) -> (StatusCode, Option<JsonRpcResponse>) {
    (
        status,
        Some(JsonRpcResponse {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
            }),
        }),
    )
}

/// Builds a JSON-RPC error response for a routing failure.
fn jsonrpc_error(id: Value, error: ToolError) -> (StatusCode, Option<JsonRpcResponse>) {
    let (status, code, message) = match error {
        ToolError::UnknownTool => (StatusCode::BAD_REQUEST, -32601, "unknown tool".to_string()),
        ToolError::InvalidParams(message) => (StatusCode::BAD_REQUEST, -32602, message),
        ToolError::NotFound(message) => (StatusCode::OK, -32004, message),
        ToolError::Internal(message) => (StatusCode::OK, -32050, message),
        ToolError::Serialization => (StatusCode::OK, -32060, "serialization failed".to_string()),
    };
    error_response(status, id, code, message)
}

// ============================================================================
// SECTION: Framing Helpers
// ============================================================================

/// Wire framing of one stdio message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    /// One JSON-RPC message per newline-terminated line.
    Line,
    /// A `Content-Length` header block followed by the body.
    ContentLength,
}

/// One message read from stdio.
#[derive(Debug)]
struct InboundFrame {
    /// Message body.
    body: Vec<u8>,
    /// Framing the peer used; the response is written the same way.
    framing: Framing,
}

/// Reads the next stdio message.
///
/// Messages are newline-delimited JSON. A line starting with
/// `Content-Length:` switches that message to header framing. Blank lines
/// between messages are skipped. Returns `None` when the stream ends before a
/// new message starts.
fn read_framed(
    reader: &mut BufReader<impl Read>,
    max_body_bytes: usize,
) -> Result<Option<InboundFrame>, McpServerError> {
    let limit = u64::try_from(max_body_bytes).unwrap_or(u64::MAX).saturating_add(2);
    let mut line = Vec::new();
    loop {
        line.clear();
        let bytes = reader
            .by_ref()
            .take(limit)
            .read_until(b'\n', &mut line)
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        if bytes == 0 {
            return Ok(None);
        }
        let message = line.trim_ascii();
        if message.len() > max_body_bytes
            || (!line.ends_with(b"\n") && u64::try_from(bytes).is_ok_and(|read| read >= limit))
        {
            return Err(McpServerError::Transport("payload too large".to_string()));
        }
        if message.is_empty() {
            continue;
        }
        if let Some(value) = message.strip_prefix(b"Content-Length:") {
            let body = read_header_framed(reader, value, max_body_bytes)?;
            return Ok(Some(InboundFrame {
                body,
                framing: Framing::ContentLength,
            }));
        }
        return Ok(Some(InboundFrame {
            body: message.to_vec(),
            framing: Framing::Line,
        }));
    }
}

/// Reads the rest of a `Content-Length` framed message after its first header.
fn read_header_framed(
    reader: &mut BufReader<impl Read>,
    first_value: &[u8],
    max_body_bytes: usize,
) -> Result<Vec<u8>, McpServerError> {
    let mut content_length = parse_content_length(first_value)?;
    let mut line = String::new();
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
        if bytes == 0 {
            return Err(McpServerError::Transport("stdio closed mid-frame".to_string()));
        }
        if line.trim().is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Content-Length:") {
            content_length = parse_content_length(value.as_bytes())?;
        }
    }
    if content_length > max_body_bytes {
        return Err(McpServerError::Transport("payload too large".to_string()));
    }
    let mut buf = vec![0u8; content_length];
    reader
        .read_exact(&mut buf)
        .map_err(|_| McpServerError::Transport("stdio read failed".to_string()))?;
    Ok(buf)
}

/// Parses a `Content-Length` header value.
fn parse_content_length(value: &[u8]) -> Result<usize, McpServerError> {
    std::str::from_utf8(value)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .ok_or_else(|| McpServerError::Transport("invalid content length".to_string()))
}

/// Writes one stdio response using the framing the request arrived in.
fn write_framed(
    writer: &mut impl Write,
    payload: &[u8],
    framing: Framing,
) -> Result<(), McpServerError> {
    let written = match framing {
        Framing::Line => writer.write_all(payload).and_then(|()| writer.write_all(b"\n")),
        Framing::ContentLength => {
            let header = format!("Content-Length: {}\r\n\r\n", payload.len());
            writer.write_all(header.as_bytes()).and_then(|()| writer.write_all(payload))
        }
    };
    written
        .and_then(|()| writer.flush())
        .map_err(|_| McpServerError::Transport("stdio write failed".to_string()))
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
    /// Session release errors.
    #[error("session error: {0}")]
    Session(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
