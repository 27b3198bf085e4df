// crates/piggy-mcp/src/audit.rs
// ============================================================================
// Module: MCP Audit Logging
// Description: Structured audit events for MCP requests and session lifecycle.
// Purpose: Emit redacted JSON-line audit logs without hard dependencies.
// Dependencies: piggy-config, piggy-gate, serde
// ============================================================================

//! ## Overview
//! Audit events are serialized as one JSON object per line. Query text is
//! never recorded: a `tools/call` event carries only the byte length of the
//! submitted SQL and the gate verdict.

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

use piggy_config::ServerAuditConfig;
use piggy_config::ServerTransport;
use piggy_gate::VerdictKind;
use serde::Serialize;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// JSON-RPC method classification for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum McpMethod {
    /// JSON-RPC initialize.
    Initialize,
    /// JSON-RPC ping.
    Ping,
    /// JSON-RPC tools/list.
    ToolsList,
    /// JSON-RPC tools/call.
    ToolsCall,
    /// JSON-RPC resources/list.
    ResourcesList,
    /// JSON-RPC resources/read.
    ResourcesRead,
    /// Client notification.
    Notification,
    /// Invalid or malformed JSON-RPC request.
    Invalid,
    /// Unsupported JSON-RPC method.
    Other,
}

impl McpMethod {
    /// Classifies a JSON-RPC method name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "initialize" => Self::Initialize,
            "ping" => Self::Ping,
            "tools/list" => Self::ToolsList,
            "tools/call" => Self::ToolsCall,
            "resources/list" => Self::ResourcesList,
            "resources/read" => Self::ResourcesRead,
            other if other.starts_with("notifications/") => Self::Notification,
            _ => Self::Other,
        }
    }

    /// Returns a stable label for the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Ping => "ping",
            Self::ToolsList => "tools/list",
            Self::ToolsCall => "tools/call",
            Self::ResourcesList => "resources/list",
            Self::ResourcesRead => "resources/read",
            Self::Notification => "notification",
            Self::Invalid => "invalid",
            Self::Other => "other",
        }
    }
}

/// Request outcome for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum McpOutcome {
    /// Successful request.
    Ok,
    /// Failed request.
    Error,
}

/// Session lifecycle transitions recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    /// The handle was opened and the bootstrap view provisioned.
    Opened,
    /// The handle was released.
    Released,
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// MCP request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct McpAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Transport used for the request.
    pub transport: ServerTransport,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// JSON-RPC method classification.
    pub method: McpMethod,
    /// Tool name or resource URI when available.
    pub target: Option<String>,
    /// Request outcome.
    pub outcome: McpOutcome,
    /// JSON-RPC error code when present.
    pub error_code: Option<i64>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Length of the submitted SQL text in bytes (tools/call only).
    pub query_bytes: Option<usize>,
    /// Gate verdict for the submitted SQL (tools/call only).
    pub verdict: Option<VerdictKind>,
}

/// Inputs required to construct a request audit event.
pub struct McpAuditEventParams {
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Transport type used for the request.
    pub transport: ServerTransport,
    /// Peer IP address if known.
    pub peer_ip: Option<String>,
    /// JSON-RPC method classification.
    pub method: McpMethod,
    /// Tool name or resource URI when available.
    pub target: Option<String>,
    /// Request outcome.
    pub outcome: McpOutcome,
    /// JSON-RPC error code when present.
    pub error_code: Option<i64>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Response body size in bytes.
    pub response_bytes: usize,
    /// Length of the submitted SQL text in bytes.
    pub query_bytes: Option<usize>,
    /// Gate verdict for the submitted SQL.
    pub verdict: Option<VerdictKind>,
}

impl McpAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: McpAuditEventParams) -> Self {
        Self {
            event: "mcp_request",
            timestamp_ms: now_ms(),
            request_id: params.request_id,
            transport: params.transport,
            peer_ip: params.peer_ip,
            method: params.method,
            target: params.target,
            outcome: params.outcome,
            error_code: params.error_code,
            request_bytes: params.request_bytes,
            response_bytes: params.response_bytes,
            query_bytes: params.query_bytes,
            verdict: params.verdict,
        }
    }
}

/// Session lifecycle audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SessionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Lifecycle transition.
    pub action: SessionAction,
    /// Database path the session serves.
    pub database: String,
    /// Bootstrap view name.
    pub view_name: String,
}

impl SessionAuditEvent {
    /// Creates a new session lifecycle event with a consistent timestamp.
    #[must_use]
    pub fn new(action: SessionAction, database: &Path, view_name: &str) -> Self {
        Self {
            event: "session_lifecycle",
            timestamp_ms: now_ms(),
            action,
            database: database.display().to_string(),
            view_name: view_name.to_string(),
        }
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for MCP events.
pub trait McpAuditSink: Send + Sync {
    /// Record a request audit event.
    fn record(&self, event: &McpAuditEvent);

    /// Record a session lifecycle event.
    fn record_session(&self, _event: &SessionAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct McpStderrAuditSink;

impl McpAuditSink for McpStderrAuditSink {
    fn record(&self, event: &McpAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_session(&self, event: &SessionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct McpFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl McpFileAuditSink {
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

impl McpAuditSink for McpFileAuditSink {
    fn record(&self, event: &McpAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.append(&payload);
        }
    }

    fn record_session(&self, event: &SessionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.append(&payload);
        }
    }
}

/// No-op audit sink.
pub struct McpNoopAuditSink;

impl McpAuditSink for McpNoopAuditSink {
    fn record(&self, _event: &McpAuditEvent) {}
}

/// Builds the audit sink selected by configuration.
///
/// # Errors
///
/// Returns an error when the configured audit file cannot be opened.
pub fn sink_from_config(config: &ServerAuditConfig) -> io::Result<Arc<dyn McpAuditSink>> {
    if !config.enabled {
        return Ok(Arc::new(McpNoopAuditSink));
    }
    match config.path.as_deref() {
        Some(path) => Ok(Arc::new(McpFileAuditSink::new(Path::new(path.trim()))?)),
        None => Ok(Arc::new(McpStderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::missing_docs_in_private_items,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions."
    )]

    use std::fs;
    use std::path::Path;

    use piggy_config::ServerAuditConfig;
    use piggy_config::ServerTransport;
    use piggy_gate::VerdictKind;
    use serde_json::Value;
    use tempfile::TempDir;

    use super::McpAuditEvent;
    use super::McpAuditEventParams;
    use super::McpMethod;
    use super::McpOutcome;
    use super::SessionAction;
    use super::SessionAuditEvent;
    use super::sink_from_config;

    fn sample_event() -> McpAuditEvent {
        McpAuditEvent::new(McpAuditEventParams {
            request_id: Some("7".to_string()),
            transport: ServerTransport::Stdio,
            peer_ip: None,
            method: McpMethod::ToolsCall,
            target: Some("query_data".to_string()),
            outcome: McpOutcome::Ok,
            error_code: None,
            request_bytes: 90,
            response_bytes: 40,
            query_bytes: Some(19),
            verdict: Some(VerdictKind::Rejected),
        })
    }

    #[test]
    fn method_names_classify() {
        assert_eq!(McpMethod::from_name("tools/call"), McpMethod::ToolsCall);
        assert_eq!(McpMethod::from_name("notifications/initialized"), McpMethod::Notification);
        assert_eq!(McpMethod::from_name("sampling/createMessage"), McpMethod::Other);
        assert_eq!(McpMethod::ResourcesRead.as_str(), "resources/read");
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("audit.jsonl");
        let sink = sink_from_config(&ServerAuditConfig {
            enabled: true,
            path: Some(path.display().to_string()),
        })
        .unwrap();
        sink.record(&sample_event());
        sink.record_session(&SessionAuditEvent::new(
            SessionAction::Released,
            Path::new("./piggy.sqlite"),
            "expenses",
        ));
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> =
            contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "mcp_request");
        assert_eq!(lines[0]["method"], "tools_call");
        assert_eq!(lines[0]["verdict"], "rejected");
        assert_eq!(lines[0]["query_bytes"], 19);
        assert_eq!(lines[1]["event"], "session_lifecycle");
        assert_eq!(lines[1]["action"], "released");
    }

    #[test]
    fn disabled_audit_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("audit.jsonl");
        let sink = sink_from_config(&ServerAuditConfig {
            enabled: false,
            path: Some(path.display().to_string()),
        })
        .unwrap();
        sink.record(&sample_event());
        assert!(!path.exists());
    }
}
