// crates/piggy-mcp/src/tools.rs
// ============================================================================
// Module: MCP Tool Router
// Description: Tool and resource routing for the Piggy Explorer server.
// Purpose: Decode tool payloads and hand SQL to the query gate.
// Dependencies: piggy-store-sqlite, serde, serde_json
// ============================================================================

//! ## Overview
//! [`ToolRouter`] owns the [`QueryGate`] and the [`ResourceCatalog`]. The
//! only tool is `query_data`. Malformed arguments are protocol errors
//! ([`ToolError::InvalidParams`]); everything that happens to the SQL itself
//! (rejection, engine fault, closed session) is a successful tool result
//! whose text starts with `Error: `.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use piggy_gate::VerdictKind;
use piggy_store_sqlite::QueryGate;
use piggy_store_sqlite::SqliteSession;
use piggy_store_sqlite::render_outcome;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::resources::ResourceCatalog;
use crate::resources::ResourceContents;
use crate::resources::ResourceDefinition;
use crate::resources::ResourceError;

// ============================================================================
// SECTION: Tool Names
// ============================================================================

/// Published tool names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    /// Gated SQL execution.
    QueryData,
}

impl ToolName {
    /// Parses a wire tool name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "query_data" => Some(Self::QueryData),
            _ => None,
        }
    }

    /// Returns the wire tool name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QueryData => "query_data",
        }
    }
}

/// Tool definition used by MCP tool listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: &'static str,
    /// Tool description for clients.
    pub description: &'static str,
    /// JSON schema for tool input.
    pub input_schema: Value,
}

/// `query_data` arguments.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QueryDataRequest {
    /// SQL text to classify and run.
    sql: String,
}

/// Result of a routed tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallOutcome {
    /// Text payload delivered to the client.
    pub text: String,
    /// Length of the submitted SQL in bytes.
    pub query_bytes: usize,
    /// Gate verdict for the submitted SQL.
    pub verdict: VerdictKind,
}

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Tool router for MCP requests.
#[derive(Clone)]
pub struct ToolRouter {
    /// Gate executing caller SQL.
    gate: QueryGate,
    /// Published resources.
    resources: ResourceCatalog,
}

impl ToolRouter {
    /// Creates a router over the serving session.
    #[must_use]
    pub fn new(session: Arc<SqliteSession>) -> Self {
        Self {
            gate: QueryGate::new(Arc::clone(&session)),
            resources: ResourceCatalog::new(session),
        }
    }

    /// Returns the session behind this router.
    #[must_use]
    pub const fn session(&self) -> &Arc<SqliteSession> {
        self.gate.session()
    }

    /// Lists the published tools.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: ToolName::QueryData.as_str(),
            description: "Execute SELECT SQLs safely. Statements containing insert, update, \
                          delete, drop, alter, create, pragma, or attach are refused.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "sql": {
                        "type": "string",
                        "description": "SQL SELECT statement to run against the export"
                    }
                },
                "required": ["sql"],
                "additionalProperties": false
            }),
        }]
    }

    /// Handles a tool call by name with JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when the tool is unknown or its arguments do not
    /// decode. Query failures are returned as text, never as errors.
    pub fn handle_tool_call(&self, name: &str, payload: Value) -> Result<ToolCallOutcome, ToolError> {
        let tool = ToolName::parse(name).ok_or(ToolError::UnknownTool)?;
        match tool {
            ToolName::QueryData => self.handle_query_data(payload),
        }
    }

    /// Lists the published resources.
    #[must_use]
    pub fn list_resources(&self) -> Vec<ResourceDefinition> {
        self.resources.definitions()
    }

    /// Reads a published resource.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] for unknown URIs and
    /// [`ToolError::Internal`] when the view definition cannot be read.
    pub fn read_resource(&self, uri: &str) -> Result<ResourceContents, ToolError> {
        self.resources.read(uri).map_err(|err| match err {
            ResourceError::NotFound(uri) => ToolError::NotFound(format!("unknown resource: {uri}")),
            ResourceError::Session(err) => ToolError::Internal(err.to_string()),
        })
    }

    /// Handles `query_data` requests.
    fn handle_query_data(&self, payload: Value) -> Result<ToolCallOutcome, ToolError> {
        let request = decode::<QueryDataRequest>(payload)?;
        let verdict = self.gate.evaluate(&request.sql).kind();
        let text = render_outcome(self.gate.run(&request.sql));
        Ok(ToolCallOutcome {
            text,
            query_bytes: request.sql.len(),
            verdict,
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool routing errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool name not recognized.
    #[error("unknown tool")]
    UnknownTool,
    /// Tool payload deserialization failed.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Tool payload serialization failed.
    #[error("serialization failure")]
    Serialization,
    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::InvalidParams(_) => "invalid_params",
            Self::NotFound(_) => "not_found",
            Self::Serialization => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a JSON payload into a typed request.
fn decode<T: for<'de> Deserialize<'de>>(payload: Value) -> Result<T, ToolError> {
    serde_json::from_value(payload).map_err(|err| ToolError::InvalidParams(err.to_string()))
}
