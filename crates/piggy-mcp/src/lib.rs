// crates/piggy-mcp/src/lib.rs
// ============================================================================
// Module: Piggy MCP
// Description: MCP server exposing a finance export to MCP clients.
// Purpose: Provide JSON-RPC transports over the gated SQLite session.
// Dependencies: piggy-config, piggy-store-sqlite, axum, tokio
// ============================================================================

//! ## Overview
//! Piggy MCP publishes two resources (`intro://readme`,
//! `schema://explain-expenses-view`) and one tool (`query_data`). Tool calls
//! are thin wrappers over [`piggy_store_sqlite::QueryGate`]; the server owns
//! no database state beyond the session it is given.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod resources;
pub mod server;
pub mod tools;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::McpAuditEvent;
pub use audit::McpAuditSink;
pub use audit::McpFileAuditSink;
pub use audit::McpNoopAuditSink;
pub use audit::McpStderrAuditSink;
pub use audit::SessionAuditEvent;
pub use resources::ResourceCatalog;
pub use server::McpServer;
pub use server::McpServerError;
pub use tools::ToolError;
pub use tools::ToolRouter;
