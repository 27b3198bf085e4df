// crates/piggy-mcp/src/resources.rs
// ============================================================================
// Module: MCP Resources
// Description: Introduction and view-definition resources.
// Purpose: Tell MCP clients what the export holds and how to query it.
// Dependencies: piggy-store-sqlite, serde
// ============================================================================

//! ## Overview
//! Two read-only resources are published. `intro://readme` is fixed prose.
//! `schema://explain-expenses-view` reads the bootstrap view's definition
//! from `sqlite_master` on every request, so it always reflects the file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use piggy_store_sqlite::SessionError;
use piggy_store_sqlite::SqliteSession;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// URI of the introduction resource.
pub const INTRO_URI: &str = "intro://readme";
/// URI of the view definition resource.
pub const EXPLAIN_VIEW_URI: &str = "schema://explain-expenses-view";
/// MIME type of every resource payload.
const TEXT_MIME_TYPE: &str = "text/plain";

/// Guidance returned by [`INTRO_URI`].
pub const INTRO_TEXT: &str = "This MCP server allows reading of a sqlite database exported from \
                              Money Manager - a personal finance app.\n\n1. For most cases, one \
                              only needs to read from the expenses view.\n2. Do your best to \
                              avoid reading from other tables with prefix Z.";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Resource entry returned by `resources/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    /// Resource URI.
    pub uri: &'static str,
    /// Short resource name.
    pub name: &'static str,
    /// Resource description for clients.
    pub description: &'static str,
    /// Payload MIME type.
    pub mime_type: &'static str,
}

/// Resource body returned by `resources/read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    /// Resource URI.
    pub uri: String,
    /// Payload MIME type.
    pub mime_type: &'static str,
    /// Text payload.
    pub text: String,
}

/// Resource read failures.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The URI is not published.
    #[error("resource not found: {0}")]
    NotFound(String),
    /// The view definition could not be read.
    #[error(transparent)]
    Session(#[from] SessionError),
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Published resources backed by the serving session.
#[derive(Clone)]
pub struct ResourceCatalog {
    /// Session used to read the live view definition.
    session: Arc<SqliteSession>,
}

impl ResourceCatalog {
    /// Creates a catalog over the provided session.
    #[must_use]
    pub const fn new(session: Arc<SqliteSession>) -> Self {
        Self {
            session,
        }
    }

    /// Returns the published resource entries.
    #[must_use]
    pub fn definitions(&self) -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition {
                uri: INTRO_URI,
                name: "readme",
                description: "Explain to MCP clients how to work with this server",
                mime_type: TEXT_MIME_TYPE,
            },
            ResourceDefinition {
                uri: EXPLAIN_VIEW_URI,
                name: "explain-expenses-view",
                description: "The main view that clients should query",
                mime_type: TEXT_MIME_TYPE,
            },
        ]
    }

    /// Reads a resource by URI.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when the URI is unknown or the view
    /// definition cannot be read.
    pub fn read(&self, uri: &str) -> Result<ResourceContents, ResourceError> {
        let text = match uri {
            INTRO_URI => INTRO_TEXT.to_string(),
            EXPLAIN_VIEW_URI => self.explain_view()?,
            other => return Err(ResourceError::NotFound(other.to_string())),
        };
        Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type: TEXT_MIME_TYPE,
            text,
        })
    }

    /// Renders the live view definition.
    fn explain_view(&self) -> Result<String, SessionError> {
        let view_name = &self.session.config().view_name;
        let definition = self.session.view_definition()?.ok_or_else(|| {
            SessionError::ViewMissing(view_name.clone())
        })?;
        Ok(format!("The DML of {view_name} view:\n{definition}"))
    }
}
