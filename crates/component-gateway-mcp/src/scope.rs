// crates/component-gateway-mcp/src/scope.rs
// ============================================================================
// Module: Tool Scope
// Description: Component subset and read-only flag for a request.
// Purpose: Derive request scope from the URL path and MCP headers.
// Dependencies: component-gateway-config
// ============================================================================

//! ## Overview
//! Accepted paths:
//! - `/mcp` and `/mcp/readonly` cover every component.
//! - `/mcp/x/{component}` and `/mcp/x/{component}/readonly` cover one.
//!
//! `X-MCP-Toolsets` narrows the component set further and `X-MCP-Readonly`
//! forces read-only mode. Read-only scopes list tools but never call them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::parse_bool_flag;
use crate::config::parse_component_names;
use crate::directory::ComponentDirectory;
use crate::directory::ComponentRef;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header restricting the participating components.
pub const TOOLSETS_HEADER: &str = "x-mcp-toolsets";
/// Header forcing read-only mode.
pub const READONLY_HEADER: &str = "x-mcp-readonly";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Component subset and read-only flag for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolScope {
    /// Single component selected by path, `None` for all.
    component: Option<String>,
    /// Whether `tools/call` is refused.
    readonly: bool,
    /// Components named by `X-MCP-Toolsets`.
    toolsets: Option<BTreeSet<String>>,
}

impl ToolScope {
    /// Parses the request path; returns `None` for unknown endpoints.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.strip_suffix('/').filter(|rest| !rest.is_empty()).unwrap_or(path);
        let mut segments = trimmed.strip_prefix("/mcp")?.split('/');
        if segments.next() != Some("") {
            return None;
        }
        let rest: Vec<&str> = segments.collect();
        let (component, readonly) = match rest.as_slice() {
            [] => (None, false),
            ["readonly"] => (None, true),
            ["x", component] if !component.is_empty() => (Some((*component).to_string()), false),
            ["x", component, "readonly"] if !component.is_empty() => {
                (Some((*component).to_string()), true)
            }
            _ => return None,
        };
        Some(Self {
            component,
            readonly,
            toolsets: None,
        })
    }

    /// Applies the `X-MCP-Toolsets` header value.
    #[must_use]
    pub fn with_toolsets(mut self, header: Option<&str>) -> Self {
        let names = header.map(parse_component_names).unwrap_or_default();
        if !names.is_empty() {
            self.toolsets = Some(names.into_iter().collect());
        }
        self
    }

    /// Applies the `X-MCP-Readonly` header value.
    #[must_use]
    pub fn with_readonly_header(mut self, header: Option<&str>) -> Self {
        if header.and_then(parse_bool_flag).unwrap_or(false) {
            self.readonly = true;
        }
        self
    }

    /// Returns the path-selected component, if any.
    #[must_use]
    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    /// Returns true when tool execution is refused.
    #[must_use]
    pub const fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Returns true when the path does not select a single component.
    #[must_use]
    pub const fn is_unscoped(&self) -> bool {
        self.component.is_none()
    }

    /// Returns true when the component participates in this scope.
    #[must_use]
    pub fn allows(&self, identifier: &str) -> bool {
        let path_allows = self.component.as_deref().is_none_or(|selected| selected == identifier);
        let toolsets_allow =
            self.toolsets.as_ref().is_none_or(|toolsets| toolsets.contains(identifier));
        path_allows && toolsets_allow
    }

    /// Returns participating components in directory order.
    #[must_use]
    pub fn select(&self, directory: &ComponentDirectory) -> Vec<Arc<ComponentRef>> {
        directory
            .components()
            .iter()
            .filter(|component| self.allows(component.identifier()))
            .cloned()
            .collect()
    }

    /// Returns a stable label for logging.
    #[must_use]
    pub fn label(&self) -> String {
        let base = self.component.as_deref().unwrap_or("all");
        if self.readonly { format!("{base}:readonly") } else { base.to_string() }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
