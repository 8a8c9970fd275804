// crates/component-gateway-mcp/src/catalog.rs
// ============================================================================
// Module: Tool Catalog
// Description: Tool descriptors, per-component listings, and the merged catalog.
// Purpose: Map exposed tool names to the component that owns them.
// Dependencies: jsonschema, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ComponentListing`] holds one component's de-duplicated tools. The
//! [`ToolCatalog`] merges listings in directory order, applying the
//! configured [`DuplicatePolicy`] to cross-component name collisions. Each
//! [`DiscoveredTool`] memoizes its compiled input schema so a schema is
//! compiled at most once for the lifetime of the tool entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

use jsonschema::Validator;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::DuplicatePolicy;
use crate::directory::ComponentRef;
use crate::validation::compile_input_schema;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between component and tool in prefixed names.
pub const PREFIX_SEPARATOR: &str = "__";

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// Tool descriptor as published by a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool name, unique within its component.
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool arguments.
    pub input_schema: Value,
    /// JSON Schema for structured output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
    /// Behavioral hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
    /// Opaque component metadata.
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// A discovered tool with its lazily compiled input schema.
pub struct DiscoveredTool {
    /// Descriptor as published by the component.
    descriptor: ToolDescriptor,
    /// Compiled schema or the compile failure reason.
    compiled: OnceLock<Result<Validator, String>>,
}

impl DiscoveredTool {
    /// Wraps a descriptor; the schema is compiled on first use.
    #[must_use]
    pub const fn new(descriptor: ToolDescriptor) -> Self {
        Self {
            descriptor,
            compiled: OnceLock::new(),
        }
    }

    /// Returns the published descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Returns the component-local tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Returns the compiled input schema, compiling it on first call.
    ///
    /// # Errors
    ///
    /// Returns the compile failure reason when the schema is invalid.
    pub fn compiled_schema(&self) -> Result<&Validator, &str> {
        self.compiled
            .get_or_init(|| compile_input_schema(&self.descriptor.input_schema))
            .as_ref()
            .map_err(String::as_str)
    }

    /// Returns true once the schema has been compiled (or failed to).
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }
}

impl fmt::Debug for DiscoveredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredTool")
            .field("name", &self.descriptor.name)
            .field("compiled", &self.is_compiled())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Listings
// ============================================================================

/// Tools published by one component.
#[derive(Debug, Clone)]
pub struct ComponentListing {
    /// Owning component.
    component: Arc<ComponentRef>,
    /// Tools in published order, unique by name.
    tools: Vec<Arc<DiscoveredTool>>,
}

impl ComponentListing {
    /// Builds a listing, dropping later duplicates inside the same listing.
    ///
    /// Returns the listing and the names of dropped duplicates.
    #[must_use]
    pub fn from_descriptors(
        component: Arc<ComponentRef>,
        descriptors: Vec<ToolDescriptor>,
    ) -> (Self, Vec<String>) {
        let mut seen = BTreeSet::new();
        let mut dropped = Vec::new();
        let mut tools = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if seen.insert(descriptor.name.clone()) {
                tools.push(Arc::new(DiscoveredTool::new(descriptor)));
            } else {
                dropped.push(descriptor.name);
            }
        }
        (
            Self {
                component,
                tools,
            },
            dropped,
        )
    }

    /// Returns the owning component.
    #[must_use]
    pub const fn component(&self) -> &Arc<ComponentRef> {
        &self.component
    }

    /// Returns the listed tools.
    #[must_use]
    pub fn tools(&self) -> &[Arc<DiscoveredTool>] {
        &self.tools
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Catalog entry binding an exposed name to its tool and component.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Name exposed to clients.
    pub exposed_name: String,
    /// Discovered tool.
    pub tool: Arc<DiscoveredTool>,
    /// Owning component.
    pub component: Arc<ComponentRef>,
}

/// Cross-component collision resolved by the duplicate policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCollision {
    /// Colliding exposed name.
    pub tool: String,
    /// Component whose entry was kept.
    pub kept: String,
    /// Component whose entry was discarded.
    pub discarded: String,
}

/// Collision rejected under [`DuplicatePolicy::Reject`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tool '{tool}' is published by both '{first}' and '{second}'")]
pub struct DuplicateToolError {
    /// Colliding exposed name.
    pub tool: String,
    /// Component that published the name first.
    pub first: String,
    /// Component that published the name again.
    pub second: String,
}

/// Result of merging listings into a catalog.
#[derive(Debug)]
pub struct CatalogBuild {
    /// Merged catalog.
    pub catalog: ToolCatalog,
    /// Collisions resolved while merging.
    pub collisions: Vec<ToolCollision>,
}

/// Map from exposed tool name to owning component.
///
/// # Invariants
/// - Exposed names are unique.
/// - Entry order follows directory order, then published order.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    /// Entries in merge order.
    entries: Vec<CatalogEntry>,
    /// Exposed name to entry index.
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Merges listings (in directory order) into a catalog.
    ///
    /// With `prefixed`, exposed names become `{component}__{tool}`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateToolError`] when the policy is
    /// [`DuplicatePolicy::Reject`] and two components publish the same name.
    pub fn build(
        listings: &[ComponentListing],
        prefixed: bool,
        policy: DuplicatePolicy,
    ) -> Result<CatalogBuild, DuplicateToolError> {
        let mut catalog = Self::default();
        let mut collisions = Vec::new();
        for listing in listings {
            for tool in listing.tools() {
                let exposed_name = if prefixed {
                    format!(
                        "{}{PREFIX_SEPARATOR}{}",
                        listing.component().identifier(),
                        tool.name()
                    )
                } else {
                    tool.name().to_string()
                };
                let entry = CatalogEntry {
                    exposed_name,
                    tool: Arc::clone(tool),
                    component: Arc::clone(listing.component()),
                };
                if let Some(collision) = catalog.insert(entry, policy)? {
                    collisions.push(collision);
                }
            }
        }
        Ok(CatalogBuild {
            catalog,
            collisions,
        })
    }

    /// Inserts an entry, resolving collisions by policy.
    fn insert(
        &mut self,
        entry: CatalogEntry,
        policy: DuplicatePolicy,
    ) -> Result<Option<ToolCollision>, DuplicateToolError> {
        let Some(&position) = self.index.get(&entry.exposed_name) else {
            self.index.insert(entry.exposed_name.clone(), self.entries.len());
            self.entries.push(entry);
            return Ok(None);
        };
        let Some(existing) = self.entries.get_mut(position) else {
            return Ok(None);
        };
        let existing_component = existing.component.identifier().to_string();
        let incoming_component = entry.component.identifier().to_string();
        match policy {
            DuplicatePolicy::FirstWins => Ok(Some(ToolCollision {
                tool: entry.exposed_name,
                kept: existing_component,
                discarded: incoming_component,
            })),
            DuplicatePolicy::LastWins => {
                let tool = entry.exposed_name.clone();
                *existing = entry;
                Ok(Some(ToolCollision {
                    tool,
                    kept: incoming_component,
                    discarded: existing_component,
                }))
            }
            DuplicatePolicy::Reject => Err(DuplicateToolError {
                tool: entry.exposed_name,
                first: existing_component,
                second: incoming_component,
            }),
        }
    }

    /// Looks up an entry by exposed name.
    #[must_use]
    pub fn lookup(&self, exposed_name: &str) -> Option<&CatalogEntry> {
        self.index.get(exposed_name).and_then(|position| self.entries.get(*position))
    }

    /// Returns descriptors as exposed to clients.
    #[must_use]
    pub fn listed_descriptors(&self) -> Vec<ToolDescriptor> {
        self.entries
            .iter()
            .map(|entry| {
                let mut descriptor = entry.tool.descriptor().clone();
                descriptor.name.clone_from(&entry.exposed_name);
                descriptor
            })
            .collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
