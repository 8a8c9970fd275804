// crates/component-gateway-mcp/src/directory.rs
// ============================================================================
// Module: Component Directory
// Description: Fixed list of components and their resolved addresses.
// Purpose: Resolve every configured component once per configuration load.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The directory is built once at startup from the configured identifiers and
//! never changes afterwards. Its order defines discovery merge order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::resolver::ComponentResolver;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A configured component and its internal base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    /// Operator-facing identifier.
    identifier: String,
    /// Internal base URL ending in `/`.
    internal_address: String,
}

impl ComponentRef {
    /// Creates a component reference.
    #[must_use]
    pub fn new(identifier: impl Into<String>, internal_address: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            internal_address: internal_address.into(),
        }
    }

    /// Returns the operator-facing identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the internal base URL.
    #[must_use]
    pub fn internal_address(&self) -> &str {
        &self.internal_address
    }
}

/// Ordered, immutable set of components.
#[derive(Debug, Clone, Default)]
pub struct ComponentDirectory {
    /// Components in configuration order.
    components: Vec<Arc<ComponentRef>>,
}

impl ComponentDirectory {
    /// Resolves every identifier through the resolver.
    #[must_use]
    pub fn resolve(identifiers: &[String], resolver: &dyn ComponentResolver) -> Self {
        let components = identifiers
            .iter()
            .map(|identifier| {
                Arc::new(ComponentRef::new(identifier.clone(), resolver.resolve(identifier)))
            })
            .collect();
        Self {
            components,
        }
    }

    /// Returns components in configuration order.
    #[must_use]
    pub fn components(&self) -> &[Arc<ComponentRef>] {
        &self.components
    }

    /// Looks up a component by identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&Arc<ComponentRef>> {
        self.components.iter().find(|component| component.identifier() == identifier)
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true when no components are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
