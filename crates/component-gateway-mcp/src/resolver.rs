// crates/component-gateway-mcp/src/resolver.rs
// ============================================================================
// Module: Component Name Resolver
// Description: Maps component identifiers to internal base URLs.
// Purpose: Keep address resolution behind a narrow, swappable interface.
// Dependencies: component-gateway-config
// ============================================================================

//! ## Overview
//! Components are configured by operator-facing identifiers such as
//! `weather_tool`. The internal network addresses them by DNS label, so
//! underscores become hyphens (`weather-tool`) under the internal domain.
//! [`StaticResolver`] layers an explicit identifier-to-URL table over the
//! domain mapping for deployments without platform service resolution.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ComponentsConfig;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Resolves a component identifier to its internal base URL.
///
/// # Invariants
/// - Returned addresses end with `/`.
/// - Resolution is pure; equal identifiers resolve to equal addresses.
pub trait ComponentResolver: Send + Sync {
    /// Returns the base URL for the identifier.
    fn resolve(&self, identifier: &str) -> String;
}

// ============================================================================
// SECTION: Resolvers
// ============================================================================

/// Resolver that derives `{scheme}://{label}.{domain}/` from the identifier.
#[derive(Debug, Clone)]
pub struct InternalDomainResolver {
    /// URL scheme.
    scheme: String,
    /// Internal domain suffix.
    domain: String,
}

impl InternalDomainResolver {
    /// Creates a resolver for the given scheme and internal domain.
    #[must_use]
    pub fn new(scheme: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            domain: domain.into(),
        }
    }
}

impl ComponentResolver for InternalDomainResolver {
    fn resolve(&self, identifier: &str) -> String {
        format!("{}://{}.{}/", self.scheme, to_network_label(identifier), self.domain)
    }
}

/// Resolver backed by an explicit address table with a domain fallback.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    /// Identifier to base URL overrides.
    addresses: BTreeMap<String, String>,
    /// Resolver for identifiers without an override.
    fallback: InternalDomainResolver,
}

impl StaticResolver {
    /// Creates a static resolver.
    #[must_use]
    pub fn new(addresses: BTreeMap<String, String>, fallback: InternalDomainResolver) -> Self {
        let addresses = addresses
            .into_iter()
            .map(|(identifier, address)| (identifier, with_trailing_slash(address.trim())))
            .collect();
        Self {
            addresses,
            fallback,
        }
    }
}

impl ComponentResolver for StaticResolver {
    fn resolve(&self, identifier: &str) -> String {
        self.addresses
            .get(identifier)
            .cloned()
            .unwrap_or_else(|| self.fallback.resolve(identifier))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a `snake_case` identifier to a hyphenated DNS label.
///
/// Identifiers that are already hyphenated pass through unchanged.
#[must_use]
pub fn to_network_label(identifier: &str) -> String {
    identifier.replace('_', "-")
}

/// Builds the resolver described by the component configuration.
#[must_use]
pub fn resolver_from_config(config: &ComponentsConfig) -> Arc<dyn ComponentResolver> {
    let domain = InternalDomainResolver::new(&config.scheme, config.internal_domain.trim());
    if config.addresses.is_empty() {
        Arc::new(domain)
    } else {
        Arc::new(StaticResolver::new(config.addresses.clone(), domain))
    }
}

/// Appends a trailing slash when missing.
fn with_trailing_slash(address: &str) -> String {
    if address.ends_with('/') { address.to_string() } else { format!("{address}/") }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
