// crates/component-gateway-config/src/lib.rs
// ============================================================================
// Module: Component Gateway Config Library
// Description: Canonical config model, environment overrides, and validation.
// Purpose: Single source of truth for component-gateway.toml semantics.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! `component-gateway-config` defines the configuration model for the
//! component gateway. Configuration is read once at startup, merged with the
//! platform-provided environment variables, validated fail-closed, and then
//! treated as an immutable value for the process lifetime.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
