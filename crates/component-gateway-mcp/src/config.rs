// crates/component-gateway-mcp/src/config.rs
// ============================================================================
// Module: Gateway Configuration (Re-export)
// Description: Re-export canonical component gateway config types.
// Purpose: Keep gateway callers on one config model.
// Dependencies: component-gateway-config
// ============================================================================

//! ## Overview
//! This module re-exports the configuration model from
//! `component-gateway-config` so the gateway and its callers share a single
//! source of truth.

/// Re-export canonical config types and helpers.
pub use component_gateway_config::*;
