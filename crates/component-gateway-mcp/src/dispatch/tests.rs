// crates/component-gateway-mcp/src/dispatch/tests.rs
// ============================================================================
// Module: Tool Dispatcher Tests
// Description: Unit tests for tool URL construction and error labels.
// Purpose: Ensure URLs are built under the component base and errors stay sanitized.
// Dependencies: component-gateway-mcp
// ============================================================================

//! ## Overview
//! Checks tool URL joining and that error messages never include addresses.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::DispatchError;
use super::tool_url;
use crate::directory::ComponentRef;
use crate::outbound::OutboundFailure;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn tool_url_appends_tool_name() {
    let component = ComponentRef::new("weather", "http://weather.spin.internal/");
    let url = tool_url(&component, "get_forecast").unwrap();
    assert_eq!(url.as_str(), "http://weather.spin.internal/get_forecast");
}

#[test]
fn tool_url_keeps_base_path_and_encodes_name() {
    let component = ComponentRef::new("weather", "http://127.0.0.1:9000/tools/");
    let url = tool_url(&component, "odd name/x").unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:9000/tools/odd%20name%2Fx");
}

#[test]
fn unusable_address_is_reported() {
    let component = ComponentRef::new("broken", "not a url");
    let err = tool_url(&component, "t").unwrap_err();
    assert_eq!(err.component(), "broken");
}

#[test]
fn messages_name_only_the_component() {
    let err = DispatchError::Outbound {
        component: "calculator".to_string(),
        failure: OutboundFailure::Timeout,
    };
    assert_eq!(err.to_string(), "component 'calculator' timed out");
    let status = DispatchError::Status {
        component: "calculator".to_string(),
        status: 500,
    };
    assert_eq!(status.to_string(), "component 'calculator' returned status 500");
}
