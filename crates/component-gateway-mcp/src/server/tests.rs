// crates/component-gateway-mcp/src/server/tests.rs
// ============================================================================
// Module: MCP Server Tests
// Description: Unit tests for request body read classification.
// Purpose: Separate oversized bodies from other read failures.
// Dependencies: axum, component-gateway-mcp
// ============================================================================

//! ## Overview
//! Only a size-limit failure maps to 413; other body read failures are plain
//! bad requests.

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

use axum::body::Body;
use axum::body::to_bytes;

use super::exceeds_body_limit;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn limit_failure_is_detected() {
    let err = to_bytes(Body::from(vec![b'x'; 64]), 16).await.unwrap_err();
    assert!(exceeds_body_limit(&err));
}

#[tokio::test]
async fn body_within_limit_is_read() {
    let bytes = to_bytes(Body::from("{}"), 16).await.unwrap();
    assert_eq!(&bytes[..], b"{}");
}

#[test]
fn transport_failure_is_not_a_limit_failure() {
    let err = axum::Error::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionReset,
        "connection reset mid-body",
    ));
    assert!(!exceeds_body_limit(&err));
}
