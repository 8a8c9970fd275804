// crates/component-gateway-mcp/src/catalog/tests.rs
// ============================================================================
// Module: Tool Catalog Tests
// Description: Unit tests for listing de-duplication and catalog merging.
// Purpose: Pin duplicate policies, prefixed naming, and schema memoization.
// Dependencies: component-gateway-mcp
// ============================================================================

//! ## Overview
//! Builds catalogs from in-memory listings and checks which component owns
//! each exposed name under every duplicate policy.

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

use std::sync::Arc;

use serde_json::json;

use super::ComponentListing;
use super::DiscoveredTool;
use super::ToolCatalog;
use super::ToolDescriptor;
use crate::config::DuplicatePolicy;
use crate::directory::ComponentRef;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn descriptor(name: &str) -> ToolDescriptor {
    serde_json::from_value(json!({
        "name": name,
        "description": format!("{name} tool"),
        "inputSchema": {"type": "object"}
    }))
    .unwrap()
}

fn listing(component: &str, tools: &[&str]) -> ComponentListing {
    let component = Arc::new(ComponentRef::new(component, format!("http://{component}.test/")));
    ComponentListing::from_descriptors(component, tools.iter().copied().map(descriptor).collect())
        .0
}

fn owner(catalog: &ToolCatalog, name: &str) -> String {
    catalog.lookup(name).expect("tool present").component.identifier().to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn listing_drops_later_duplicates_within_component() {
    let component = Arc::new(ComponentRef::new("alpha", "http://alpha.test/"));
    let (listing, dropped) = ComponentListing::from_descriptors(
        component,
        vec![descriptor("a"), descriptor("b"), descriptor("a")],
    );
    assert_eq!(listing.tools().len(), 2);
    assert_eq!(dropped, vec!["a".to_string()]);
}

#[test]
fn first_wins_keeps_earliest_component() {
    let listings = [listing("alpha", &["shared", "only_a"]), listing("beta", &["shared"])];
    let build = ToolCatalog::build(&listings, false, DuplicatePolicy::FirstWins).unwrap();
    assert_eq!(build.catalog.len(), 2);
    assert_eq!(owner(&build.catalog, "shared"), "alpha");
    assert_eq!(build.collisions.len(), 1);
    assert_eq!(build.collisions[0].discarded, "beta");
}

#[test]
fn last_wins_keeps_latest_component() {
    let listings = [listing("alpha", &["shared"]), listing("beta", &["shared"])];
    let build = ToolCatalog::build(&listings, false, DuplicatePolicy::LastWins).unwrap();
    assert_eq!(build.catalog.len(), 1);
    assert_eq!(owner(&build.catalog, "shared"), "beta");
    assert_eq!(build.collisions[0].kept, "beta");
}

#[test]
fn reject_fails_on_collision() {
    let listings = [listing("alpha", &["shared"]), listing("beta", &["shared"])];
    let err = ToolCatalog::build(&listings, false, DuplicatePolicy::Reject).unwrap_err();
    assert_eq!(err.tool, "shared");
    assert_eq!(err.first, "alpha");
    assert_eq!(err.second, "beta");
}

#[test]
fn prefixed_naming_avoids_collisions() {
    let listings = [listing("alpha", &["shared"]), listing("beta", &["shared"])];
    let build = ToolCatalog::build(&listings, true, DuplicatePolicy::Reject).unwrap();
    let names: Vec<String> =
        build.catalog.listed_descriptors().into_iter().map(|tool| tool.name).collect();
    assert_eq!(names, vec!["alpha__shared".to_string(), "beta__shared".to_string()]);
    assert_eq!(build.catalog.lookup("beta__shared").unwrap().tool.name(), "shared");
}

#[test]
fn descriptor_round_trips_meta_and_camel_case() {
    let value = json!({
        "name": "t",
        "inputSchema": {"type": "object"},
        "outputSchema": {"type": "object"},
        "_meta": {"k": 1}
    });
    let parsed: ToolDescriptor = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(parsed.meta, Some(json!({"k": 1})));
    assert_eq!(serde_json::to_value(&parsed).unwrap(), value);
}

#[test]
fn schema_is_compiled_once_and_on_demand() {
    let tool = DiscoveredTool::new(descriptor("t"));
    assert!(!tool.is_compiled());
    let first = tool.compiled_schema().unwrap();
    let second = tool.compiled_schema().unwrap();
    assert!(tool.is_compiled());
    assert!(std::ptr::eq(first, second));
}

#[test]
fn invalid_schema_reports_reason() {
    let broken: ToolDescriptor = serde_json::from_value(json!({
        "name": "broken",
        "inputSchema": {"type": "not-a-type"}
    }))
    .unwrap();
    let tool = DiscoveredTool::new(broken);
    assert!(tool.compiled_schema().is_err());
}
