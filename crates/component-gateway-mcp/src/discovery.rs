// crates/component-gateway-mcp/src/discovery.rs
// ============================================================================
// Module: Discovery Aggregator
// Description: Concurrent metadata fan-out across components.
// Purpose: Build a tool catalog that tolerates partial component failure.
// Dependencies: reqwest, serde_json, tokio
// ============================================================================

//! ## Overview
//! One discovery cycle fetches every selected component's metadata
//! concurrently, one task per component, joined under a cycle deadline.
//! Failed or timed-out fetches are logged and excluded; tasks still pending
//! at the deadline are aborted. Listings are merged in directory order so
//! duplicate resolution is deterministic.
//!
//! With a non-zero listing cache window, successful listings are reused for
//! at most that window. Failed fetches are never cached.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinSet;

use crate::audit::GatewayAuditSink;
use crate::audit::GatewayLogEvent;
use crate::audit::GatewayLogKind;
use crate::catalog::ComponentListing;
use crate::catalog::DuplicateToolError;
use crate::catalog::ToolCatalog;
use crate::catalog::ToolDescriptor;
use crate::config::DiscoveryConfig;
use crate::config::DuplicatePolicy;
use crate::directory::ComponentRef;
use crate::outbound::OutboundFailure;
use crate::outbound::read_body_limited;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure of a single component metadata fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure or timeout.
    #[error("{}", .0.as_str())]
    Outbound(OutboundFailure),
    /// Non-success HTTP status.
    #[error("returned status {0}")]
    Status(u16),
    /// Body is not a descriptor or descriptor array.
    #[error("returned malformed metadata")]
    Malformed,
}

/// Discovery cycle failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// Duplicate tool rejected by policy.
    #[error(transparent)]
    DuplicateTool(#[from] DuplicateToolError),
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Metadata body: one descriptor or an array of descriptors.
#[derive(Deserialize)]
#[serde(untagged)]
enum MetadataPayload {
    /// Array of descriptors.
    Many(Vec<ToolDescriptor>),
    /// Single descriptor.
    One(Box<ToolDescriptor>),
}

impl MetadataPayload {
    /// Flattens the payload into a descriptor list.
    fn into_descriptors(self) -> Vec<ToolDescriptor> {
        match self {
            Self::Many(descriptors) => descriptors,
            Self::One(descriptor) => vec![*descriptor],
        }
    }
}

/// Cached component listing.
struct CachedListing {
    /// Listing from the last successful fetch.
    listing: ComponentListing,
    /// When the listing was fetched.
    fetched_at: Instant,
}

/// Fetch settings shared by every task in a cycle.
#[derive(Clone, Copy)]
struct FetchLimits {
    /// Per-fetch timeout.
    timeout: Duration,
    /// Maximum metadata body size.
    max_response_bytes: usize,
}

/// Concurrent metadata aggregator.
pub struct DiscoveryAggregator {
    /// Shared outbound client.
    client: Client,
    /// Per-fetch limits.
    limits: FetchLimits,
    /// Deadline for a whole cycle.
    cycle_deadline: Duration,
    /// Cross-component duplicate policy.
    duplicate_policy: DuplicatePolicy,
    /// Listing reuse window, `None` when disabled.
    cache_ttl: Option<Duration>,
    /// Listings keyed by component identifier.
    cache: Mutex<HashMap<String, CachedListing>>,
    /// Sink for operational events.
    audit: Arc<dyn GatewayAuditSink>,
}

impl DiscoveryAggregator {
    /// Creates an aggregator from discovery configuration.
    #[must_use]
    pub fn new(client: Client, config: &DiscoveryConfig, audit: Arc<dyn GatewayAuditSink>) -> Self {
        Self {
            client,
            limits: FetchLimits {
                timeout: config.fetch_timeout(),
                max_response_bytes: config.max_response_bytes,
            },
            cycle_deadline: config.cycle_deadline(),
            duplicate_policy: config.duplicate_policy,
            cache_ttl: config.listing_cache_ttl(),
            cache: Mutex::new(HashMap::new()),
            audit,
        }
    }

    /// Runs one discovery cycle and merges the results into a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the duplicate policy rejects a
    /// collision. Component failures are not errors.
    pub async fn build_catalog(
        &self,
        components: &[Arc<ComponentRef>],
        prefixed: bool,
    ) -> Result<ToolCatalog, DiscoveryError> {
        let listings = self.discover(components).await;
        let build = ToolCatalog::build(&listings, prefixed, self.duplicate_policy)?;
        for collision in build.collisions {
            self.audit.record_log(
                &GatewayLogEvent::new(
                    GatewayLogKind::DuplicateToolAcrossComponents,
                    format!("kept '{}', discarded '{}'", collision.kept, collision.discarded),
                )
                .with_tool(collision.tool),
            );
        }
        Ok(build.catalog)
    }

    /// Fetches listings from every component, returning responders in input order.
    pub async fn discover(&self, components: &[Arc<ComponentRef>]) -> Vec<ComponentListing> {
        let deadline = tokio::time::Instant::now() + self.cycle_deadline;
        let mut slots: Vec<Option<ComponentListing>> = components.iter().map(|_| None).collect();
        let mut pending = BTreeSet::new();
        let mut tasks = JoinSet::new();
        for (index, component) in components.iter().enumerate() {
            if let Some(listing) = self.cached(component.identifier()) {
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(listing);
                }
                continue;
            }
            pending.insert(index);
            let client = self.client.clone();
            let component = Arc::clone(component);
            let limits = self.limits;
            tasks.spawn(async move {
                let result = fetch_listing(&client, &component, limits).await;
                (index, component, result)
            });
        }
        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((index, component, result)))) => {
                    pending.remove(&index);
                    match result {
                        Ok(descriptors) => {
                            let listing = self.accept_listing(component, descriptors);
                            if let Some(slot) = slots.get_mut(index) {
                                *slot = Some(listing);
                            }
                        }
                        Err(err) => self.audit.record_log(
                            &GatewayLogEvent::new(
                                GatewayLogKind::ComponentFetchFailed,
                                format!("metadata fetch {err}"),
                            )
                            .with_component(component.identifier()),
                        ),
                    }
                }
                Ok(Some(Err(_))) => {
                    self.audit.record_log(&GatewayLogEvent::new(
                        GatewayLogKind::ComponentFetchFailed,
                        "metadata fetch task did not complete",
                    ));
                }
                Ok(None) => break,
                Err(_) => {
                    tasks.abort_all();
                    for index in &pending {
                        if let Some(component) = components.get(*index) {
                            self.audit.record_log(
                                &GatewayLogEvent::new(
                                    GatewayLogKind::DiscoveryDeadlineExceeded,
                                    "metadata fetch abandoned at cycle deadline",
                                )
                                .with_component(component.identifier()),
                            );
                        }
                    }
                    break;
                }
            }
        }
        slots.into_iter().flatten().collect()
    }

    /// Builds a listing from fetched descriptors, logging and caching it.
    fn accept_listing(
        &self,
        component: Arc<ComponentRef>,
        descriptors: Vec<ToolDescriptor>,
    ) -> ComponentListing {
        let (listing, dropped) = ComponentListing::from_descriptors(component, descriptors);
        for tool in dropped {
            self.audit.record_log(
                &GatewayLogEvent::new(
                    GatewayLogKind::DuplicateToolInListing,
                    "later duplicate in component listing dropped",
                )
                .with_component(listing.component().identifier())
                .with_tool(tool),
            );
        }
        if self.cache_ttl.is_some() {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache.insert(
                listing.component().identifier().to_string(),
                CachedListing {
                    listing: listing.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }
        listing
    }

    /// Returns a cached listing still inside the reuse window.
    fn cached(&self, identifier: &str) -> Option<ComponentListing> {
        let ttl = self.cache_ttl?;
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = cache.get(identifier).map(|entry| entry.fetched_at.elapsed() <= ttl)?;
        if fresh {
            cache.get(identifier).map(|entry| entry.listing.clone())
        } else {
            cache.remove(identifier);
            None
        }
    }
}

// ============================================================================
// SECTION: Fetch
// ============================================================================

/// Fetches and decodes one component's metadata.
async fn fetch_listing(
    client: &Client,
    component: &ComponentRef,
    limits: FetchLimits,
) -> Result<Vec<ToolDescriptor>, FetchError> {
    let mut response = client
        .get(component.internal_address())
        .header(ACCEPT, "application/json")
        .timeout(limits.timeout)
        .send()
        .await
        .map_err(|err| FetchError::Outbound(OutboundFailure::from_reqwest(&err)))?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }
    let body = read_body_limited(&mut response, limits.max_response_bytes)
        .await
        .map_err(FetchError::Outbound)?;
    let payload: MetadataPayload =
        serde_json::from_slice(&body).map_err(|_| FetchError::Malformed)?;
    Ok(payload.into_descriptors())
}
