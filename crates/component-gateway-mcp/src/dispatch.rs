// crates/component-gateway-mcp/src/dispatch.rs
// ============================================================================
// Module: Tool Dispatcher
// Description: Forwards tool calls to the owning component.
// Purpose: Pass component results through unchanged and classify failures.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! A call is one POST of the raw argument bytes to
//! `{internal_address}{tool_name}` with a fixed timeout and no retries. A
//! successful body must be JSON with a `content` array; it is then returned
//! as raw JSON so the client sees the component's bytes unchanged. Failure
//! messages name only the component identifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Client;
use reqwest::Url;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::config::DispatchConfig;
use crate::directory::ComponentRef;
use crate::outbound::OutboundFailure;
use crate::outbound::read_body_limited;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Downstream tool invocation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Transport failure, timeout, or oversized body.
    #[error("component '{component}' {}", .failure.as_str())]
    Outbound {
        /// Component identifier.
        component: String,
        /// Failure classification.
        failure: OutboundFailure,
    },
    /// Non-success HTTP status.
    #[error("component '{component}' returned status {status}")]
    Status {
        /// Component identifier.
        component: String,
        /// HTTP status code.
        status: u16,
    },
    /// Body is not a tool call result.
    #[error("component '{component}' returned a malformed result")]
    Malformed {
        /// Component identifier.
        component: String,
    },
    /// The component address cannot form a tool URL.
    #[error("component '{component}' has an unusable address")]
    Address {
        /// Component identifier.
        component: String,
    },
}

impl DispatchError {
    /// Returns the component identifier.
    #[must_use]
    pub fn component(&self) -> &str {
        match self {
            Self::Outbound {
                component, ..
            }
            | Self::Status {
                component, ..
            }
            | Self::Malformed {
                component,
            }
            | Self::Address {
                component,
            } => component,
        }
    }
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Minimal result shape required from components.
#[derive(Deserialize)]
struct ToolCallShape {
    /// Content blocks; only their presence as an array is checked.
    #[serde(rename = "content")]
    _content: Vec<IgnoredAny>,
}

/// Forwards tool calls to components.
pub struct Dispatcher {
    /// Shared outbound client.
    client: Client,
    /// Per-call timeout.
    timeout: Duration,
    /// Maximum result body size.
    max_response_bytes: usize,
}

impl Dispatcher {
    /// Creates a dispatcher from dispatch configuration.
    #[must_use]
    pub fn new(client: Client, config: &DispatchConfig) -> Self {
        Self {
            client,
            timeout: config.timeout(),
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// Invokes `tool_name` on the component with raw argument bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] for any transport, status, or shape failure.
    pub async fn dispatch(
        &self,
        component: &ComponentRef,
        tool_name: &str,
        arguments: &str,
    ) -> Result<Box<RawValue>, DispatchError> {
        let url = tool_url(component, tool_name)?;
        let outbound = |failure| DispatchError::Outbound {
            component: component.identifier().to_string(),
            failure,
        };
        let mut response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .body(arguments.to_string())
            .send()
            .await
            .map_err(|err| outbound(OutboundFailure::from_reqwest(&err)))?;
        if !response.status().is_success() {
            return Err(DispatchError::Status {
                component: component.identifier().to_string(),
                status: response.status().as_u16(),
            });
        }
        let body = read_body_limited(&mut response, self.max_response_bytes)
            .await
            .map_err(outbound)?;
        let malformed = || DispatchError::Malformed {
            component: component.identifier().to_string(),
        };
        let raw: Box<RawValue> = serde_json::from_slice(&body).map_err(|_| malformed())?;
        serde_json::from_str::<ToolCallShape>(raw.get()).map_err(|_| malformed())?;
        Ok(raw)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds `{internal_address}{tool_name}` with the tool name path-encoded.
fn tool_url(component: &ComponentRef, tool_name: &str) -> Result<Url, DispatchError> {
    let unusable = || DispatchError::Address {
        component: component.identifier().to_string(),
    };
    let mut url = Url::parse(component.internal_address()).map_err(|_| unusable())?;
    url.path_segments_mut().map_err(|()| unusable())?.pop_if_empty().push(tool_name);
    Ok(url)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
