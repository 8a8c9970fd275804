// crates/component-gateway-mcp/src/outbound.rs
// ============================================================================
// Module: Outbound HTTP
// Description: Shared HTTP client and bounded body reads for component calls.
// Purpose: Keep component responses within configured size limits.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! Discovery and dispatch share one pooled [`reqwest::Client`]. Timeouts are
//! applied per request by the caller. Bodies are read chunk by chunk and
//! rejected as soon as they exceed the limit. Error labels are stable and
//! never include the request URL.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::Client;
use reqwest::Response;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Failure classification for one outbound exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundFailure {
    /// The request or body read exceeded its timeout.
    Timeout,
    /// The component could not be reached or the exchange broke off.
    Unreachable,
    /// The body exceeded the configured limit.
    TooLarge,
}

impl OutboundFailure {
    /// Classifies a reqwest error without retaining its URL.
    #[must_use]
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() { Self::Timeout } else { Self::Unreachable }
    }

    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timed out",
            Self::Unreachable => "unreachable",
            Self::TooLarge => "response too large",
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the shared outbound client.
///
/// # Errors
///
/// Returns the reqwest error when the client cannot be constructed.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder().redirect(reqwest::redirect::Policy::none()).build()
}

/// Reads a response body with a maximum size limit.
///
/// # Errors
///
/// Returns [`OutboundFailure`] when the read fails or exceeds `max_bytes`.
pub async fn read_body_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, OutboundFailure> {
    let max_bytes_u64 = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if let Some(length) = response.content_length()
        && length > max_bytes_u64
    {
        return Err(OutboundFailure::TooLarge);
    }
    let mut buf = Vec::new();
    while let Some(chunk) =
        response.chunk().await.map_err(|err| OutboundFailure::from_reqwest(&err))?
    {
        if buf.len().saturating_add(chunk.len()) > max_bytes {
            return Err(OutboundFailure::TooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}
