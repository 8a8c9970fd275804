// crates/component-gateway-mcp/src/session.rs
// ============================================================================
// Module: Session Store
// Description: Per-session handshake state keyed by `Mcp-Session-Id`.
// Purpose: Track the initialize/initialized sequence across HTTP requests.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! `initialize` opens a session in [`HandshakeState::Initialized`]; the
//! `initialized` notification moves it to [`HandshakeState::Ready`]. Unknown
//! or expired ids read as [`HandshakeState::Uninitialized`]. The table is
//! bounded: opening a session at capacity evicts the least recently used one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;
use std::time::Instant;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Handshake state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// No `initialize` seen.
    Uninitialized,
    /// `initialize` answered; waiting for `initialized`.
    Initialized,
    /// Handshake complete.
    Ready,
}

/// Session table entry.
struct SessionEntry {
    /// Current handshake state.
    state: HandshakeState,
    /// Last time the session was used.
    last_seen: Instant,
}

/// Newly opened session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedSession {
    /// Session id to return to the client.
    pub id: String,
    /// Session evicted to make room, if any.
    pub evicted: Option<String>,
}

/// Bounded handshake state table.
pub struct SessionStore {
    /// Sessions keyed by id.
    sessions: Mutex<HashMap<String, SessionEntry>>,
    /// Maximum number of sessions.
    max_sessions: usize,
    /// Idle time after which a session expires.
    idle_timeout: Duration,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
            idle_timeout,
        }
    }

    /// Opens a session in the `Initialized` state.
    pub fn open(&self) -> OpenedSession {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.idle_timeout);
        let mut evicted = None;
        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            if let Some(id) = oldest {
                sessions.remove(&id);
                evicted = Some(id);
            }
        }
        let id = loop {
            let candidate = new_session_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(
            id.clone(),
            SessionEntry {
                state: HandshakeState::Initialized,
                last_seen: now,
            },
        );
        OpenedSession {
            id,
            evicted,
        }
    }

    /// Returns the state for a session id, refreshing its idle timer.
    pub fn state(&self, id: Option<&str>) -> HandshakeState {
        let Some(id) = id else {
            return HandshakeState::Uninitialized;
        };
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = sessions.get_mut(id) else {
            return HandshakeState::Uninitialized;
        };
        if now.duration_since(entry.last_seen) > self.idle_timeout {
            sessions.remove(id);
            return HandshakeState::Uninitialized;
        }
        entry.last_seen = now;
        entry.state
    }

    /// Moves an `Initialized` session to `Ready`.
    ///
    /// Returns false when the session is unknown or expired.
    pub fn mark_ready(&self, id: Option<&str>) -> bool {
        if self.state(id) == HandshakeState::Uninitialized {
            return false;
        }
        let Some(id) = id else {
            return false;
        };
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.get_mut(id).is_some_and(|entry| {
            entry.state = HandshakeState::Ready;
            true
        })
    }

    /// Returns the number of tracked sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true when no sessions are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generates a random 128-bit hex session id.
fn new_session_id() -> String {
    let bytes: [u8; 16] = rand::random();
    let mut id = String::with_capacity(32);
    for byte in bytes {
        let _ = write!(id, "{byte:02x}");
    }
    id
}

// ============================================================================
// SECTION: Tests
// ============================================================================
