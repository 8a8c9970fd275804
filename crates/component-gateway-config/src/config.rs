// crates/component-gateway-config/src/config.rs
// ============================================================================
// Module: Component Gateway Configuration
// Description: Configuration loading, environment overrides, and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from an optional TOML file with strict size and
//! path limits, then merged with the platform variables `COMPONENT_NAMES` and
//! `VALIDATE_ARGUMENTS`. The merged value is validated once and never mutated
//! afterwards.
//!
//! Invariants:
//! - Component identifiers are unique, non-empty, and DNS-label compatible
//!   once underscores are mapped to hyphens.
//! - Every timeout and size limit is non-zero and bounded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "component-gateway.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "COMPONENT_GATEWAY_CONFIG";
/// Environment variable carrying the comma-separated component list.
pub const COMPONENT_NAMES_ENV_VAR: &str = "COMPONENT_NAMES";
/// Environment variable carrying the argument validation toggle.
pub const VALIDATE_ARGUMENTS_ENV_VAR: &str = "VALIDATE_ARGUMENTS";
/// Maximum config file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of configured components.
pub(crate) const MAX_COMPONENTS: usize = 256;
/// Maximum length of a component identifier (one DNS label).
pub(crate) const MAX_COMPONENT_IDENTIFIER_LENGTH: usize = 63;
/// Upper bound for a single metadata fetch timeout.
pub(crate) const MAX_FETCH_TIMEOUT_MS: u64 = 60_000;
/// Upper bound for the discovery cycle deadline.
pub(crate) const MAX_CYCLE_DEADLINE_MS: u64 = 120_000;
/// Upper bound for the listing cache window.
pub(crate) const MAX_LISTING_CACHE_TTL_MS: u64 = 3_600_000;
/// Upper bound for a dispatch timeout.
pub(crate) const MAX_DISPATCH_TIMEOUT_MS: u64 = 300_000;
/// Upper bound for any response or request body limit.
pub(crate) const MAX_BODY_LIMIT_BYTES: usize = 64 * 1024 * 1024;
/// Upper bound for the session table size.
pub(crate) const MAX_SESSIONS: usize = 65_536;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Component gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    /// HTTP front end configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Component directory configuration.
    #[serde(default)]
    pub components: ComponentsConfig,
    /// Argument validation configuration.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Discovery aggregation configuration.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Tool dispatch configuration.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl GatewayConfig {
    /// Loads configuration from disk and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| env::var(key).ok())
    }

    /// Loads configuration using a caller-supplied environment lookup.
    ///
    /// An explicit path (argument or [`CONFIG_ENV_VAR`]) must exist. Without
    /// one, `component-gateway.toml` in the working directory is used when
    /// present and built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match resolve_path(path, &lookup)? {
            Some(resolved) => Self::read_file(&resolved)?,
            None => Self::default(),
        };
        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file with size and encoding limits.
    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies platform-provided variables on top of file values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable holds an unparseable value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(names) = lookup(COMPONENT_NAMES_ENV_VAR) {
            self.components.names = parse_component_names(&names);
        }
        if let Some(raw) = lookup(VALIDATE_ARGUMENTS_ENV_VAR) {
            self.validation.validate_arguments = parse_bool_flag(&raw).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "{VALIDATE_ARGUMENTS_ENV_VAR} must be true or false, got '{}'",
                    raw.trim()
                ))
            })?;
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.components.validate()?;
        self.discovery.validate()?;
        self.dispatch.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// HTTP front end configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the gateway listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Maximum number of concurrently tracked MCP sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Idle time after which a session is forgotten, in milliseconds.
    #[serde(default = "default_session_idle_timeout_ms")]
    pub session_idle_timeout_ms: u64,
    /// Server name reported in the `initialize` response.
    #[serde(default = "default_server_name")]
    pub server_name: String,
    /// Server version reported in the `initialize` response.
    #[serde(default = "default_server_version")]
    pub server_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            max_sessions: default_max_sessions(),
            session_idle_timeout_ms: default_session_idle_timeout_ms(),
            server_name: default_server_name(),
            server_version: default_server_version(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind string is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address '{}'", self.bind)))
    }

    /// Returns the session idle timeout.
    #[must_use]
    pub const fn session_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.session_idle_timeout_ms)
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        validate_body_limit("server.max_body_bytes", self.max_body_bytes)?;
        if self.max_sessions == 0 || self.max_sessions > MAX_SESSIONS {
            return Err(ConfigError::Invalid(format!(
                "server.max_sessions must be between 1 and {MAX_SESSIONS}"
            )));
        }
        if self.session_idle_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "server.session_idle_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.server_name.trim().is_empty() {
            return Err(ConfigError::Invalid("server.server_name must be set".to_string()));
        }
        if self.server_version.trim().is_empty() {
            return Err(ConfigError::Invalid("server.server_version must be set".to_string()));
        }
        Ok(())
    }
}

/// Component directory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentsConfig {
    /// Component identifiers; accepts a comma-separated string or an array.
    #[serde(default, deserialize_with = "deserialize_component_names")]
    pub names: Vec<String>,
    /// URL scheme used for internal addresses.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Internal domain appended to each component label.
    #[serde(default = "default_internal_domain")]
    pub internal_domain: String,
    /// Explicit identifier to base URL overrides.
    #[serde(default)]
    pub addresses: BTreeMap<String, String>,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            scheme: default_scheme(),
            internal_domain: default_internal_domain(),
            addresses: BTreeMap::new(),
        }
    }
}

impl ComponentsConfig {
    /// Validates the component directory configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.names.len() > MAX_COMPONENTS {
            return Err(ConfigError::Invalid(format!(
                "components.names exceeds {MAX_COMPONENTS} entries"
            )));
        }
        let mut seen = BTreeSet::new();
        for name in &self.names {
            validate_component_identifier(name)?;
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate component '{name}'")));
            }
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(ConfigError::Invalid(
                "components.scheme must be http or https".to_string(),
            ));
        }
        let domain = self.internal_domain.trim();
        if domain.is_empty()
            || domain.starts_with('.')
            || domain.ends_with('.')
            || !domain.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '.')
        {
            return Err(ConfigError::Invalid(format!(
                "components.internal_domain '{domain}' is not a valid domain"
            )));
        }
        for (identifier, address) in &self.addresses {
            if !seen.contains(identifier.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "components.addresses references unknown component '{identifier}'"
                )));
            }
            let trimmed = address.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "components.addresses.{identifier} must include http:// or https://"
                )));
            }
        }
        Ok(())
    }
}

/// Argument validation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Validate `tools/call` arguments against the tool input schema.
    ///
    /// Disabling skips schema compilation and forwards arguments unchecked.
    #[serde(default = "default_validate_arguments")]
    pub validate_arguments: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_arguments: default_validate_arguments(),
        }
    }
}

/// Policy applied when two components declare the same tool name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the entry from the earliest responding component in directory order.
    #[default]
    FirstWins,
    /// Keep the entry from the latest responding component in directory order.
    LastWins,
    /// Fail the discovery cycle.
    Reject,
}

/// Naming applied to tools exposed by the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolNaming {
    /// Expose tool names as declared by the component.
    #[default]
    Plain,
    /// Expose `{component}__{tool}` on unscoped endpoints.
    ComponentPrefixed,
}

/// Discovery aggregation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Timeout for one component metadata fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Deadline for a whole discovery cycle, in milliseconds.
    #[serde(default = "default_cycle_deadline_ms")]
    pub cycle_deadline_ms: u64,
    /// Maximum metadata response size in bytes.
    #[serde(default = "default_discovery_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Reuse window for successful component listings; `0` disables reuse.
    #[serde(default)]
    pub listing_cache_ttl_ms: u64,
    /// Cross-component duplicate tool policy.
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    /// Exposed tool naming.
    #[serde(default)]
    pub tool_naming: ToolNaming,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
            cycle_deadline_ms: default_cycle_deadline_ms(),
            max_response_bytes: default_discovery_max_response_bytes(),
            listing_cache_ttl_ms: 0,
            duplicate_policy: DuplicatePolicy::default(),
            tool_naming: ToolNaming::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Returns the per-fetch timeout.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Returns the discovery cycle deadline.
    #[must_use]
    pub const fn cycle_deadline(&self) -> Duration {
        Duration::from_millis(self.cycle_deadline_ms)
    }

    /// Returns the listing cache window, or `None` when caching is off.
    #[must_use]
    pub const fn listing_cache_ttl(&self) -> Option<Duration> {
        if self.listing_cache_ttl_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.listing_cache_ttl_ms))
        }
    }

    /// Validates discovery configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_range("discovery.fetch_timeout_ms", self.fetch_timeout_ms, MAX_FETCH_TIMEOUT_MS)?;
        validate_range(
            "discovery.cycle_deadline_ms",
            self.cycle_deadline_ms,
            MAX_CYCLE_DEADLINE_MS,
        )?;
        validate_body_limit("discovery.max_response_bytes", self.max_response_bytes)?;
        if self.listing_cache_ttl_ms > MAX_LISTING_CACHE_TTL_MS {
            return Err(ConfigError::Invalid(format!(
                "discovery.listing_cache_ttl_ms must be at most {MAX_LISTING_CACHE_TTL_MS}"
            )));
        }
        Ok(())
    }
}

/// Tool dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Timeout for one tool invocation, in milliseconds.
    #[serde(default = "default_dispatch_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum component response size in bytes.
    #[serde(default = "default_dispatch_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_dispatch_timeout_ms(),
            max_response_bytes: default_dispatch_max_response_bytes(),
        }
    }
}

impl DispatchConfig {
    /// Returns the dispatch timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates dispatch configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_range("dispatch.timeout_ms", self.timeout_ms, MAX_DISPATCH_TIMEOUT_MS)?;
        validate_body_limit("dispatch.max_response_bytes", self.max_response_bytes)
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Emit audit and log events.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional JSON-lines file; stderr is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path(path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Public Helpers
// ============================================================================

/// Splits a comma-separated component list, trimming blanks.
#[must_use]
pub fn parse_component_names(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|name| !name.is_empty()).map(str::to_string).collect()
}

/// Parses a boolean toggle as provided by the platform variables.
#[must_use]
pub fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Validates a component identifier.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the identifier cannot become a DNS label.
pub fn validate_component_identifier(identifier: &str) -> Result<(), ConfigError> {
    if identifier.is_empty() || identifier.len() > MAX_COMPONENT_IDENTIFIER_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "component identifier '{identifier}' must be 1-{MAX_COMPONENT_IDENTIFIER_LENGTH} \
             characters"
        )));
    }
    if !identifier.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-') {
        return Err(ConfigError::Invalid(format!(
            "component identifier '{identifier}' may only contain letters, digits, '_' and '-'"
        )));
    }
    let starts = identifier.chars().next().is_some_and(|ch| ch.is_ascii_alphanumeric());
    let ends = identifier.chars().next_back().is_some_and(|ch| ch.is_ascii_alphanumeric());
    if !(starts && ends) {
        return Err(ConfigError::Invalid(format!(
            "component identifier '{identifier}' must start and end with a letter or digit"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Accepted shapes for the component list.
#[derive(Deserialize)]
#[serde(untagged)]
enum ComponentNamesInput {
    /// TOML array of identifiers.
    List(Vec<String>),
    /// Comma-separated identifiers.
    Csv(String),
}

/// Deserializes the component list from either accepted shape.
fn deserialize_component_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ComponentNamesInput::deserialize(deserializer)? {
        ComponentNamesInput::List(items) => items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        ComponentNamesInput::Csv(raw) => parse_component_names(&raw),
    })
}

/// Resolves the config path from CLI, environment, or working directory.
fn resolve_path<F>(path: Option<&Path>, lookup: &F) -> Result<Option<PathBuf>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = lookup(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default_path.is_file().then_some(default_path))
}

/// Validates a path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a millisecond value lies in `1..=max`.
fn validate_range(field: &str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::Invalid(format!("{field} must be between 1 and {max}")));
    }
    Ok(())
}

/// Validates a byte limit lies in `1..=MAX_BODY_LIMIT_BYTES`.
fn validate_body_limit(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_BODY_LIMIT_BYTES {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between 1 and {MAX_BODY_LIMIT_BYTES}"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default bind address.
pub(crate) fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Default maximum request body size.
pub(crate) const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Default session table size.
pub(crate) const fn default_max_sessions() -> usize {
    1024
}

/// Default session idle timeout.
pub(crate) const fn default_session_idle_timeout_ms() -> u64 {
    3_600_000
}

/// Default server name.
pub(crate) fn default_server_name() -> String {
    "component-gateway".to_string()
}

/// Default server version.
pub(crate) fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Default internal address scheme.
pub(crate) fn default_scheme() -> String {
    "http".to_string()
}

/// Default internal domain.
pub(crate) fn default_internal_domain() -> String {
    "spin.internal".to_string()
}

/// Argument validation is on unless explicitly disabled.
pub(crate) const fn default_validate_arguments() -> bool {
    true
}

/// Default per-fetch timeout.
pub(crate) const fn default_fetch_timeout_ms() -> u64 {
    5_000
}

/// Default discovery cycle deadline.
pub(crate) const fn default_cycle_deadline_ms() -> u64 {
    10_000
}

/// Default metadata response limit.
pub(crate) const fn default_discovery_max_response_bytes() -> usize {
    1024 * 1024
}

/// Default dispatch timeout.
pub(crate) const fn default_dispatch_timeout_ms() -> u64 {
    30_000
}

/// Default dispatch response limit.
pub(crate) const fn default_dispatch_max_response_bytes() -> usize {
    4 * 1024 * 1024
}

/// Audit events are emitted by default.
pub(crate) const fn default_audit_enabled() -> bool {
    true
}
