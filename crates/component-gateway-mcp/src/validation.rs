// crates/component-gateway-mcp/src/validation.rs
// ============================================================================
// Module: Argument Schema Validation
// Description: Validates tool call arguments against tool input schemas.
// Purpose: Reject malformed arguments before they reach a component.
// Dependencies: jsonschema, serde, serde_json
// ============================================================================

//! ## Overview
//! Input schemas are compiled on first use and memoized on the discovered
//! tool. Validation can be disabled by configuration, in which case no schema
//! is compiled and arguments are forwarded unchecked. Failures carry one
//! entry per violation with a JSON pointer path and a reason.
//!
//! Schemas come from components and are untrusted: external `$ref` targets
//! are never fetched, so a schema referencing one fails to compile.

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonschema::Retrieve;
use jsonschema::Uri;
use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::DiscoveredTool;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of violations reported for one call.
pub(crate) const MAX_REPORTED_VIOLATIONS: usize = 32;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One schema violation in the call arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentViolation {
    /// JSON pointer to the offending value (`""` is the root).
    pub path: String,
    /// Violation description.
    pub reason: String,
}

/// Argument validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// Arguments do not satisfy the input schema.
    #[error("invalid arguments for tool '{tool}'")]
    InvalidArguments {
        /// Tool name.
        tool: String,
        /// Reported violations, capped at [`MAX_REPORTED_VIOLATIONS`].
        violations: Vec<ArgumentViolation>,
    },
    /// The tool's input schema cannot be compiled.
    #[error("input schema for tool '{tool}' is invalid")]
    InvalidSchema {
        /// Tool name.
        tool: String,
        /// Compile failure reason.
        reason: String,
    },
}

/// Argument validator honoring the configuration toggle.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator {
    /// Whether validation runs at all.
    enabled: bool,
}

impl SchemaValidator {
    /// Creates a validator.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
        }
    }

    /// Returns true when arguments are validated.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Validates arguments for a discovered tool.
    ///
    /// Always succeeds when validation is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] when the schema is invalid or the
    /// arguments violate it.
    pub fn validate(&self, tool: &DiscoveredTool, arguments: &Value) -> Result<(), ValidationFailure> {
        if !self.enabled {
            return Ok(());
        }
        let schema = tool.compiled_schema().map_err(|reason| ValidationFailure::InvalidSchema {
            tool: tool.name().to_string(),
            reason: reason.to_string(),
        })?;
        let violations: Vec<ArgumentViolation> = schema
            .iter_errors(arguments)
            .take(MAX_REPORTED_VIOLATIONS)
            .map(|error| ArgumentViolation {
                path: error.instance_path.to_string(),
                reason: error.to_string(),
            })
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::InvalidArguments {
                tool: tool.name().to_string(),
                violations,
            })
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Retriever refusing every external schema reference.
struct DenyExternalRefs;

impl Retrieve for DenyExternalRefs {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema reference refused: {}", uri.as_str()).into())
    }
}

/// Compiles an input schema, detecting the draft from `$schema`.
///
/// Only references local to the schema document resolve.
pub(crate) fn compile_input_schema(schema: &Value) -> Result<Validator, String> {
    jsonschema::options()
        .with_retriever(DenyExternalRefs)
        .build(schema)
        .map_err(|err| format!("invalid schema: {err}"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
