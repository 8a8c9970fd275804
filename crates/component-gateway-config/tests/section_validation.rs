//! Section validation tests for component-gateway-config.
// crates/component-gateway-config/tests/section_validation.rs
// =============================================================================
// Module: Config Section Validation Tests
// Description: Validate component, discovery, dispatch, and server sections.
// Purpose: Ensure invalid values are rejected before the gateway starts.
// =============================================================================

use component_gateway_config::DuplicatePolicy;
use component_gateway_config::GatewayConfig;
use component_gateway_config::ToolNaming;
use component_gateway_config::parse_bool_flag;
use component_gateway_config::parse_component_names;

type TestResult = Result<(), String>;

fn assert_rejected(content: &str, needle: &str) -> TestResult {
    match GatewayConfig::from_toml_str(content) {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err(format!("expected rejection for:\n{content}")),
    }
}

#[test]
fn component_names_accept_csv_string() -> TestResult {
    let config = GatewayConfig::from_toml_str("[components]\nnames = \"a, b_c,,d-e\"\n")
        .map_err(|err| err.to_string())?;
    let expected = vec!["a".to_string(), "b_c".to_string(), "d-e".to_string()];
    if config.components.names != expected {
        return Err(format!("unexpected names {}", config.components.names.join(",")));
    }
    Ok(())
}

#[test]
fn component_names_reject_duplicates() -> TestResult {
    assert_rejected("[components]\nnames = [\"alpha\", \"alpha\"]\n", "duplicate component 'alpha'")
}

#[test]
fn component_names_reject_invalid_characters() -> TestResult {
    assert_rejected("[components]\nnames = \"bad.name\"\n", "may only contain")?;
    assert_rejected("[components]\nnames = \"_leading\"\n", "must start and end")?;
    assert_rejected(&format!("[components]\nnames = \"{}\"\n", "a".repeat(64)), "1-63 characters")
}

#[test]
fn addresses_must_reference_known_components() -> TestResult {
    assert_rejected(
        "[components]\nnames = \"alpha\"\n[components.addresses]\nbeta = \"http://127.0.0.1:1/\"\n",
        "unknown component 'beta'",
    )?;
    assert_rejected(
        "[components]\nnames = \"alpha\"\n[components.addresses]\nalpha = \"127.0.0.1:1\"\n",
        "must include http:// or https://",
    )
}

#[test]
fn scheme_and_domain_are_checked() -> TestResult {
    assert_rejected("[components]\nscheme = \"ftp\"\n", "components.scheme")?;
    assert_rejected("[components]\ninternal_domain = \".internal\"\n", "not a valid domain")
}

#[test]
fn discovery_limits_are_bounded() -> TestResult {
    assert_rejected("[discovery]\nfetch_timeout_ms = 0\n", "discovery.fetch_timeout_ms")?;
    assert_rejected("[discovery]\ncycle_deadline_ms = 999999999\n", "discovery.cycle_deadline_ms")?;
    assert_rejected("[discovery]\nmax_response_bytes = 0\n", "discovery.max_response_bytes")?;
    assert_rejected(
        "[discovery]\nlisting_cache_ttl_ms = 99999999\n",
        "discovery.listing_cache_ttl_ms",
    )
}

#[test]
fn discovery_policies_parse() -> TestResult {
    let config = GatewayConfig::from_toml_str(
        "[discovery]\nduplicate_policy = \"reject\"\ntool_naming = \"component_prefixed\"\n\
         listing_cache_ttl_ms = 250\n",
    )
    .map_err(|err| err.to_string())?;
    if config.discovery.duplicate_policy != DuplicatePolicy::Reject {
        return Err("expected reject policy".to_string());
    }
    if config.discovery.tool_naming != ToolNaming::ComponentPrefixed {
        return Err("expected prefixed naming".to_string());
    }
    if config.discovery.listing_cache_ttl().map(|ttl| ttl.as_millis()) != Some(250) {
        return Err("expected 250ms cache window".to_string());
    }
    Ok(())
}

#[test]
fn unknown_policy_is_parse_error() -> TestResult {
    assert_rejected("[discovery]\nduplicate_policy = \"merge\"\n", "config parse error")
}

#[test]
fn dispatch_and_server_limits_are_bounded() -> TestResult {
    assert_rejected("[dispatch]\ntimeout_ms = 0\n", "dispatch.timeout_ms")?;
    assert_rejected("[server]\nmax_body_bytes = 0\n", "server.max_body_bytes")?;
    assert_rejected("[server]\nmax_sessions = 0\n", "server.max_sessions")?;
    assert_rejected("[server]\nbind = \"not-an-addr\"\n", "invalid bind address")?;
    assert_rejected("[server]\nserver_name = \"  \"\n", "server.server_name")
}

#[test]
fn helper_parsers_behave() -> TestResult {
    if parse_component_names(" , ,") != Vec::<String>::new() {
        return Err("blank list should be empty".to_string());
    }
    if parse_bool_flag(" On ") != Some(true) || parse_bool_flag("0") != Some(false) {
        return Err("flag parsing mismatch".to_string());
    }
    if parse_bool_flag("maybe").is_some() {
        return Err("unexpected flag acceptance".to_string());
    }
    Ok(())
}
