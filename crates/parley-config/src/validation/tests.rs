//! Tests for the full validation pipeline.

use super::*;
use crate::schema::ParleyConfig;

#[test]
fn default_config_validates() {
    let config = ParleyConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_temperature_out_of_range() {
    let mut config = ParleyConfig::default();
    config.model.temperature = Some(3.5);
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.temperature"));
}

#[test]
fn unset_temperature_is_fine() {
    let mut config = ParleyConfig::default();
    config.model.temperature = None;
    config.model.max_tokens = None;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_zero_max_tokens() {
    let mut config = ParleyConfig::default();
    config.model.max_tokens = Some(0);
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.max_tokens"));
}

#[test]
fn catches_non_http_base_url() {
    let mut config = ParleyConfig::default();
    config.model.base_url = "generativelanguage.googleapis.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.base_url"));
}

#[test]
fn catches_blank_api_key_env() {
    let mut config = ParleyConfig::default();
    config.model.api_key_env = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.api_key_env must not be empty"));
}

#[test]
fn catches_blank_greeting() {
    let mut config = ParleyConfig::default();
    config.agent.greeting = Some(String::new());
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("agent.greeting"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = ParleyConfig::default();
    config.model.connect_timeout_secs = 0;
    config.model.request_timeout_secs = 10_000;
    config.agent.name = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("model.connect_timeout_secs"));
    assert!(err.contains("model.request_timeout_secs"));
    assert!(err.contains("agent.name"));
    assert_eq!(err.matches("; ").count(), 2);
}
