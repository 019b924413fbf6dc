// ABOUTME: Integration tests for promoter.yml parsing and discovery.
// ABOUTME: API settings, workspace overrides, and environment-keyed parameter rules.

use promoter::config::{Config, EnvValue};
use promoter::error::Error;
use promoter::types::Environment;
use std::fs;
use std::time::Duration;

const FULL_CONFIG: &str = r#"
api:
  endpoint: http://fabric.internal:9000/api
  token:
    env: PROMOTER_CONFIG_TEST_TOKEN
  timeout: 45s

workspaces:
  sales-prod: 0d7c1a52-prod

parameters:
  find_replace:
    - find: "${LAKEHOUSE}"
      replace_value:
        dev: lh-dev
        test: lh-test
        prod:
          env: PROMOTER_CONFIG_TEST_LAKEHOUSE
          default: lh-prod
  key_value_replace:
    - path: /properties/activities/0/typeProperties/pool
      replace_value:
        prod: prod-pool
"#;

#[test]
fn parses_full_config() {
    let config = Config::from_yaml(FULL_CONFIG).unwrap();

    assert_eq!(config.api.endpoint, "http://fabric.internal:9000/api");
    assert_eq!(config.api.timeout, Duration::from_secs(45));
    assert_eq!(
        config.workspace_id("sales-prod").map(|id| id.as_str()),
        Some("0d7c1a52-prod")
    );
    assert!(config.workspace_id("sales-dev").is_none());

    let rule = &config.parameters.find_replace[0];
    assert_eq!(rule.find, "${LAKEHOUSE}");
    assert_eq!(
        rule.replace_value.get(&Environment::Test),
        Some(&EnvValue::Literal("lh-test".to_string()))
    );

    let pointer = &config.parameters.key_value_replace[0];
    assert_eq!(pointer.path, "/properties/activities/0/typeProperties/pool");
    assert!(pointer.replace_value.get(&Environment::Dev).is_none());
}

#[test]
fn env_sourced_values_resolve_with_default() {
    let config = Config::from_yaml(FULL_CONFIG).unwrap();
    let prod = &config.parameters.find_replace[0].replace_value[&Environment::Prod];

    temp_env::with_var_unset("PROMOTER_CONFIG_TEST_LAKEHOUSE", || {
        assert_eq!(prod.resolve().unwrap(), "lh-prod");
    });
    temp_env::with_var("PROMOTER_CONFIG_TEST_LAKEHOUSE", Some("lh-override"), || {
        assert_eq!(prod.resolve().unwrap(), "lh-override");
    });
}

#[test]
fn missing_token_variable_is_an_error() {
    let config = Config::from_yaml(FULL_CONFIG).unwrap();
    let token = config.api.token.unwrap();

    temp_env::with_var_unset("PROMOTER_CONFIG_TEST_TOKEN", || {
        let err = token.resolve().unwrap_err();
        assert!(err.to_string().contains("PROMOTER_CONFIG_TEST_TOKEN"));
    });
}

#[test]
fn empty_config_uses_defaults() {
    let config = Config::from_yaml("{}").unwrap();
    assert_eq!(config.api.endpoint, "http://localhost:8080");
    assert_eq!(config.api.timeout, Duration::from_secs(30));
    assert!(config.api.token.is_none());
    assert!(config.workspaces.is_empty());
    assert!(config.parameters.find_replace.is_empty());
}

#[test]
fn unknown_environment_key_is_rejected() {
    let yaml = r#"
parameters:
  find_replace:
    - find: x
      replace_value:
        staging: y
"#;
    assert!(matches!(Config::from_yaml(yaml), Err(Error::Yaml(_))));
}

#[test]
fn discover_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::discover(dir.path()).unwrap();
    assert_eq!(config.api.endpoint, "http://localhost:8080");
}

#[test]
fn discover_finds_nested_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join(".promoter")).unwrap();
    fs::write(
        dir.path().join(".promoter/config.yml"),
        "api:\n  endpoint: http://nested:1234\n",
    )
    .unwrap();

    let config = Config::discover(dir.path()).unwrap();
    assert_eq!(config.api.endpoint, "http://nested:1234");
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("nope.yml")).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound(_)));
}
