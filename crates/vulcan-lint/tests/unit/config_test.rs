//! Tests for configuration loading

use crate::test_utils::write_file;
use std::path::PathBuf;
use tempfile::TempDir;
use vulcan_lint::{ConfigLoader, DeclarativeRuleSpec, LintConfig, LintError, Severity};

#[test]
fn test_defaults() {
    let config = LintConfig::default();

    assert_eq!(config.project.root, PathBuf::from("."));
    assert_eq!(config.project.models_path(), PathBuf::from("./models"));
    assert_eq!(config.rules.fail_on, Severity::Error);
    assert!(config.rules.disabled.is_empty());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_toml_file_overrides_defaults() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp,
        "vlint.toml",
        r#"
[project]
root = "/srv/warehouse"
check_suites_dir = "quality"

[rules]
disabled = ["require_audits"]
fail_on = "warning"

[rules.severity]
require_grain = "error"

[logging]
level = "debug"
"#,
    );

    let config = ConfigLoader::new()
        .with_env_prefix("VLINT_TEST_UNSET")
        .with_config_path(temp.path().join("vlint.toml"))
        .load()
        .unwrap();

    assert_eq!(config.project.root, PathBuf::from("/srv/warehouse"));
    assert_eq!(config.project.models_dir, PathBuf::from("models"));
    assert_eq!(
        config.project.check_suites_path(),
        PathBuf::from("/srv/warehouse/quality")
    );
    assert_eq!(config.rules.disabled, vec!["require_audits".to_string()]);
    assert_eq!(config.rules.fail_on, Severity::Warning);
    assert_eq!(config.rules.severity["require_grain"], Severity::Error);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp = TempDir::new().unwrap();

    let result = ConfigLoader::new()
        .with_config_path(temp.path().join("absent.toml"))
        .load();

    assert!(matches!(result, Err(LintError::Config(_))));
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_file(&temp, "vlint.toml", "[logging]\nlevel = \"chatty\"\n");

    let result = ConfigLoader::new()
        .with_env_prefix("VLINT_TEST_UNSET")
        .with_config_path(temp.path().join("vlint.toml"))
        .load();

    assert!(matches!(result, Err(LintError::Config(_))));
}

#[test]
fn test_unknown_severity_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_file(&temp, "vlint.toml", "[rules]\nfail_on = \"fatal\"\n");

    let result = ConfigLoader::new()
        .with_env_prefix("VLINT_TEST_UNSET")
        .with_config_path(temp.path().join("vlint.toml"))
        .load();

    assert!(matches!(result, Err(LintError::Config(_))));
}

#[test]
fn test_severity_spellings_match_rule_yaml() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp,
        "vlint.toml",
        "[rules]\nfail_on = \"WARN\"\n\n[rules.severity]\nrequire_grain = \"Error\"\n",
    );

    let config = ConfigLoader::new()
        .with_env_prefix("VLINT_TEST_UNSET")
        .with_config_path(temp.path().join("vlint.toml"))
        .load()
        .unwrap();
    let rule: DeclarativeRuleSpec =
        serde_yaml::from_str("name: r\nattribute: owner\nseverity: WARN").unwrap();

    assert_eq!(config.rules.fail_on, Severity::Warning);
    assert_eq!(config.rules.severity["require_grain"], Severity::Error);
    assert_eq!(rule.severity, config.rules.fail_on);
}

#[test]
fn test_config_path_is_reported() {
    let loader = ConfigLoader::new().with_config_path("/etc/vlint/vlint.toml");

    assert_eq!(
        loader.source_path(),
        Some(PathBuf::from("/etc/vlint/vlint.toml"))
    );
}

#[test]
fn test_config_renders_as_toml() {
    let rendered = LintConfig::default().to_toml().unwrap();

    assert!(rendered.contains("[project]"));
    assert!(rendered.contains("fail_on = \"error\""));
}
