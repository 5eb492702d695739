//! End-to-end tests: load a project directory, lint it, build a report

use crate::test_utils::write_file;
use tempfile::TempDir;
use vulcan_lint::{
    LintConfig, LintError, LintMode, ProjectConfig, Reporter, Severity, lint_project,
};

fn config_for(temp: &TempDir) -> LintConfig {
    LintConfig {
        project: ProjectConfig {
            root: temp.path().to_path_buf(),
            ..ProjectConfig::default()
        },
        ..LintConfig::default()
    }
}

fn write_sample_project(temp: &TempDir) {
    write_file(
        temp,
        "models/sales.yml",
        r"
- name: sales.daily_sales
  kind: FULL
  grains: [order_date]
  audits: [not_null_order_date]
  owner: analytics
- name: sales.orders
  kind: INCREMENTAL_BY_UNIQUE_KEY
- name: staging.orders
  kind: EMBEDDED
  grain: [order_id]
  owner: data-eng
",
    );
    write_file(
        temp,
        "checks/daily_sales.yml",
        "name: daily_sales_quality\nmodel_name: sales.daily_sales\n",
    );
    write_file(
        temp,
        "linter/require_owner.yml",
        "name: require_owner\nattribute: owner\nseverity: info\n",
    );
}

#[tokio::test]
async fn test_sample_project_report() {
    let temp = TempDir::new().unwrap();
    write_sample_project(&temp);

    let report = lint_project(&config_for(&temp), LintMode::FailFast)
        .await
        .unwrap();

    assert_eq!(report.summary.models_checked, 3);
    assert!(!report.violations.contains_key("sales.daily_sales"));

    let orders: Vec<&str> = report.violations["sales.orders"]
        .iter()
        .map(|v| v.rule())
        .collect();
    assert_eq!(
        orders,
        vec!["require_grain", "require_audits", "require_checks", "require_owner"]
    );

    let staging: Vec<&str> = report.violations["staging.orders"]
        .iter()
        .map(|v| v.rule())
        .collect();
    assert_eq!(staging, vec!["require_checks"]);

    // built-ins are warnings, the declarative rule is info: nothing reaches `error`
    assert_eq!(report.summary.warning_count, 4);
    assert_eq!(report.summary.info_count, 1);
    assert!(report.summary.passed);
}

#[tokio::test]
async fn test_config_disables_and_regrades_rules() {
    let temp = TempDir::new().unwrap();
    write_sample_project(&temp);
    let mut config = config_for(&temp);
    config.rules.disabled = vec!["require_owner".to_string()];
    config
        .rules
        .severity
        .insert("require_grain".to_string(), Severity::Error);

    let report = lint_project(&config, LintMode::KeepGoing).await.unwrap();

    assert_eq!(report.summary.error_count, 1);
    assert_eq!(report.summary.info_count, 0);
    assert!(!report.summary.passed);
    assert!(Reporter::to_human_readable(&report).contains("Result: FAILED"));
}

#[tokio::test]
async fn test_evaluation_error_modes() {
    let temp = TempDir::new().unwrap();
    write_file(
        &temp,
        "models/models.yml",
        r"
- name: sales.orders
  grain: [id]
  stewards: analytics
- name: sales.customers
  grain: [id]
  stewards: [analytics, finance]
",
    );
    write_file(
        &temp,
        "linter/stewards.yml",
        "name: two_stewards\nattribute: stewards\nmin_items: 2\n",
    );
    let config = config_for(&temp);

    let fail_fast = lint_project(&config, LintMode::FailFast).await;
    assert!(matches!(
        fail_fast,
        Err(LintError::Evaluation(ref error)) if error.model == "sales.orders"
    ));

    let keep_going = lint_project(&config, LintMode::KeepGoing).await.unwrap();
    let parallel = lint_project(&config, LintMode::Parallel).await.unwrap();

    assert_eq!(keep_going.errors, parallel.errors);
    assert_eq!(keep_going.violations, parallel.violations);
    assert_eq!(keep_going.summary.evaluation_errors, 1);
    assert!(!keep_going.summary.passed);
}

#[tokio::test]
async fn test_json_report_is_parseable() {
    let temp = TempDir::new().unwrap();
    write_sample_project(&temp);

    let report = lint_project(&config_for(&temp), LintMode::Parallel)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&Reporter::to_json(&report)).unwrap();

    assert_eq!(json["summary"]["models_checked"], 3);
    assert_eq!(json["violations"]["staging.orders"][0]["rule"], "require_checks");
}
