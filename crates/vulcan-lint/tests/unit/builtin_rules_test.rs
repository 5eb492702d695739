//! Tests for the built-in model rules

use vulcan_lint::rules::builtin::{
    REQUIRE_AUDITS_MESSAGE, REQUIRE_CHECKS_MESSAGE, REQUIRE_GRAIN_MESSAGE,
};
use vulcan_lint::{
    CheckSuite, Model, ModelKind, RequireAudits, RequireChecks, RequireGrain, Rule, RuleContext,
};

const ALL_KINDS: [&str; 11] = [
    "FULL",
    "VIEW",
    "EMBEDDED",
    "SEED",
    "EXTERNAL",
    "INCREMENTAL_BY_TIME_RANGE",
    "INCREMENTAL_BY_UNIQUE_KEY",
    "INCREMENTAL_BY_PARTITION",
    "SCD_TYPE_2_BY_TIME",
    "SCD_TYPE_2_BY_COLUMN",
    "custom",
];

fn violations(rule: &dyn Rule, model: &Model, context: &RuleContext) -> usize {
    usize::from(rule.evaluate(model, context).unwrap().is_some())
}

#[test]
fn test_grain_rule_across_kinds() {
    let context = RuleContext::new();
    for kind in ALL_KINDS {
        let without = Model::new("m").with_kind(kind);
        let with = Model::new("m").with_kind(kind).with_grain(["a", "b"]);

        assert_eq!(violations(&RequireGrain, &without, &context), 1, "{kind}");
        assert_eq!(violations(&RequireGrain, &with, &context), 0, "{kind}");
    }
}

#[test]
fn test_grain_violation_message() {
    let violation = RequireGrain
        .evaluate(&Model::new("m"), &RuleContext::new())
        .unwrap()
        .unwrap();

    assert_eq!(violation.rule(), "require_grain");
    assert_eq!(violation.message(), REQUIRE_GRAIN_MESSAGE);
}

#[test]
fn test_embedded_models_never_need_audits() {
    let context = RuleContext::new();
    for kind in ["EMBEDDED", "Embedded", "embedded", "LEGACY_EMBEDDED_VIEW"] {
        let bare = Model::new("stage").with_kind(kind);
        let audited = Model::new("stage").with_kind(kind).with_audits(["x"]);

        assert_eq!(violations(&RequireAudits, &bare, &context), 0, "{kind}");
        assert_eq!(violations(&RequireAudits, &audited, &context), 0, "{kind}");
    }
}

#[test]
fn test_non_embedded_models_need_audits() {
    let context = RuleContext::new();
    for kind in ALL_KINDS.iter().filter(|kind| !ModelKind::parse(kind).is_embedded()) {
        let bare = Model::new("m").with_kind(*kind);
        let audited = Model::new("m").with_kind(*kind).with_audits(["not_null"]);

        assert_eq!(violations(&RequireAudits, &bare, &context), 1, "{kind}");
        assert_eq!(violations(&RequireAudits, &audited, &context), 0, "{kind}");
    }

    let violation = RequireAudits
        .evaluate(&Model::new("m"), &context)
        .unwrap()
        .unwrap();
    assert_eq!(violation.message(), REQUIRE_AUDITS_MESSAGE);
}

#[test]
fn test_matching_check_suite_satisfies_checks_rule() {
    let context = RuleContext::new().with_check_suite(
        CheckSuite::new("subs_quality", "b2b_saas.subscriptions").with_check("row_count"),
    );
    let model = Model::new("b2b_saas.subscriptions");

    assert_eq!(violations(&RequireChecks, &model, &context), 0);
}

#[test]
fn test_non_matching_check_suite_does_not_count() {
    let context = RuleContext::new()
        .with_check_suite(CheckSuite::new("subs_quality", "b2b_saas.subscriptions"));
    let model = Model::new("b2b_saas.accounts");

    let violation = RequireChecks.evaluate(&model, &context).unwrap().unwrap();
    assert_eq!(violation.rule(), "require_checks");
    assert_eq!(violation.message(), REQUIRE_CHECKS_MESSAGE);
    assert!(violation.message().contains("Completeness"));
}

#[test]
fn test_only_an_empty_name_skips_the_suite_lookup() {
    let context = RuleContext::new()
        .with_check_suite(CheckSuite::new("spaces", " "))
        .with_check_suite(CheckSuite::new("empty", ""));

    assert_eq!(violations(&RequireChecks, &Model::new(" "), &context), 0);
    assert_eq!(violations(&RequireChecks, &Model::new(""), &context), 1);
}

#[test]
fn test_embedded_exemption_does_not_extend_to_checks() {
    let model = Model::new("stage").with_kind("EMBEDDED").with_grain(["id"]);

    assert_eq!(violations(&RequireChecks, &model, &RuleContext::new()), 1);
}

#[test]
fn test_rules_do_not_touch_the_model() {
    let model = Model::new("orders").with_kind("FULL");
    let snapshot = model.clone();
    let context = RuleContext::new();

    for rule in [&RequireGrain as &dyn Rule, &RequireAudits, &RequireChecks] {
        let _ = rule.evaluate(&model, &context).unwrap();
    }
    assert_eq!(model, snapshot);
}
