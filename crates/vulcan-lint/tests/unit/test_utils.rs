//! Shared test utilities for vulcan-lint tests

#![allow(dead_code)] // Test utilities may not all be used in every test file

use std::fs;
use tempfile::TempDir;
use vulcan_lint::{EvaluationResult, Model, Rule, RuleContext};

/// Write `content` to `relative_path` inside the temp directory
pub fn write_file(temp: &TempDir, relative_path: &str, content: &str) {
    let full_path = temp.path().join(relative_path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full_path, content).unwrap();
}

/// Model that satisfies every built-in rule
pub fn compliant_model(name: &str) -> Model {
    Model::new(name)
        .with_kind("FULL")
        .with_grain(["id"])
        .with_audits(["not_null"])
        .with_checks(["unique_id"])
}

/// Rule that cannot evaluate models whose name contains `poison`
pub struct FailingRule {
    pub poison: &'static str,
}

impl Rule for FailingRule {
    fn name(&self) -> &str {
        "failing_rule"
    }

    fn description(&self) -> &str {
        "Fails on poisoned models"
    }

    fn evaluate(&self, model: &Model, _context: &RuleContext) -> EvaluationResult {
        if model.name.contains(self.poison) {
            return Err(self.evaluation_error(model, "malformed definition"));
        }
        Ok(None)
    }
}
