//! Lint Report Generation
//!
//! Generates reports in multiple formats:
//! - JSON for CI integration
//! - Human-readable for terminal output
//!
//! Evaluation errors are listed in their own section so that "found a
//! problem" and "could not check" stay distinguishable.

use crate::error::RuleEvaluationError;
use crate::linter::{LintOutcome, LintResults};
use crate::violation::Severity;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Lint report for one project run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintReport {
    /// Timestamp of the lint run (RFC 3339)
    pub timestamp: String,
    pub project_root: PathBuf,
    pub summary: LintSummary,
    /// Violations per model; clean models are omitted
    pub violations: LintResults,
    pub errors: Vec<RuleEvaluationError>,
}

/// Summary of lint results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintSummary {
    pub models_checked: usize,
    pub models_with_violations: usize,
    pub total_violations: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub evaluation_errors: usize,
    /// Severity threshold the run was judged against
    pub fail_on: Severity,
    /// No evaluation errors and no violation at or above `fail_on`
    pub passed: bool,
}

impl LintReport {
    pub fn from_outcome(
        outcome: LintOutcome,
        project_root: impl Into<PathBuf>,
        fail_on: Severity,
    ) -> Self {
        let mut summary = LintSummary {
            models_checked: outcome.models_checked,
            models_with_violations: outcome.violations.len(),
            evaluation_errors: outcome.errors.len(),
            fail_on,
            ..LintSummary::default()
        };

        let mut failing = false;
        for violation in outcome.violations.values().flatten() {
            summary.total_violations += 1;
            match violation.severity() {
                Severity::Error => summary.error_count += 1,
                Severity::Warning => summary.warning_count += 1,
                Severity::Info => summary.info_count += 1,
            }
            failing |= violation.severity() >= fail_on;
        }
        summary.passed = !failing && outcome.errors.is_empty();

        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            project_root: project_root.into(),
            summary,
            violations: outcome.violations,
            errors: outcome.errors,
        }
    }
}

/// Report generator
pub struct Reporter;

impl Reporter {
    /// Generate JSON report
    pub fn to_json(report: &LintReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Generate human-readable report
    pub fn to_human_readable(report: &LintReport) -> String {
        let summary = &report.summary;
        let mut output = String::new();

        output.push_str("=== Model Lint Report ===\n\n");
        let _ = writeln!(output, "Timestamp: {}", report.timestamp);
        let _ = writeln!(output, "Project:   {}\n", report.project_root.display());

        output.push_str("--- Summary ---\n");
        let _ = writeln!(output, "Models checked:   {}", summary.models_checked);
        let _ = writeln!(output, "Models flagged:   {}", summary.models_with_violations);
        let _ = writeln!(
            output,
            "Violations:       {} ({} error, {} warning, {} info)",
            summary.total_violations, summary.error_count, summary.warning_count, summary.info_count
        );
        let _ = writeln!(output, "Evaluation errors: {}", summary.evaluation_errors);
        output.push('\n');

        if !report.violations.is_empty() {
            output.push_str("--- Violations ---\n");
            for (model, violations) in &report.violations {
                let _ = writeln!(output, "{model}:");
                for violation in violations {
                    let _ = writeln!(
                        output,
                        "  [{}] {}: {}",
                        violation.severity(),
                        violation.rule(),
                        indent_continuation(violation.message())
                    );
                }
            }
            output.push('\n');
        }

        if !report.errors.is_empty() {
            output.push_str("--- Could Not Check ---\n");
            for error in &report.errors {
                let _ = writeln!(output, "  {}: {} ({})", error.model, error.rule, error.message);
            }
            output.push('\n');
        }

        if summary.passed {
            let _ = writeln!(output, "Result: PASSED (fail on {})", summary.fail_on);
        } else {
            let _ = writeln!(output, "Result: FAILED (fail on {})", summary.fail_on);
        }
        output
    }
}

fn indent_continuation(message: &str) -> String {
    message.trim().replace('\n', "\n    ")
}
