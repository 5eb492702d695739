//! Linter
//!
//! Runs every registered rule against every model. Results are keyed by model
//! name in a `BTreeMap`, so output never depends on evaluation order, and
//! models without violations are left out of the map.

use crate::context::RuleContext;
use crate::error::RuleEvaluationError;
use crate::model::Model;
use crate::rules::RuleRegistry;
use crate::violation::{RuleViolation, Severity};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Violations per model name. Only models with at least one violation appear.
pub type LintResults = BTreeMap<String, Vec<RuleViolation>>;

/// Result of a lint pass that keeps going past evaluation errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintOutcome {
    pub violations: LintResults,
    /// Evaluation failures, in model input order
    pub errors: Vec<RuleEvaluationError>,
    pub models_checked: usize,
}

impl LintOutcome {
    pub fn total_violations(&self) -> usize {
        self.violations.values().map(Vec::len).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.errors.is_empty()
    }
}

/// Violations found for one model, plus the error that stopped it (if any)
struct ModelVerdict<'a> {
    model: &'a str,
    violations: Vec<RuleViolation>,
    error: Option<RuleEvaluationError>,
}

/// Applies a [`RuleRegistry`] to batches of models
#[derive(Debug, Default)]
pub struct Linter {
    registry: RuleRegistry,
    severity_overrides: BTreeMap<String, Severity>,
}

impl Linter {
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            severity_overrides: BTreeMap::new(),
        }
    }

    /// Re-grade violations of the named rules
    #[must_use]
    pub fn with_severity_overrides(mut self, overrides: BTreeMap<String, Severity>) -> Self {
        for name in overrides.keys() {
            if self.registry.get(name).is_none() {
                warn!(rule = %name, "Severity override for unknown rule");
            }
        }
        self.severity_overrides = overrides;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Lint `models`, stopping at the first rule that cannot evaluate.
    ///
    /// The returned error names the failing rule and model.
    pub fn lint(
        &self,
        models: &[Model],
        context: &RuleContext,
    ) -> Result<LintResults, RuleEvaluationError> {
        let mut results = LintResults::new();
        for model in models {
            let verdict = self.evaluate_model(model, context);
            if let Some(error) = verdict.error {
                return Err(error);
            }
            merge_violations(&mut results, verdict.model, verdict.violations);
        }
        info!(
            models = models.len(),
            rules = self.registry.len(),
            flagged = results.len(),
            "Lint pass complete"
        );
        Ok(results)
    }

    /// Lint `models`, recording evaluation errors instead of stopping.
    ///
    /// An error ends evaluation of the model it occurred on; violations found
    /// for that model before the error are kept, and other models are
    /// unaffected.
    pub fn lint_collecting(&self, models: &[Model], context: &RuleContext) -> LintOutcome {
        let verdicts = models
            .iter()
            .map(|model| self.evaluate_model(model, context));
        self.assemble(models.len(), verdicts)
    }

    /// Same result as [`Linter::lint_collecting`], with models evaluated on
    /// the rayon thread pool.
    pub fn lint_parallel(&self, models: &[Model], context: &RuleContext) -> LintOutcome {
        let verdicts: Vec<ModelVerdict<'_>> = models
            .par_iter()
            .map(|model| self.evaluate_model(model, context))
            .collect();
        self.assemble(models.len(), verdicts)
    }

    fn assemble<'a>(
        &self,
        models_checked: usize,
        verdicts: impl IntoIterator<Item = ModelVerdict<'a>>,
    ) -> LintOutcome {
        let mut outcome = LintOutcome {
            models_checked,
            ..LintOutcome::default()
        };
        for verdict in verdicts {
            merge_violations(&mut outcome.violations, verdict.model, verdict.violations);
            if let Some(error) = verdict.error {
                warn!(%error, "Rule evaluation failed");
                outcome.errors.push(error);
            }
        }
        info!(
            models = models_checked,
            rules = self.registry.len(),
            flagged = outcome.violations.len(),
            errors = outcome.errors.len(),
            "Lint pass complete"
        );
        outcome
    }

    fn evaluate_model<'a>(&self, model: &'a Model, context: &RuleContext) -> ModelVerdict<'a> {
        let mut verdict = ModelVerdict {
            model: &model.name,
            violations: Vec::new(),
            error: None,
        };
        for rule in self.registry.rules() {
            match rule.evaluate(model, context) {
                Ok(Some(violation)) => {
                    debug!(model = %model.name, rule = rule.name(), "Violation found");
                    verdict.violations.push(self.grade(violation));
                }
                Ok(None) => {
                    debug!(model = %model.name, rule = rule.name(), "Rule passed");
                }
                Err(error) => {
                    verdict.error = Some(error);
                    break;
                }
            }
        }
        verdict
    }

    fn grade(&self, violation: RuleViolation) -> RuleViolation {
        match self.severity_overrides.get(violation.rule()) {
            Some(severity) => violation.with_severity(*severity),
            None => violation,
        }
    }
}

/// Models sharing a name accumulate violations in input order
fn merge_violations(results: &mut LintResults, model: &str, violations: Vec<RuleViolation>) {
    if violations.is_empty() {
        return;
    }
    results
        .entry(model.to_string())
        .or_default()
        .extend(violations);
}
