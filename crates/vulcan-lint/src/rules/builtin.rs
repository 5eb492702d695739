//! Built-in model rules
//!
//! | Name | Fires when |
//! |------|------------|
//! | `require_grain` | the model declares no grain |
//! | `require_audits` | a non-embedded model declares no audits |
//! | `require_checks` | no local checks and no check suite targets the model |

use super::{EvaluationResult, Rule};
use crate::context::RuleContext;
use crate::model::{Model, ModelKind};
use tracing::trace;

pub const REQUIRE_GRAIN_MESSAGE: &str =
    "All models must define a grain for data quality assurance.";

pub const REQUIRE_AUDITS_MESSAGE: &str =
    "Missing audit rules: All non-embedded models should include data quality audits.";

pub const REQUIRE_CHECKS_MESSAGE: &str = "Models should have data quality checks defined.\n\
Consider adding checks for:\n \
• Completeness\n \
• Validity\n \
• Uniqueness\n \
• Other relevant quality constraints";

/// Every model must declare the columns that make a row unique
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireGrain;

impl Rule for RequireGrain {
    fn name(&self) -> &str {
        "require_grain"
    }

    fn description(&self) -> &str {
        "Ensures all models have a grain definition"
    }

    fn evaluate(&self, model: &Model, _context: &RuleContext) -> EvaluationResult {
        if model.grain.is_empty() {
            return Ok(Some(self.violation(REQUIRE_GRAIN_MESSAGE)));
        }
        Ok(None)
    }
}

/// Materialized models must carry audits; embedded models are exempt
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireAudits;

impl Rule for RequireAudits {
    fn name(&self) -> &str {
        "require_audits"
    }

    fn description(&self) -> &str {
        "Ensures all models except embedded kind have audit rules"
    }

    fn evaluate(&self, model: &Model, _context: &RuleContext) -> EvaluationResult {
        if model.kind.as_ref().is_some_and(ModelKind::is_embedded) {
            trace!(model = %model.name, "Embedded model exempt from audits");
            return Ok(None);
        }
        if model.audits.is_empty() {
            return Ok(Some(self.violation(REQUIRE_AUDITS_MESSAGE)));
        }
        Ok(None)
    }
}

/// Every model needs data quality checks, declared locally or in a suite.
///
/// Sources are consulted in a fixed order, cheapest first: `checks`,
/// `check_suites`, `has_checks`, then the context's check suites matched by
/// model name. An empty model name skips the context lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireChecks;

impl RequireChecks {
    fn has_local_checks(model: &Model) -> bool {
        !model.checks.is_empty() || !model.check_suites.is_empty() || model.has_checks
    }
}

impl Rule for RequireChecks {
    fn name(&self) -> &str {
        "require_checks"
    }

    fn description(&self) -> &str {
        "Ensures all models have data quality checks defined"
    }

    fn evaluate(&self, model: &Model, context: &RuleContext) -> EvaluationResult {
        if Self::has_local_checks(model) {
            return Ok(None);
        }
        if !model.name.is_empty() && context.has_check_suite_for(&model.name) {
            trace!(model = %model.name, "Checks provided by check suite");
            return Ok(None);
        }
        Ok(Some(self.violation(REQUIRE_CHECKS_MESSAGE)))
    }
}
