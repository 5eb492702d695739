//! Rule System
//!
//! A rule is a named, stateless policy over a single model. Built-in rules
//! live in [`builtin`], YAML-defined rules in [`declarative`], and the
//! ordered collection the linter runs is the [`RuleRegistry`].

pub mod builtin;
pub mod declarative;
pub mod registry;

pub use builtin::{RequireAudits, RequireChecks, RequireGrain};
pub use declarative::{DeclarativeRule, DeclarativeRuleSpec};
pub use registry::RuleRegistry;

use crate::context::RuleContext;
use crate::error::RuleEvaluationError;
use crate::model::Model;
use crate::violation::{RuleViolation, Severity};

/// Outcome of evaluating one rule against one model
pub type EvaluationResult = std::result::Result<Option<RuleViolation>, RuleEvaluationError>;

/// Model-quality rule
///
/// Evaluation must be a pure function of the model and context: rules hold no
/// mutable state and never modify what they inspect. Missing optional
/// attributes are read as empty rather than reported as errors.
pub trait Rule: Send + Sync {
    /// Stable identifier used in configuration and reports
    fn name(&self) -> &str;

    /// One-line explanation of what the rule enforces
    fn description(&self) -> &str;

    /// Severity attached to violations this rule produces
    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn evaluate(&self, model: &Model, context: &RuleContext) -> EvaluationResult;

    /// Build a violation attributed to this rule
    fn violation(&self, message: impl Into<String>) -> RuleViolation
    where
        Self: Sized,
    {
        RuleViolation::new(self.name(), message, self.severity())
    }

    /// Build an evaluation error attributed to this rule and `model`
    fn evaluation_error(&self, model: &Model, message: impl Into<String>) -> RuleEvaluationError
    where
        Self: Sized,
    {
        RuleEvaluationError::new(self.name(), &model.name, message)
    }
}
