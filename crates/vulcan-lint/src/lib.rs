//! Model Quality Linting for vulcan projects
//!
//! Checks model definitions against an ordered set of rules:
//! - `require_grain`: every model declares its grain
//! - `require_audits`: non-embedded models carry audits
//! - `require_checks`: every model has checks, locally or via a check suite
//! - declarative attribute rules loaded from YAML
//!
//! The engine itself is synchronous and pure: [`Linter`] reads models and a
//! [`RuleContext`] and produces violations, nothing else. Loading definitions
//! from disk and rendering reports live around it.
//!
//! # Example
//!
//! ```
//! use vulcan_lint::{Linter, Model, RuleContext, RuleRegistry};
//!
//! let linter = Linter::new(RuleRegistry::standard());
//! let models = vec![Model::new("sales.orders").with_kind("FULL")];
//!
//! let results = linter.lint(&models, &RuleContext::new()).unwrap();
//! assert_eq!(results["sales.orders"].len(), 3);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod linter;
pub mod loader;
pub mod logging;
pub mod model;
pub mod reporter;
pub mod rules;
pub mod violation;

pub use config::{ConfigLoader, LintConfig, LoggingConfig, ProjectConfig, RulesConfig};
pub use context::RuleContext;
pub use error::{LintError, Result, RuleEvaluationError};
pub use linter::{LintOutcome, LintResults, Linter};
pub use loader::{Project, ProjectLoader};
pub use model::{AttributeValue, CheckDefinition, CheckSuite, Model, ModelKind};
pub use reporter::{LintReport, LintSummary, Reporter};
pub use rules::{
    DeclarativeRule, DeclarativeRuleSpec, EvaluationResult, RequireAudits, RequireChecks,
    RequireGrain, Rule, RuleRegistry,
};
pub use violation::{RuleViolation, Severity};

/// How a project run treats rules that cannot evaluate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LintMode {
    /// Abort on the first evaluation error
    #[default]
    FailFast,
    /// Record evaluation errors and keep linting other models
    KeepGoing,
    /// Like `KeepGoing`, evaluating models in parallel
    Parallel,
}

/// Build the registry a configuration asks for: built-ins, then the
/// project's declarative rules, minus anything disabled.
pub fn build_registry(config: &RulesConfig, project: &Project) -> Result<RuleRegistry> {
    let mut registry = RuleRegistry::standard();
    registry.register_declarative(project.rules.iter().cloned())?;
    registry.disable(&config.disabled);
    Ok(registry)
}

/// Load the configured project, lint it and build a report
pub async fn lint_project(config: &LintConfig, mode: LintMode) -> Result<LintReport> {
    let project = ProjectLoader::new(config.project.clone()).load().await?;
    let registry = build_registry(&config.rules, &project)?;
    let linter = Linter::new(registry).with_severity_overrides(config.rules.severity.clone());
    let context = project.context();

    let outcome = match mode {
        LintMode::FailFast => {
            let violations = linter.lint(&project.models, &context)?;
            LintOutcome {
                violations,
                errors: Vec::new(),
                models_checked: project.models.len(),
            }
        }
        LintMode::KeepGoing => linter.lint_collecting(&project.models, &context),
        LintMode::Parallel => linter.lint_parallel(&project.models, &context),
    };

    Ok(LintReport::from_outcome(
        outcome,
        &project.root,
        config.rules.fail_on,
    ))
}
