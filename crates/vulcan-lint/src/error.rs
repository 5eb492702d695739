//! Error handling types
//!
//! [`RuleEvaluationError`] means a rule could not reach a verdict for a model.
//! [`LintError`] covers loading, configuration and registry setup.
//! A found violation is never an error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for linter operations
pub type Result<T> = std::result::Result<T, LintError>;

/// A rule could not compute a verdict for a model
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("rule `{rule}` could not evaluate model `{model}`: {message}")]
pub struct RuleEvaluationError {
    /// Name of the rule that failed
    pub rule: String,
    /// Name of the model being evaluated
    pub model: String,
    /// What made the model impossible to judge
    pub message: String,
}

impl RuleEvaluationError {
    pub fn new(
        rule: impl Into<String>,
        model: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            model: model.into(),
            message: message.into(),
        }
    }
}

/// Linter error types
#[derive(Error, Debug)]
pub enum LintError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {file}: {message}")]
    Parse { file: PathBuf, message: String },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate model `{name}` defined in {file}")]
    DuplicateModel { name: String, file: PathBuf },

    #[error("Rule `{0}` is already registered")]
    DuplicateRule(String),

    #[error("Invalid rule definition `{name}`: {message}")]
    InvalidRule { name: String, message: String },

    #[error(transparent)]
    Evaluation(#[from] RuleEvaluationError),
}

impl From<figment::Error> for LintError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
