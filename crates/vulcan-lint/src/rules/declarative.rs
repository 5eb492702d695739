//! Declarative attribute rules
//!
//! Project-specific rules written as YAML instead of code:
//!
//! ```yaml
//! name: require_owner
//! description: "Models need an owner"
//! severity: warning
//! attribute: owner
//! exempt_kinds: [embedded]
//! message: "Models must declare an owner."
//! ```
//!
//! Without `min_items` the attribute only has to be present. With
//! `min_items` it must be a collection holding at least that many entries;
//! a scalar value cannot be counted and is reported as an evaluation error.

use super::{EvaluationResult, Rule};
use crate::context::RuleContext;
use crate::error::{LintError, Result};
use crate::model::Model;
use crate::violation::Severity;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RULE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("rule name pattern is valid"));

/// YAML shape of a declarative rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarativeRuleSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    /// Model attribute or free-form property key
    pub attribute: String,
    #[serde(default)]
    pub min_items: Option<usize>,
    /// Kind name fragments (case-insensitive) that exempt a model
    #[serde(default)]
    pub exempt_kinds: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Attribute-presence rule built from a [`DeclarativeRuleSpec`]
#[derive(Debug, Clone)]
pub struct DeclarativeRule {
    spec: DeclarativeRuleSpec,
    message: String,
}

impl DeclarativeRule {
    pub fn new(spec: DeclarativeRuleSpec) -> Result<Self> {
        if !RULE_NAME.is_match(&spec.name) {
            return Err(LintError::InvalidRule {
                name: spec.name,
                message: "name must be lowercase snake_case".to_string(),
            });
        }
        if spec.attribute.trim().is_empty() {
            return Err(LintError::InvalidRule {
                name: spec.name,
                message: "attribute must not be empty".to_string(),
            });
        }
        if spec.min_items == Some(0) {
            return Err(LintError::InvalidRule {
                name: spec.name,
                message: "min_items must be at least 1".to_string(),
            });
        }

        let message = spec.message.clone().unwrap_or_else(|| match spec.min_items {
            Some(count) => format!(
                "Models must define at least {count} `{}` entr{}.",
                spec.attribute,
                if count == 1 { "y" } else { "ies" }
            ),
            None => format!("Models must define `{}`.", spec.attribute),
        });

        Ok(Self { spec, message })
    }

    pub fn spec(&self) -> &DeclarativeRuleSpec {
        &self.spec
    }

    fn is_exempt(&self, model: &Model) -> bool {
        model.kind.as_ref().is_some_and(|kind| {
            self.spec
                .exempt_kinds
                .iter()
                .any(|fragment| kind.mentions(fragment))
        })
    }
}

impl Rule for DeclarativeRule {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn description(&self) -> &str {
        &self.spec.description
    }

    fn severity(&self) -> Severity {
        self.spec.severity
    }

    fn evaluate(&self, model: &Model, _context: &RuleContext) -> EvaluationResult {
        if self.is_exempt(model) {
            return Ok(None);
        }

        let value = model.attribute(&self.spec.attribute);
        let satisfied = match self.spec.min_items {
            None => value.is_present(),
            Some(required) => {
                let count = value.item_count().ok_or_else(|| {
                    self.evaluation_error(
                        model,
                        format!(
                            "attribute `{}` is not a collection and cannot be counted",
                            self.spec.attribute
                        ),
                    )
                })?;
                count >= required
            }
        };

        Ok((!satisfied).then(|| self.violation(self.message.clone())))
    }
}
