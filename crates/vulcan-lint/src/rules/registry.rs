//! Rule Registry
//!
//! Ordered collection of rules. Registration order is evaluation order, and
//! therefore the order violations appear in for a given model.

use super::builtin::{RequireAudits, RequireChecks, RequireGrain};
use super::declarative::{DeclarativeRule, DeclarativeRuleSpec};
use super::Rule;
use crate::error::{LintError, Result};
use std::fmt;
use tracing::{debug, warn};

/// Registry holding the rules a linter runs
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registry with the built-in rules: grain, audits, checks
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Box::new(RequireGrain),
                Box::new(RequireAudits),
                Box::new(RequireChecks),
            ],
        }
    }

    /// Append a rule. Rule names must be unique.
    pub fn register(&mut self, rule: impl Rule + 'static) -> Result<()> {
        self.register_boxed(Box::new(rule))
    }

    pub fn register_boxed(&mut self, rule: Box<dyn Rule>) -> Result<()> {
        if self.get(rule.name()).is_some() {
            return Err(LintError::DuplicateRule(rule.name().to_string()));
        }
        debug!(rule = rule.name(), "Registered rule");
        self.rules.push(rule);
        Ok(())
    }

    /// Register declarative rules after the ones already present
    pub fn register_declarative(
        &mut self,
        specs: impl IntoIterator<Item = DeclarativeRuleSpec>,
    ) -> Result<()> {
        for spec in specs {
            self.register(DeclarativeRule::new(spec)?)?;
        }
        Ok(())
    }

    /// Drop rules named in `disabled`, keeping the order of the rest
    pub fn disable(&mut self, disabled: &[String]) {
        for name in disabled {
            if self.get(name).is_none() {
                warn!(rule = %name, "Cannot disable unknown rule");
            }
        }
        self.rules
            .retain(|rule| !disabled.iter().any(|name| name == rule.name()));
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Get a rule by name
    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|rule| rule.name() == name)
            .map(|rule| &**rule)
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
