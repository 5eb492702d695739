//! Rule context
//!
//! Read-only lookup data that rules need but that does not live on the model
//! itself. Built once by the caller and shared by reference across every
//! evaluation.

use crate::model::CheckSuite;
use std::collections::BTreeMap;
use tracing::warn;

/// Cross-model lookup data available to rules
#[derive(Debug, Clone, Default)]
pub struct RuleContext {
    /// Check suites keyed by suite name
    check_suites: BTreeMap<String, CheckSuite>,
}

impl RuleContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from loaded check suites
    pub fn from_check_suites(suites: impl IntoIterator<Item = CheckSuite>) -> Self {
        let mut context = Self::new();
        for suite in suites {
            context.insert_check_suite(suite);
        }
        context
    }

    #[must_use]
    pub fn with_check_suite(mut self, suite: CheckSuite) -> Self {
        self.insert_check_suite(suite);
        self
    }

    /// Add a suite; a suite with the same name replaces the earlier one
    pub fn insert_check_suite(&mut self, suite: CheckSuite) {
        if let Some(previous) = self.check_suites.insert(suite.name.clone(), suite) {
            warn!(
                suite = %previous.name,
                model = %previous.model_name,
                "Check suite redefined, keeping the later definition"
            );
        }
    }

    /// All suites whose `model_name` equals `model_name`, in suite-name order.
    /// Unknown names yield an empty list.
    pub fn check_suites_for(&self, model_name: &str) -> Vec<&CheckSuite> {
        self.check_suites
            .values()
            .filter(|suite| suite.model_name == model_name)
            .collect()
    }

    pub fn has_check_suite_for(&self, model_name: &str) -> bool {
        self.check_suites
            .values()
            .any(|suite| suite.model_name == model_name)
    }

    pub fn check_suites(&self) -> impl Iterator<Item = &CheckSuite> {
        self.check_suites.values()
    }

    pub fn len(&self) -> usize {
        self.check_suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.check_suites.is_empty()
    }
}
