//! Rule violations
//!
//! A [`RuleViolation`] is the normal, expected output of a rule that found a
//! problem. Values are immutable once built; re-grading a violation produces
//! a new value.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for violations
///
/// Ordered from least to most severe so thresholds can be compared directly.
/// Serialized lowercase; deserialized through [`Severity::parse`], so every
/// source (config file, environment, rule YAML) accepts the same spellings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Error,
}

impl Severity {
    /// Parse a severity name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value)
            .ok_or_else(|| de::Error::unknown_variant(&value, &["info", "warning", "error"]))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
            Self::Info => write!(f, "INFO"),
        }
    }
}

/// Advisory produced by a rule for a single model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    rule: String,
    message: String,
    severity: Severity,
}

impl RuleViolation {
    pub fn new(rule: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            severity,
        }
    }

    /// Name of the rule that produced this violation
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Human-readable advisory text
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Same violation graded at a different severity
    #[must_use]
    pub fn with_severity(self, severity: Severity) -> Self {
        Self { severity, ..self }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule, self.message)
    }
}
