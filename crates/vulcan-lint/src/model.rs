//! Model definitions
//!
//! Typed, read-only view of the model and check-suite definitions owned by the
//! host framework. Every optional attribute defaults to empty, so a definition
//! that omits a field reads the same as one that sets it to nothing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Materialization strategy of a model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    Full,
    View,
    Embedded,
    Seed,
    External,
    IncrementalByTimeRange,
    IncrementalByUniqueKey,
    IncrementalByPartition,
    ScdType2ByTime,
    ScdType2ByColumn,
    /// Kind not known to this crate, kept verbatim
    Other(String),
}

impl ModelKind {
    /// Parse a kind name as written in model definitions (case-insensitive)
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_uppercase().as_str() {
            "FULL" => Self::Full,
            "VIEW" => Self::View,
            "EMBEDDED" => Self::Embedded,
            "SEED" => Self::Seed,
            "EXTERNAL" => Self::External,
            "INCREMENTAL_BY_TIME_RANGE" => Self::IncrementalByTimeRange,
            "INCREMENTAL_BY_UNIQUE_KEY" => Self::IncrementalByUniqueKey,
            "INCREMENTAL_BY_PARTITION" => Self::IncrementalByPartition,
            "SCD_TYPE_2" | "SCD_TYPE_2_BY_TIME" => Self::ScdType2ByTime,
            "SCD_TYPE_2_BY_COLUMN" => Self::ScdType2ByColumn,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Full => "FULL",
            Self::View => "VIEW",
            Self::Embedded => "EMBEDDED",
            Self::Seed => "SEED",
            Self::External => "EXTERNAL",
            Self::IncrementalByTimeRange => "INCREMENTAL_BY_TIME_RANGE",
            Self::IncrementalByUniqueKey => "INCREMENTAL_BY_UNIQUE_KEY",
            Self::IncrementalByPartition => "INCREMENTAL_BY_PARTITION",
            Self::ScdType2ByTime => "SCD_TYPE_2_BY_TIME",
            Self::ScdType2ByColumn => "SCD_TYPE_2_BY_COLUMN",
            Self::Other(name) => name,
        }
    }

    /// Whether the rendered kind name mentions `fragment`, ignoring case
    pub fn mentions(&self, fragment: &str) -> bool {
        self.as_str()
            .to_lowercase()
            .contains(&fragment.trim().to_lowercase())
    }

    /// Embedded kinds are inlined into their consumers and never materialized.
    /// Matches any kind whose name contains "embedded".
    pub fn is_embedded(&self) -> bool {
        self.mentions("embedded")
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ModelKind {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

/// Accepts `kind: FULL` as well as `kind: { name: FULL, ... }`
#[derive(Deserialize)]
#[serde(untagged)]
enum KindRepr {
    Name(String),
    Spec { name: String },
}

impl<'de> Deserialize<'de> for ModelKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = match KindRepr::deserialize(deserializer)? {
            KindRepr::Name(name) | KindRepr::Spec { name } => name,
        };
        Ok(Self::parse(&name))
    }
}

impl Serialize for ModelKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A model definition (table or view) under validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Model {
    /// Fully qualified name, e.g. `sales.daily_sales`. Stable identity of the model.
    pub name: String,
    /// Columns establishing row uniqueness, in declaration order
    #[serde(alias = "grains")]
    pub grain: Vec<String>,
    pub kind: Option<ModelKind>,
    pub audits: BTreeSet<String>,
    pub checks: BTreeSet<String>,
    pub check_suites: BTreeSet<String>,
    pub has_checks: bool,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub cron: Option<String>,
    pub depends_on: BTreeSet<String>,
    /// Column name to SQL type
    pub columns: BTreeMap<String, String>,
    pub tags: BTreeSet<String>,
    /// Any attribute not modelled above
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_yaml::Value>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_grain<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grain = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<ModelKind>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_audits<I, S>(mut self, audits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audits = audits.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_checks<I, S>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checks = checks.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_check_suites<I, S>(mut self, suites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check_suites = suites.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_has_checks(mut self, has_checks: bool) -> Self {
        self.has_checks = has_checks;
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: serde_yaml::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Look up an attribute by its definition key.
    ///
    /// Known fields are matched first (`grains` is accepted for `grain`);
    /// anything else resolves to a free-form property. Unknown keys are
    /// [`AttributeValue::Absent`], never an error.
    pub fn attribute(&self, key: &str) -> AttributeValue<'_> {
        match key {
            "name" => AttributeValue::Text(&self.name),
            "grain" | "grains" => AttributeValue::Items(self.grain.len()),
            "kind" => self
                .kind
                .as_ref()
                .map_or(AttributeValue::Absent, |kind| AttributeValue::Text(kind.as_str())),
            "audits" => AttributeValue::Items(self.audits.len()),
            "checks" => AttributeValue::Items(self.checks.len()),
            "check_suites" => AttributeValue::Items(self.check_suites.len()),
            "has_checks" => AttributeValue::Flag(self.has_checks),
            "description" => text_or_absent(self.description.as_deref()),
            "owner" => text_or_absent(self.owner.as_deref()),
            "cron" => text_or_absent(self.cron.as_deref()),
            "depends_on" => AttributeValue::Items(self.depends_on.len()),
            "columns" => AttributeValue::Items(self.columns.len()),
            "tags" => AttributeValue::Items(self.tags.len()),
            other => self
                .properties
                .get(other)
                .map_or(AttributeValue::Absent, AttributeValue::Property),
        }
    }
}

fn text_or_absent(value: Option<&str>) -> AttributeValue<'_> {
    value.map_or(AttributeValue::Absent, AttributeValue::Text)
}

/// Value of a model attribute as seen by rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    Absent,
    Flag(bool),
    Text(&'a str),
    /// A collection attribute with the given number of entries
    Items(usize),
    Property(&'a serde_yaml::Value),
}

impl AttributeValue<'_> {
    /// Truthiness: absent, false, blank and empty values are not present
    pub fn is_present(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::Flag(flag) => *flag,
            Self::Text(text) => !text.trim().is_empty(),
            Self::Items(count) => *count > 0,
            Self::Property(value) => match value {
                serde_yaml::Value::Null => false,
                serde_yaml::Value::Bool(flag) => *flag,
                serde_yaml::Value::String(text) => !text.trim().is_empty(),
                serde_yaml::Value::Sequence(items) => !items.is_empty(),
                serde_yaml::Value::Mapping(entries) => !entries.is_empty(),
                serde_yaml::Value::Number(_) | serde_yaml::Value::Tagged(_) => true,
            },
        }
    }

    /// Number of entries for collection values; `None` for scalars.
    /// Absent and null values count as empty collections.
    pub fn item_count(&self) -> Option<usize> {
        match self {
            Self::Absent => Some(0),
            Self::Items(count) => Some(*count),
            Self::Property(serde_yaml::Value::Null) => Some(0),
            Self::Property(serde_yaml::Value::Sequence(items)) => Some(items.len()),
            Self::Property(serde_yaml::Value::Mapping(entries)) => Some(entries.len()),
            Self::Flag(_) | Self::Text(_) | Self::Property(_) => None,
        }
    }
}

/// A single named check inside a check suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Check-specific options (columns, thresholds, ...)
    #[serde(flatten)]
    pub options: BTreeMap<String, serde_yaml::Value>,
}

/// Externally defined collection of checks, linked to a model by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSuite {
    /// Suite identifier; the loader derives one from the file name when omitted
    #[serde(default)]
    pub name: String,
    /// Name of the model this suite validates
    pub model_name: String,
    #[serde(default)]
    pub checks: Vec<CheckDefinition>,
}

impl CheckSuite {
    pub fn new(name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_name: model_name.into(),
            checks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_check(mut self, name: impl Into<String>) -> Self {
        self.checks.push(CheckDefinition {
            name: name.into(),
            description: None,
            options: BTreeMap::new(),
        });
        self
    }
}
