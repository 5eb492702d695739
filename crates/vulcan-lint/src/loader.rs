//! Project Loader
//!
//! Discovers model, check-suite and declarative rule definitions in YAML
//! files under a project directory. Each file holds a single document or a
//! list of documents. Files are visited in path order so loading is
//! deterministic.

use crate::config::ProjectConfig;
use crate::context::RuleContext;
use crate::error::{LintError, Result};
use crate::model::{CheckSuite, Model};
use crate::rules::DeclarativeRuleSpec;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Everything loaded from a project directory
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub root: PathBuf,
    pub models: Vec<Model>,
    pub check_suites: Vec<CheckSuite>,
    pub rules: Vec<DeclarativeRuleSpec>,
}

impl Project {
    /// Rule context backed by the project's check suites
    pub fn context(&self) -> RuleContext {
        RuleContext::from_check_suites(self.check_suites.iter().cloned())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// YAML project loader
#[derive(Debug, Clone)]
pub struct ProjectLoader {
    config: ProjectConfig,
}

impl ProjectLoader {
    pub fn new(config: ProjectConfig) -> Self {
        Self { config }
    }

    /// Loader rooted at `root` with default directory names
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self::new(ProjectConfig {
            root: root.into(),
            ..ProjectConfig::default()
        })
    }

    /// Load models, check suites and declarative rules
    pub async fn load(&self) -> Result<Project> {
        let models = self.load_models().await?;
        let check_suites = self.load_check_suites().await?;
        let rules = self.load_rules().await?;

        info!(
            root = %self.config.root.display(),
            models = models.len(),
            check_suites = check_suites.len(),
            rules = rules.len(),
            "Project loaded"
        );

        Ok(Project {
            root: self.config.root.clone(),
            models,
            check_suites,
            rules,
        })
    }

    /// Load model definitions. Names must be non-blank and unique.
    pub async fn load_models(&self) -> Result<Vec<Model>> {
        let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
        let mut models = Vec::new();

        for (file, model) in load_documents::<Model>(&self.config.models_path()).await? {
            if model.name.trim().is_empty() {
                return Err(LintError::Parse {
                    file,
                    message: "model definition is missing a name".to_string(),
                });
            }
            if seen.contains_key(&model.name) {
                return Err(LintError::DuplicateModel {
                    name: model.name,
                    file,
                });
            }
            seen.insert(model.name.clone(), file);
            models.push(model);
        }
        Ok(models)
    }

    /// Load check suites. An unnamed suite is named after its file's path
    /// relative to the check-suites directory, e.g. `sales/orders`.
    pub async fn load_check_suites(&self) -> Result<Vec<CheckSuite>> {
        let dir = self.config.check_suites_path();
        let documents = load_documents::<CheckSuite>(&dir).await?;
        let mut per_file: BTreeMap<PathBuf, usize> = BTreeMap::new();
        let mut suites = Vec::with_capacity(documents.len());

        for (file, mut suite) in documents {
            let index = per_file.entry(file.clone()).or_insert(0);
            if suite.name.trim().is_empty() {
                let base = default_suite_name(&dir, &file);
                suite.name = if *index == 0 {
                    base
                } else {
                    format!("{base}#{index}")
                };
            }
            *index += 1;
            suites.push(suite);
        }
        Ok(suites)
    }

    pub async fn load_rules(&self) -> Result<Vec<DeclarativeRuleSpec>> {
        Ok(load_documents::<DeclarativeRuleSpec>(&self.config.rules_path())
            .await?
            .into_iter()
            .map(|(_, spec)| spec)
            .collect())
    }
}

/// Parse every YAML file under `dir`. A missing directory yields nothing.
async fn load_documents<T: DeserializeOwned>(dir: &Path) -> Result<Vec<(PathBuf, T)>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "Directory not found, nothing to load");
        return Ok(Vec::new());
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| LintError::Io(std::io::Error::other(e)))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_yaml_file(path) {
            continue;
        }

        let content = tokio::fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            debug!(file = %path.display(), "Skipping empty file");
            continue;
        }
        let parsed: OneOrMany<T> =
            serde_yaml::from_str(&content).map_err(|e| LintError::Parse {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let items = parsed.into_vec();
        debug!(file = %path.display(), count = items.len(), "Loaded definitions");
        documents.extend(items.into_iter().map(|item| (path.to_path_buf(), item)));
    }
    Ok(documents)
}

/// `file` relative to `dir`, extension dropped, components joined with `/`
fn default_suite_name(dir: &Path, file: &Path) -> String {
    file.strip_prefix(dir)
        .unwrap_or(file)
        .with_extension("")
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_yaml_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml" | "yaml")
    )
}
