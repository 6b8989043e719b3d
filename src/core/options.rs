//! Discovery of selectable release targets.
//!
//! Platforms come from configuration. Contractors are the subdirectories of the
//! base path and environments the subdirectories of each contractor directory.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults::PilotConfig;

/// List subdirectory names directly under `path`, sorted lexicographically.
///
/// A missing path or a path that is not a directory yields an empty list.
/// Names that are not valid UTF-8 are skipped, since they cannot form a script name.
pub fn list_directories(path: &Path) -> Vec<String> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| match entry.file_name().into_string() {
            Ok(name) => Some(name),
            Err(raw) => {
                log_status!(
                    "options",
                    "Skipping non-UTF-8 directory {:?} in {}",
                    raw,
                    path.display()
                );
                None
            }
        })
        .collect();

    names.sort();
    names
}

/// Read-only view over the configured and discovered options.
#[derive(Debug, Clone)]
pub struct OptionSource {
    base_path: PathBuf,
    platforms: Vec<String>,
    stages: Vec<String>,
}

impl OptionSource {
    pub fn new(base_path: impl Into<PathBuf>, platforms: Vec<String>, stages: Vec<String>) -> Self {
        Self {
            base_path: base_path.into(),
            platforms,
            stages,
        }
    }

    pub fn from_config(config: &PilotConfig) -> Self {
        Self::new(
            config.resolved_base_path(),
            config.platforms.clone(),
            config.stages.clone(),
        )
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    pub fn contractors(&self) -> Vec<String> {
        list_directories(&self.base_path)
    }

    pub fn environment_path(&self, contractor: &str) -> PathBuf {
        self.base_path.join(contractor)
    }

    pub fn environments(&self, contractor: &str) -> Vec<String> {
        list_directories(&self.environment_path(contractor))
    }

    /// Snapshot of everything selectable, for non-interactive listing.
    pub fn catalog(&self) -> OptionCatalog {
        let contractors = self
            .contractors()
            .into_iter()
            .map(|name| ContractorOptions {
                environments: self.environments(&name),
                name,
            })
            .collect();

        OptionCatalog {
            base_path: self.base_path.display().to_string(),
            platforms: self.platforms.clone(),
            stages: self.stages.clone(),
            contractors,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionCatalog {
    pub base_path: String,
    pub platforms: Vec<String>,
    pub stages: Vec<String>,
    pub contractors: Vec<ContractorOptions>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractorOptions {
    pub name: String,
    pub environments: Vec<String>,
}
