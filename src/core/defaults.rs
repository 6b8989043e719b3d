use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::plan::CommandTemplate;
use crate::report::ReportStyle;
use crate::utils::{io, validation};

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "release-pilot.json";

/// Root configuration structure for release-pilot.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PilotConfig {
    /// Directory whose subdirectories name contractors.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,

    /// Canonical pipeline order. Selected stages always run in this order.
    #[serde(default = "default_stages")]
    pub stages: Vec<String>,

    #[serde(default)]
    pub command: CommandTemplate,

    #[serde(default = "default_confirm_token")]
    pub confirm_token: String,

    #[serde(default)]
    pub report: ReportConfig,

    /// Where to write the JSON release record after a successful run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_path: Option<String>,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            platforms: default_platforms(),
            stages: default_stages(),
            command: CommandTemplate::default(),
            confirm_token: default_confirm_token(),
            report: ReportConfig::default(),
            record_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    #[serde(default)]
    pub style: ReportStyle,
}

/// Effective configuration plus where it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub config: PilotConfig,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_base_path() -> String {
    "./contractor".to_string()
}

fn default_platforms() -> Vec<String> {
    vec!["android".to_string(), "ios".to_string()]
}

fn default_stages() -> Vec<String> {
    vec!["add".to_string(), "build".to_string()]
}

fn default_confirm_token() -> String {
    "y".to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

impl PilotConfig {
    /// Base path with `~` and environment variables expanded.
    pub fn resolved_base_path(&self) -> PathBuf {
        let expanded = shellexpand::full(&self.base_path)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| self.base_path.clone());
        PathBuf::from(expanded)
    }

    pub fn validate(&self) -> Result<()> {
        validation::require_non_empty(&self.base_path, "basePath")?;
        validation::require_unique_list(&self.platforms, "platforms")?;
        validation::require_unique_list(&self.stages, "stages")?;
        validation::require_non_empty(&self.command.program, "command.program")?;
        validation::require_non_empty(&self.confirm_token, "confirmToken")?;

        if self.command.separator.is_empty() {
            return Err(Error::config_invalid_value(
                "command.separator",
                None,
                "must not be empty",
            ));
        }

        for (key, values) in [("platforms", &self.platforms), ("stages", &self.stages)] {
            if let Some(bad) = values.iter().find(|v| self.command.conflicts_with_separator(v)) {
                return Err(Error::config_invalid_value(
                    key,
                    Some(bad.clone()),
                    format!("overlaps the command separator '{}'", self.command.separator),
                ));
            }
        }

        Ok(())
    }
}

/// Load configuration.
///
/// With an explicit path the file must exist. Without one, `release-pilot.json`
/// in `dir` is used when present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::config_invalid_value(
                    "config",
                    Some(path.display().to_string()),
                    "config file not found",
                ));
            }
            path.to_path_buf()
        }
        None => {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if !candidate.exists() {
                log_status!("config", "No {} found, using defaults", CONFIG_FILE_NAME);
                let config = PilotConfig::default();
                config.validate()?;
                return Ok(LoadedConfig {
                    source: None,
                    config,
                });
            }
            candidate
        }
    };

    let config = load_config_from_file(&path)?;
    log_status!("config", "Loaded {}", path.display());

    Ok(LoadedConfig {
        source: Some(path.display().to_string()),
        config,
    })
}

fn load_config_from_file(path: &Path) -> Result<PilotConfig> {
    let content = io::read_file(path, &format!("read {}", path.display()))?;

    let config: PilotConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

    config.validate()?;
    Ok(config)
}
