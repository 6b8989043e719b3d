//! Expansion of release selections into an ordered command plan.
//!
//! Nesting is contractor -> environment -> platform -> stage. Changing that order
//! changes the order builds are released in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::defaults::PilotConfig;
use crate::error::{Error, Result};
use crate::shell::quote_arg;

/// Contractor -> its selected environments (each list in selection order).
pub type EnvironmentMap = BTreeMap<String, Vec<String>>;

/// Renders one build-tool command per (platform, contractor, environment, stage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTemplate {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_program() -> String {
    "yarn".to_string()
}

fn default_separator() -> String {
    ":".to_string()
}

impl Default for CommandTemplate {
    fn default() -> Self {
        Self {
            program: default_program(),
            separator: default_separator(),
        }
    }
}

impl CommandTemplate {
    /// Script name passed to the build tool, e.g. `android:kompa:beta:add`.
    pub fn script(&self, platform: &str, contractor: &str, environment: &str, stage: &str) -> String {
        [platform, contractor, environment, stage].join(self.separator.as_str())
    }

    pub fn render(&self, platform: &str, contractor: &str, environment: &str, stage: &str) -> String {
        let script = self.script(platform, contractor, environment, stage);
        format!("{} {}", self.program, quote_arg(&script))
    }

    /// True when `value` contains any character of the separator.
    ///
    /// Rejecting partial overlaps too keeps `script` injective for multi-character
    /// separators: `a:` + `b` and `a` + `:b` would both join to `a:::b` with `::`.
    pub fn conflicts_with_separator(&self, value: &str) -> bool {
        value.chars().any(|c| self.separator.contains(c))
    }

    fn check_segment(&self, field: &str, value: &str) -> Result<()> {
        let problem = if value.is_empty() {
            "must not be empty".to_string()
        } else if self.conflicts_with_separator(value) {
            format!("'{}' overlaps the command separator '{}'", value, self.separator)
        } else {
            return Ok(());
        };

        Err(Error::validation_invalid_argument(
            field,
            problem,
            Some(value.to_string()),
            None,
        ))
    }
}

/// Order `selected` stages by the canonical pipeline order.
///
/// Unknown stages are dropped and canonical stages that were not selected are skipped.
pub fn canonical_stages(canonical: &[String], selected: &[String]) -> Vec<String> {
    canonical
        .iter()
        .filter(|stage| selected.contains(*stage))
        .cloned()
        .collect()
}

/// Everything the operator chose for one release.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSelection {
    pub platforms: Vec<String>,
    pub contractors: Vec<String>,
    pub environments: EnvironmentMap,
    pub stages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCommand {
    pub contractor: String,
    pub environment: String,
    pub platform: String,
    pub stage: String,
    pub command: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentGroup {
    pub environment: String,
    pub commands: Vec<PlannedCommand>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractorGroup {
    pub contractor: String,
    pub environments: Vec<EnvironmentGroup>,
}

/// Ordered release plan, grouped the way checkpoints are taken.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub stages: Vec<String>,
    pub groups: Vec<ContractorGroup>,
}

impl Plan {
    pub fn commands(&self) -> impl Iterator<Item = &PlannedCommand> {
        self.groups
            .iter()
            .flat_map(|group| group.environments.iter())
            .flat_map(|env| env.commands.iter())
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.commands().map(|c| c.command.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.commands().count()
    }

    pub fn is_empty(&self) -> bool {
        self.commands().next().is_none()
    }
}

#[derive(Debug, Clone)]
pub struct PlanBuilder {
    template: CommandTemplate,
    canonical_stages: Vec<String>,
}

impl PlanBuilder {
    pub fn new(template: CommandTemplate, canonical_stages: Vec<String>) -> Self {
        Self {
            template,
            canonical_stages,
        }
    }

    pub fn from_config(config: &PilotConfig) -> Self {
        Self::new(config.command.clone(), config.stages.clone())
    }

    pub fn build(&self, selection: &ReleaseSelection) -> Result<Plan> {
        self.build_plan(
            &selection.contractors,
            &selection.environments,
            &selection.platforms,
            &selection.stages,
        )
    }

    pub fn build_plan(
        &self,
        contractors: &[String],
        environments: &EnvironmentMap,
        platforms: &[String],
        stages: &[String],
    ) -> Result<Plan> {
        check_environment_keys(contractors, environments)?;

        let stages = canonical_stages(&self.canonical_stages, stages);
        for platform in platforms {
            self.template.check_segment("platform", platform)?;
        }
        for stage in &stages {
            self.template.check_segment("stage", stage)?;
        }

        let mut groups = Vec::with_capacity(contractors.len());
        for contractor in contractors {
            self.template.check_segment("contractor", contractor)?;

            let mut env_groups = Vec::new();
            for environment in &environments[contractor] {
                self.template.check_segment("environment", environment)?;

                let mut commands = Vec::with_capacity(platforms.len() * stages.len());
                for platform in platforms {
                    for stage in &stages {
                        commands.push(PlannedCommand {
                            contractor: contractor.clone(),
                            environment: environment.clone(),
                            platform: platform.clone(),
                            stage: stage.clone(),
                            command: self.template.render(platform, contractor, environment, stage),
                        });
                    }
                }

                env_groups.push(EnvironmentGroup {
                    environment: environment.clone(),
                    commands,
                });
            }

            groups.push(ContractorGroup {
                contractor: contractor.clone(),
                environments: env_groups,
            });
        }

        Ok(Plan { stages, groups })
    }
}

fn check_environment_keys(contractors: &[String], environments: &EnvironmentMap) -> Result<()> {
    if let Some(missing) = contractors.iter().find(|c| !environments.contains_key(*c)) {
        return Err(Error::validation_invalid_argument(
            "environments",
            format!("No environments selected for contractor '{}'", missing),
            Some(missing.clone()),
            None,
        ));
    }

    if let Some(extra) = environments.keys().find(|k| !contractors.contains(*k)) {
        return Err(Error::validation_invalid_argument(
            "environments",
            format!("Environments given for unselected contractor '{}'", extra),
            Some(extra.clone()),
            Some(contractors.to_vec()),
        ));
    }

    Ok(())
}
