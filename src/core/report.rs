//! Release summary data and its console renderings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::executor::ExecutionRecord;
use crate::io;
use crate::plan::EnvironmentMap;
use crate::probe::EnvironmentProbe;

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    #[default]
    Technical,
    Narrative,
}

impl FromStr for ReportStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(ReportStyle::Technical),
            "narrative" => Ok(ReportStyle::Narrative),
            other => Err(format!(
                "unknown report style '{}' (expected 'technical' or 'narrative')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSummary {
    pub project: String,
    pub git_branch: String,
    pub contractors: Vec<String>,
    /// Sorted union of every contractor's environments.
    pub environments: Vec<String>,
    pub environments_by_contractor: EnvironmentMap,
    pub platforms: Vec<String>,
    pub stages: Vec<String>,
    pub total_commands: usize,
    pub executed_commands: Vec<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Collect the summary of a completed run.
pub fn summarize(
    contractors: &[String],
    environments: &EnvironmentMap,
    platforms: &[String],
    stages: &[String],
    record: &ExecutionRecord,
    probe: &dyn EnvironmentProbe,
) -> ReleaseSummary {
    let all_envs: BTreeSet<&String> = environments.values().flatten().collect();

    ReleaseSummary {
        project: probe.project_name(),
        git_branch: probe.vcs_reference(),
        contractors: contractors.to_vec(),
        environments: all_envs.into_iter().cloned().collect(),
        environments_by_contractor: environments.clone(),
        platforms: platforms.to_vec(),
        stages: stages.to_vec(),
        total_commands: record.len(),
        executed_commands: record.commands.clone(),
        started_at: record.started_at,
        finished_at: record.finished_at,
    }
}

pub fn render(summary: &ReleaseSummary, style: ReportStyle) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    out.push('\n');
    out.push_str(&format!("{}\n", rule));
    out.push_str("🚀 RELEASE SUMMARY\n");
    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("📁 Project      : {}\n", summary.project));
    out.push_str(&format!("🌿 Git Branch   : {}\n", summary.git_branch));
    out.push_str(&format!("📦 Contractors  : {}\n", summary.contractors.join(", ")));
    out.push_str(&format!("🧪 Environments : {}\n", summary.environments.join(", ")));
    out.push_str(&format!("📱 Platforms    : {}\n", summary.platforms.join(", ")));
    out.push_str(&format!("🔢 Commands     : {}\n", summary.total_commands));
    out.push_str(&format!("{}\n", rule));

    if style == ReportStyle::Narrative {
        out.push('\n');
        out.push_str(&format!("{}\n", narrative(summary)));
    }

    out.push('\n');
    out.push_str("📋 Executed commands:\n");
    out.push('\n');
    for (idx, command) in summary.executed_commands.iter().enumerate() {
        out.push_str(&format!("{:02}. {}\n", idx + 1, command));
    }

    out
}

fn narrative(summary: &ReleaseSummary) -> String {
    let mut text = format!(
        "Release of '{}' from branch '{}' ran {} {} (stages: {}) on {}.",
        summary.project,
        summary.git_branch,
        summary.total_commands,
        plural(summary.total_commands, "command", "commands"),
        summary.stages.join(" -> "),
        summary.platforms.join(" and "),
    );

    for contractor in &summary.contractors {
        let envs = summary
            .environments_by_contractor
            .get(contractor)
            .map(|e| e.join(", "))
            .unwrap_or_default();
        text.push_str(&format!("\n  • {} shipped to {}", contractor, envs));
    }

    if let Some(finished) = summary.finished_at {
        let seconds = (finished - summary.started_at).num_seconds().max(0);
        text.push_str(&format!("\nCompleted in {}s.", seconds));
    }

    text
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Write the summary as pretty JSON, atomically.
pub fn write_record(summary: &ReleaseSummary, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(summary).map_err(|e| {
        Error::internal_json(e.to_string(), Some("serialize release record".to_string()))
    })?;
    io::write_file_atomic(path, &content, &format!("write {}", path.display()))
}
