//! Interactive release flow: select, plan, confirm, execute, report.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::console::Console;
use crate::defaults::PilotConfig;
use crate::error::{Error, Result};
use crate::executor::{self, CommandRunner, ExecutionOutcome};
use crate::options::OptionSource;
use crate::plan::{EnvironmentMap, Plan, PlanBuilder, ReleaseSelection};
use crate::probe::EnvironmentProbe;
use crate::report::{self, ReleaseSummary, ReportStyle};
use crate::selector;

/// Per-run overrides layered on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
    pub report_style: Option<ReportStyle>,
    pub record_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum ReleaseOutcome {
    Cancelled,
    Released(Box<ReleaseSummary>),
}

/// Walk the operator through selection and run the resulting plan.
pub fn run<R: BufRead, W: Write>(
    config: &PilotConfig,
    options: &ReleaseOptions,
    console: &mut Console<R, W>,
    runner: &mut dyn CommandRunner,
    probe: &dyn EnvironmentProbe,
) -> Result<ReleaseOutcome> {
    let source = OptionSource::from_config(config);
    let builder = PlanBuilder::from_config(config);

    console.line("")?;
    console.line("=== 🧰 ReleasePilot | Release Orchestrator ===")?;

    let selection = select(&source, console)?;
    let plan = builder.build(&selection)?;

    preview(&plan, console)?;

    let record = match executor::execute(&plan, runner, console, &config.confirm_token)? {
        ExecutionOutcome::Cancelled => return Ok(ReleaseOutcome::Cancelled),
        ExecutionOutcome::Completed(record) => record,
    };

    let summary = report::summarize(
        &selection.contractors,
        &selection.environments,
        &selection.platforms,
        &plan.stages,
        &record,
        probe,
    );

    let style = options.report_style.unwrap_or(config.report.style);
    console.line(report::render(&summary, style).trim_end())?;

    let record_path = options
        .record_path
        .clone()
        .or_else(|| config.record_path.as_ref().map(PathBuf::from));
    if let Some(path) = record_path {
        match report::write_record(&summary, &path) {
            Ok(()) => console.line(format!("\n🗂 Release record written to {}", path.display()))?,
            Err(err) => console.line(format!(
                "\n⚠ Could not write release record to {}: {}",
                path.display(),
                err.details["error"].as_str().unwrap_or(&err.message)
            ))?,
        }
    }

    Ok(ReleaseOutcome::Released(Box::new(summary)))
}

/// Collect platforms, contractors, per-contractor environments and stages, in that order.
pub fn select<R: BufRead, W: Write>(
    source: &OptionSource,
    console: &mut Console<R, W>,
) -> Result<ReleaseSelection> {
    let platforms = selector::choose(console, "Platform", source.platforms())?;

    let available_contractors = source.contractors();
    if available_contractors.is_empty() {
        return Err(Error::options_empty(
            "contractor",
            source.base_path().display().to_string(),
        ));
    }
    let contractors = selector::choose(console, "Contractor", &available_contractors)?;

    let mut environments = EnvironmentMap::new();
    for contractor in &contractors {
        let available = source.environments(contractor);
        if available.is_empty() {
            return Err(Error::options_empty(
                "environment",
                source.environment_path(contractor).display().to_string(),
            ));
        }
        let chosen = selector::choose(console, &format!("Environment ({})", contractor), &available)?;
        environments.insert(contractor.clone(), chosen);
    }

    let stages = selector::choose(console, "Command", source.stages())?;

    Ok(ReleaseSelection {
        platforms,
        contractors,
        environments,
        stages,
    })
}

/// Print the plan exactly as it will run.
pub fn preview<R: BufRead, W: Write>(plan: &Plan, console: &mut Console<R, W>) -> Result<()> {
    console.line("")?;
    console.line("📌 Execution plan:")?;
    for command in plan.commands() {
        console.line(&command.command)?;
    }
    Ok(())
}

/// Keyword that selects every available option, mirroring the menu's "(all)" entry.
pub const ALL_KEYWORD: &str = "all";

/// Selections given up front (e.g. as CLI flags) instead of through menus.
#[derive(Debug, Clone, Default)]
pub struct SelectionRequest {
    pub platforms: Vec<String>,
    pub contractors: Vec<String>,
    /// `contractor=environment` pairs; `contractor=all` or a bare `all` expand.
    pub environments: Vec<String>,
    pub stages: Vec<String>,
}

/// Validate a request against the available options and expand `all`.
pub fn resolve_selection(
    source: &OptionSource,
    request: &SelectionRequest,
) -> Result<ReleaseSelection> {
    let platforms = resolve_values("platform", &request.platforms, source.platforms())?;

    let available_contractors = source.contractors();
    if available_contractors.is_empty() {
        return Err(Error::options_empty(
            "contractor",
            source.base_path().display().to_string(),
        ));
    }
    let contractors = resolve_values("contractor", &request.contractors, &available_contractors)?;

    let mut requested: Vec<(String, String)> = Vec::new();
    for entry in &request.environments {
        if entry == ALL_KEYWORD {
            for contractor in &contractors {
                requested.push((contractor.clone(), ALL_KEYWORD.to_string()));
            }
            continue;
        }

        let (contractor, environment) = entry.split_once('=').ok_or_else(|| {
            Error::validation_invalid_argument(
                "environment",
                format!("Expected CONTRACTOR=ENVIRONMENT, got '{}'", entry),
                Some(entry.clone()),
                None,
            )
        })?;

        if !contractors.iter().any(|c| c == contractor) {
            return Err(Error::validation_invalid_argument(
                "environment",
                format!("Contractor '{}' is not selected", contractor),
                Some(contractor.to_string()),
                Some(contractors.clone()),
            ));
        }
        requested.push((contractor.to_string(), environment.to_string()));
    }

    let mut environments = EnvironmentMap::new();
    for contractor in &contractors {
        let wanted: Vec<String> = requested
            .iter()
            .filter(|(c, _)| c == contractor)
            .map(|(_, e)| e.clone())
            .collect();

        let available = source.environments(contractor);
        if available.is_empty() {
            return Err(Error::options_empty(
                "environment",
                source.environment_path(contractor).display().to_string(),
            ));
        }

        let field = format!("environment ({})", contractor);
        environments.insert(contractor.clone(), resolve_values(&field, &wanted, &available)?);
    }

    let stages = resolve_values("stage", &request.stages, source.stages())?;

    Ok(ReleaseSelection {
        platforms,
        contractors,
        environments,
        stages,
    })
}

/// Requested values in request order, de-duplicated; `all` yields every available value.
fn resolve_values(field: &str, requested: &[String], available: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Err(Error::validation_invalid_argument(
            field,
            format!("Select at least one {}", field),
            None,
            Some(available.to_vec()),
        ));
    }

    if requested.iter().any(|r| r == ALL_KEYWORD) {
        return Ok(available.to_vec());
    }

    let mut resolved: Vec<String> = Vec::new();
    for value in requested {
        if !available.contains(value) {
            return Err(Error::validation_invalid_argument(
                field,
                format!("Unknown {} '{}'", field, value),
                Some(value.clone()),
                Some(available.to_vec()),
            ));
        }
        if !resolved.contains(value) {
            resolved.push(value.clone());
        }
    }

    Ok(resolved)
}
