//! Sequential plan execution with operator checkpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::console::Console;
use crate::error::{CommandFailedDetails, Error, Result};
use crate::plan::{Plan, PlannedCommand};
use crate::utils::command;

/// Runs a single planned command and reports its exit code.
pub trait CommandRunner {
    fn run(&mut self, command: &PlannedCommand) -> Result<i32>;
}

/// Runs commands through the platform shell with the terminal attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, planned: &PlannedCommand) -> Result<i32> {
        command::run_shell_interactive(&planned.command)
    }
}

/// Commands that completed successfully, in the order they ran.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub commands: Vec<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExecutionRecord {
    fn start() -> Self {
        Self {
            commands: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    /// The operator declined the confirmation gate. Nothing ran.
    Cancelled,
    Completed(ExecutionRecord),
}

/// Ask for confirmation. Only `token` (trimmed, case-insensitive) confirms.
pub fn confirm<R: BufRead, W: Write>(console: &mut Console<R, W>, token: &str) -> Result<bool> {
    let answer = console.prompt(&format!("\nConfirm execution? ({}/N): ", token))?;
    Ok(answer.is_some_and(|a| a.to_lowercase() == token.trim().to_lowercase()))
}

/// Pause until the operator acknowledges.
pub fn checkpoint<R: BufRead, W: Write>(console: &mut Console<R, W>, reason: &str) -> Result<()> {
    console.line("")?;
    console.line(format!("⏸ Execution paused: {}", reason))?;
    console
        .prompt("Press ENTER to continue...")?
        .ok_or_else(|| Error::input_closed(format!("checkpoint: {}", reason)))?;
    Ok(())
}

/// Confirm, then run the plan in order.
///
/// Stops at the first non-zero exit with a `command.failed` error that carries
/// the exit code and the commands completed so far.
pub fn execute<R: BufRead, W: Write>(
    plan: &Plan,
    runner: &mut dyn CommandRunner,
    console: &mut Console<R, W>,
    confirm_token: &str,
) -> Result<ExecutionOutcome> {
    if !confirm(console, confirm_token)? {
        console.line("⏹ Execution cancelled.")?;
        return Ok(ExecutionOutcome::Cancelled);
    }

    let mut record = ExecutionRecord::start();

    for (contractor_idx, group) in plan.groups.iter().enumerate() {
        for (env_idx, env_group) in group.environments.iter().enumerate() {
            for planned in &env_group.commands {
                run_one(planned, runner, console, &record)?;
                record.commands.push(planned.command.clone());
            }

            if env_idx + 1 < group.environments.len() {
                checkpoint(
                    console,
                    &format!(
                        "Environment '{}' completed for '{}'",
                        env_group.environment, group.contractor
                    ),
                )?;
            }
        }

        if contractor_idx + 1 < plan.groups.len() {
            checkpoint(
                console,
                &format!("Contractor '{}' completed", group.contractor),
            )?;
        }
    }

    record.finished_at = Some(Utc::now());
    Ok(ExecutionOutcome::Completed(record))
}

fn run_one<R: BufRead, W: Write>(
    planned: &PlannedCommand,
    runner: &mut dyn CommandRunner,
    console: &mut Console<R, W>,
    record: &ExecutionRecord,
) -> Result<()> {
    console.line("")?;
    console.line(format!("🚀 Running: {}", planned.command))?;
    log_status!("run", "{} ({}/{})", planned.command, planned.contractor, planned.environment);

    let exit_code = runner.run(planned)?;
    if exit_code == 0 {
        return Ok(());
    }

    console.line("")?;
    console.line(format!("❌ Command failed (exit code {})", exit_code))?;

    Err(Error::command_failed(CommandFailedDetails {
        command: planned.command.clone(),
        exit_code,
        executed: record.commands.clone(),
    }))
}
