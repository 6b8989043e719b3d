//! Process execution primitives with consistent error handling.

use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Run a command, returning trimmed stdout or `None` on any failure.
///
/// Useful when command failure is expected/acceptable (e.g., probing git outside a repo).
pub fn run_optional(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program)
        .args(args)
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        None
    } else {
        Some(stdout)
    }
}

/// Run a command line through the platform shell with inherited stdio.
///
/// Returns the exit code. A process killed by a signal reports `-1`.
/// Failing to spawn the shell at all is an IO error.
pub fn run_shell_interactive(command: &str) -> Result<i32> {
    #[cfg(windows)]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    };

    #[cfg(not(windows))]
    let mut cmd = {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    };

    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("spawn '{}'", command))))?;

    Ok(status.code().unwrap_or(-1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_optional_returns_stdout() {
        assert_eq!(run_optional("echo", &["hello"]), Some("hello".to_string()));
    }

    #[test]
    fn run_optional_returns_none_for_missing_program() {
        assert!(run_optional("nonexistent_command_xyz", &[]).is_none());
    }

    #[test]
    fn run_optional_returns_none_on_failure() {
        assert!(run_optional("false", &[]).is_none());
    }

    #[cfg(not(windows))]
    #[test]
    fn run_shell_interactive_reports_exit_code() {
        assert_eq!(run_shell_interactive("exit 0").unwrap(), 0);
        assert_eq!(run_shell_interactive("exit 7").unwrap(), 7);
    }
}
