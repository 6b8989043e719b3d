//! Read-only lookups about the surrounding project.
//!
//! Lookups never fail: anything unavailable becomes [`UNKNOWN`].

use std::env;

use crate::utils::command;

pub const UNKNOWN: &str = "unknown";

pub trait EnvironmentProbe {
    fn project_name(&self) -> String;
    fn vcs_reference(&self) -> String;
}

/// Probe backed by the process working directory and the `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl EnvironmentProbe for SystemProbe {
    fn project_name(&self) -> String {
        project_name()
    }

    fn vcs_reference(&self) -> String {
        git_branch()
    }
}

/// Project name inferred from the current working directory.
pub fn project_name() -> String {
    env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Current git branch, or `unknown` outside a repository or without git.
pub fn git_branch() -> String {
    command::run_optional("git", &["rev-parse", "--abbrev-ref", "HEAD"])
        .unwrap_or_else(|| UNKNOWN.to_string())
}
