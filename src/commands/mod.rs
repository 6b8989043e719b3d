use std::path::PathBuf;

use release_pilot::defaults::{self, LoadedConfig};

pub type CmdResult<T> = release_pilot::Result<(T, i32)>;

/// Flags accepted by every subcommand.
pub(crate) struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub base_path: Option<String>,
}

impl GlobalArgs {
    /// Load configuration and apply global overrides.
    pub fn load_config(&self) -> release_pilot::Result<LoadedConfig> {
        let cwd = std::env::current_dir().map_err(|e| {
            release_pilot::Error::internal_io(e.to_string(), Some("read cwd".to_string()))
        })?;

        let mut loaded = defaults::load_config(self.config.as_deref(), &cwd)?;
        if let Some(base_path) = &self.base_path {
            loaded.config.base_path = base_path.clone();
            loaded.config.validate()?;
        }
        Ok(loaded)
    }
}

pub mod config;
pub mod options;
pub mod plan;
pub mod run;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (release_pilot::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Plan(args) => dispatch!(args, global, plan),
        crate::Commands::Options(args) => dispatch!(args, global, options),
        crate::Commands::Config(args) => dispatch!(args, global, config),

        // Interactive runs use raw console output
        crate::Commands::Run(_) => {
            let err = release_pilot::Error::validation_invalid_argument(
                "output_mode",
                "Run command uses raw output mode",
                None,
                None,
            );
            crate::output::map_cmd_result_to_json::<serde_json::Value>(Err(err))
        }
    }
}
