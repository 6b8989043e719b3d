use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{config, options, plan, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "release-pilot")]
#[command(version = VERSION)]
#[command(about = "Interactive release orchestrator for white-label application builds")]
struct Cli {
    /// Path to a release-pilot.json config (default: ./release-pilot.json if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the contractor base directory
    #[arg(long, global = true, value_name = "DIR")]
    base_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Select targets interactively and run the release (default)
    Run(run::RunArgs),
    /// Preview the command plan for explicit selections
    Plan(plan::PlanArgs),
    /// List platforms, stages, contractors and environments
    Options(options::OptionsArgs),
    /// Show the effective configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        config: cli.config,
        base_path: cli.base_path,
    };

    let command = cli.command.unwrap_or(Commands::Run(run::RunArgs::default()));

    if let Commands::Run(args) = command {
        let exit_code = run::run(args, &global);
        return std::process::ExitCode::from(exit_code_to_u8(exit_code));
    }

    let (json_result, exit_code) = commands::run_json(command, &global);
    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
