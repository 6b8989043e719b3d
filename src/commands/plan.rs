use clap::Args;
use serde::Serialize;

use release_pilot::options::OptionSource;
use release_pilot::plan::{Plan, PlanBuilder, ReleaseSelection};
use release_pilot::release::{self, SelectionRequest};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Platform to build (repeatable, or `all`)
    #[arg(long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<String>,

    /// Contractor to build (repeatable, or `all`)
    #[arg(long = "contractor", value_name = "CONTRACTOR")]
    pub contractors: Vec<String>,

    /// Environment as CONTRACTOR=ENV or CONTRACTOR=all (repeatable), or `all`
    #[arg(long = "env", value_name = "CONTRACTOR=ENV")]
    pub environments: Vec<String>,

    /// Pipeline stage (repeatable, or `all`); always runs in pipeline order
    #[arg(long = "stage", value_name = "STAGE")]
    pub stages: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub selection: ReleaseSelection,
    pub total: usize,
    pub commands: Vec<String>,
    pub plan: Plan,
}

pub fn run(args: PlanArgs, global: &GlobalArgs) -> CmdResult<PlanOutput> {
    let loaded = global.load_config()?;
    let source = OptionSource::from_config(&loaded.config);

    let request = SelectionRequest {
        platforms: args.platforms,
        contractors: args.contractors,
        environments: args.environments,
        stages: args.stages,
    };
    let selection = release::resolve_selection(&source, &request)?;
    let plan = PlanBuilder::from_config(&loaded.config).build(&selection)?;

    Ok((
        PlanOutput {
            selection,
            total: plan.len(),
            commands: plan.command_lines(),
            plan,
        },
        0,
    ))
}
