use clap::Args;
use release_pilot::defaults::LoadedConfig;

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {}

pub fn run(_args: ConfigArgs, global: &GlobalArgs) -> CmdResult<LoadedConfig> {
    Ok((global.load_config()?, 0))
}
