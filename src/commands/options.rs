use clap::Args;
use release_pilot::options::{OptionCatalog, OptionSource};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args, Debug, Default)]
pub struct OptionsArgs {}

pub fn run(_args: OptionsArgs, global: &GlobalArgs) -> CmdResult<OptionCatalog> {
    let loaded = global.load_config()?;
    let catalog = OptionSource::from_config(&loaded.config).catalog();
    Ok((catalog, 0))
}
