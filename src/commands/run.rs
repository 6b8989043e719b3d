use clap::Args;
use std::path::PathBuf;

use release_pilot::console::Console;
use release_pilot::executor::ShellRunner;
use release_pilot::probe::SystemProbe;
use release_pilot::release::{self, ReleaseOptions, ReleaseOutcome};
use release_pilot::report::ReportStyle;

use crate::commands::GlobalArgs;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Summary style: technical or narrative
    #[arg(long, value_name = "STYLE")]
    pub report: Option<ReportStyle>,

    /// Write the JSON release record to this path after a successful run
    #[arg(long, value_name = "PATH")]
    pub record: Option<PathBuf>,
}

/// Run the interactive release and return the process exit code.
pub fn run(args: RunArgs, global: &GlobalArgs) -> i32 {
    match run_release(args, global) {
        Ok(_) => 0,
        Err(err) => {
            crate::output::print_raw_error(&err);
            crate::output::exit_code_for_error(&err)
        }
    }
}

fn run_release(args: RunArgs, global: &GlobalArgs) -> release_pilot::Result<ReleaseOutcome> {
    let loaded = global.load_config()?;
    let options = ReleaseOptions {
        report_style: args.report,
        record_path: args.record,
    };

    let mut console = Console::stdio();
    let mut runner = ShellRunner;

    release::run(&loaded.config, &options, &mut console, &mut runner, &SystemProbe)
}
