use std::fs;
use std::io::Cursor;
use std::path::Path;

use release_pilot::console::Console;
use release_pilot::defaults::PilotConfig;
use release_pilot::executor::CommandRunner;
use release_pilot::options::OptionSource;
use release_pilot::plan::{PlanBuilder, PlannedCommand};
use release_pilot::probe::EnvironmentProbe;
use release_pilot::release::{self, ReleaseOptions, ReleaseOutcome, SelectionRequest};
use release_pilot::report::ReportStyle;

struct RecordingRunner {
    ran: Vec<String>,
    fail_on: Option<(&'static str, i32)>,
}

impl RecordingRunner {
    fn new() -> Self {
        Self {
            ran: Vec::new(),
            fail_on: None,
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &PlannedCommand) -> release_pilot::Result<i32> {
        self.ran.push(command.command.clone());
        match self.fail_on {
            Some((cmd, code)) if cmd == command.command => Ok(code),
            _ => Ok(0),
        }
    }
}

struct FixedProbe;

impl EnvironmentProbe for FixedProbe {
    fn project_name(&self) -> String {
        "brand-app".to_string()
    }

    fn vcs_reference(&self) -> String {
        "release/2.3".to_string()
    }
}

fn contractor_layout(root: &Path) {
    for path in ["kompa/beta", "kompa/production", "quickup/sandbox"] {
        fs::create_dir_all(root.join(path)).unwrap();
    }
    fs::write(root.join("README.md"), "not a contractor").unwrap();
}

fn config_for(root: &Path) -> PilotConfig {
    PilotConfig {
        base_path: root.display().to_string(),
        ..PilotConfig::default()
    }
}

fn run_flow(
    config: &PilotConfig,
    options: &ReleaseOptions,
    input: &str,
    runner: &mut RecordingRunner,
) -> (release_pilot::Result<ReleaseOutcome>, String) {
    let mut console = Console::new(Cursor::new(input.to_string()), Vec::new());
    let result = release::run(config, options, &mut console, runner, &FixedProbe);
    (result, String::from_utf8(console.into_output()).unwrap())
}

const EXPECTED_PLAN: [&str; 8] = [
    "yarn android:kompa:beta:add",
    "yarn android:kompa:beta:build",
    "yarn ios:kompa:beta:add",
    "yarn ios:kompa:beta:build",
    "yarn android:quickup:sandbox:add",
    "yarn android:quickup:sandbox:build",
    "yarn ios:quickup:sandbox:add",
    "yarn ios:quickup:sandbox:build",
];

// platform=all, contractor=all, kompa=beta, quickup=sandbox, stages=all, confirm, one checkpoint
const FULL_RUN_INPUT: &str = "3\n3\n1\n1\n3\ny\n\n";

#[test]
fn full_release_runs_plan_in_order_and_reports() {
    let root = tempfile::tempdir().unwrap();
    contractor_layout(root.path());
    let mut runner = RecordingRunner::new();

    let (result, output) = run_flow(
        &config_for(root.path()),
        &ReleaseOptions::default(),
        FULL_RUN_INPUT,
        &mut runner,
    );

    let summary = match result.unwrap() {
        ReleaseOutcome::Released(summary) => summary,
        ReleaseOutcome::Cancelled => panic!("release was cancelled"),
    };

    assert_eq!(runner.ran, EXPECTED_PLAN);
    assert_eq!(summary.executed_commands, EXPECTED_PLAN);
    assert_eq!(summary.total_commands, 8);
    assert_eq!(summary.environments, vec!["beta", "sandbox"]);
    assert_eq!(summary.git_branch, "release/2.3");

    let preview = output.find("📌 Execution plan:").unwrap();
    let first_run = output.find("🚀 Running:").unwrap();
    assert!(preview < first_run);
    for command in EXPECTED_PLAN {
        assert!(output[preview..first_run].contains(command));
    }

    assert_eq!(output.matches("⏸ Execution paused").count(), 1);
    assert!(output.contains("⏸ Execution paused: Contractor 'kompa' completed"));
    assert!(output.contains("📁 Project      : brand-app"));
    assert!(output.contains("08. yarn ios:quickup:sandbox:build"));
}

#[test]
fn single_stage_selection_runs_only_that_stage() {
    let root = tempfile::tempdir().unwrap();
    contractor_layout(root.path());
    let config = PilotConfig {
        stages: vec!["add".to_string(), "build".to_string()],
        ..config_for(root.path())
    };
    let mut runner = RecordingRunner::new();

    // ios, kompa, beta, only "build" stage
    let (result, _) = run_flow(&config, &ReleaseOptions::default(), "2\n1\n1\n2\ny\n", &mut runner);

    assert!(result.is_ok());
    assert_eq!(runner.ran, vec!["yarn ios:kompa:beta:build"]);
}

#[test]
fn requested_stages_follow_configured_order() {
    let root = tempfile::tempdir().unwrap();
    contractor_layout(root.path());
    let config = PilotConfig {
        stages: vec!["add".to_string(), "build".to_string(), "upload".to_string()],
        ..config_for(root.path())
    };
    let source = OptionSource::from_config(&config);
    let request = SelectionRequest {
        platforms: vec!["ios".to_string()],
        contractors: vec!["kompa".to_string()],
        environments: vec!["kompa=beta".to_string()],
        stages: vec!["upload".to_string(), "add".to_string()],
    };

    let selection = release::resolve_selection(&source, &request).unwrap();
    let plan = PlanBuilder::from_config(&config).build(&selection).unwrap();

    assert_eq!(plan.stages, vec!["add", "upload"]);
    assert_eq!(
        plan.command_lines(),
        vec!["yarn ios:kompa:beta:add", "yarn ios:kompa:beta:upload"]
    );
}

#[test]
fn declining_confirmation_runs_nothing() {
    let root = tempfile::tempdir().unwrap();
    contractor_layout(root.path());
    let mut runner = RecordingRunner::new();

    let (result, output) = run_flow(
        &config_for(root.path()),
        &ReleaseOptions::default(),
        "3\n3\n1\n1\n3\nno\n",
        &mut runner,
    );

    assert!(matches!(result.unwrap(), ReleaseOutcome::Cancelled));
    assert!(runner.ran.is_empty());
    assert!(output.contains("⏹ Execution cancelled."));
    assert!(!output.contains("RELEASE SUMMARY"));
}

#[test]
fn failing_command_halts_with_its_exit_code() {
    let root = tempfile::tempdir().unwrap();
    contractor_layout(root.path());
    let mut runner = RecordingRunner {
        ran: Vec::new(),
        fail_on: Some(("yarn android:quickup:sandbox:build", 9)),
    };

    let (result, output) = run_flow(
        &config_for(root.path()),
        &ReleaseOptions::default(),
        FULL_RUN_INPUT,
        &mut runner,
    );

    let err = result.unwrap_err();
    assert_eq!(err.command_exit_code(), Some(9));
    assert_eq!(runner.ran, EXPECTED_PLAN[..6]);

    let executed: Vec<String> = serde_json::from_value(err.details["executed"].clone()).unwrap();
    assert_eq!(executed, EXPECTED_PLAN[..5]);
    assert!(output.contains("❌ Command failed (exit code 9)"));
    assert!(!output.contains("RELEASE SUMMARY"));
}

#[test]
fn invalid_menu_input_is_reprompted() {
    let root = tempfile::tempdir().unwrap();
    contractor_layout(root.path());
    let mut runner = RecordingRunner::new();

    let (result, output) = run_flow(
        &config_for(root.path()),
        &ReleaseOptions::default(),
        "android\n0\n1\n9\n1\n1\n1\ny\n",
        &mut runner,
    );

    assert!(result.is_ok());
    assert_eq!(output.matches("⚠ Invalid option").count(), 3);
    assert_eq!(runner.ran, vec!["yarn android:kompa:beta:add"]);
}

#[test]
fn missing_base_path_fails_before_any_command() {
    let root = tempfile::tempdir().unwrap();
    let config = config_for(&root.path().join("missing"));
    let mut runner = RecordingRunner::new();

    let (result, _) = run_flow(&config, &ReleaseOptions::default(), "1\n", &mut runner);

    let err = result.unwrap_err();
    assert_eq!(err.code.as_str(), "options.empty");
    assert!(runner.ran.is_empty());
}

#[test]
fn narrative_report_and_record_file() {
    let root = tempfile::tempdir().unwrap();
    contractor_layout(root.path());
    let record = root.path().join("release-record.json");
    let options = ReleaseOptions {
        report_style: Some(ReportStyle::Narrative),
        record_path: Some(record.clone()),
    };
    let mut runner = RecordingRunner::new();

    let (result, output) = run_flow(&config_for(root.path()), &options, FULL_RUN_INPUT, &mut runner);

    assert!(result.is_ok());
    assert!(output.contains("Release of 'brand-app' from branch 'release/2.3' ran 8 commands"));
    assert!(output.contains("Release record written to"));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&record).unwrap()).unwrap();
    assert_eq!(value["project"], "brand-app");
    assert_eq!(value["contractors"], serde_json::json!(["kompa", "quickup"]));
    assert_eq!(value["executedCommands"].as_array().unwrap().len(), 8);
}
