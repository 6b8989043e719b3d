//! CLI response formatting and output.
//!
//! Provides the JSON envelope, raw-mode error printing, and exit code mapping.

use release_pilot::error::Hint;
use release_pilot::{Error, ErrorCode, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
                retryable: err.retryable,
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

/// Print an error from an interactive run to stderr, with hints.
///
/// `command.failed` is skipped: the executor already reported it on the console.
pub fn print_raw_error(err: &Error) {
    if err.code == ErrorCode::CommandFailed {
        return;
    }

    eprintln!("Error [{}]: {}", err.code.as_str(), err.message);
    for hint in &err.hints {
        eprintln!("  hint: {}", hint.message);
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(&err);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(err: &Error) -> i32 {
    match err.code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::OptionsEmpty => 4,

        // A failed build exits with the build's own code; signal deaths still fail.
        ErrorCode::CommandFailed => match err.command_exit_code() {
            Some(code) if code > 0 => code,
            _ => 1,
        },

        ErrorCode::InputClosed
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use release_pilot::error::CommandFailedDetails;

    fn failed(exit_code: i32) -> Error {
        Error::command_failed(CommandFailedDetails {
            command: "yarn ios:kompa:beta:build".to_string(),
            exit_code,
            executed: Vec::new(),
        })
    }

    #[test]
    fn command_failure_maps_to_its_own_exit_code() {
        assert_eq!(exit_code_for_error(&failed(3)), 3);
        assert_eq!(exit_code_for_error(&failed(127)), 127);
    }

    #[test]
    fn signal_death_maps_to_one() {
        assert_eq!(exit_code_for_error(&failed(-1)), 1);
    }

    #[test]
    fn validation_errors_map_to_two() {
        let err = Error::validation_invalid_argument("platform", "bad", None, None);
        assert_eq!(exit_code_for_error(&err), 2);
    }

    #[test]
    fn error_envelope_serializes_code_and_hints() {
        let err = Error::options_empty("contractor", "./contractor");
        let json = CliResponse::<()>::from_error(&err).to_json().unwrap();

        assert!(json.contains("\"success\": false"));
        assert!(json.contains("\"code\": \"options.empty\""));
        assert!(json.contains("hints"));
    }

    #[test]
    fn map_cmd_result_keeps_exit_code() {
        let (value, code) = map_cmd_result_to_json(Ok((serde_json::json!({"ok": true}), 0)));
        assert_eq!(code, 0);
        assert_eq!(value.unwrap()["ok"], true);
    }
}
