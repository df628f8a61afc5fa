//! Process execution for the mux step.

use std::process::{Command, Stdio};

use crate::error::{MuxError, MuxResult};

/// Output of a finished external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    /// Captured stdout (empty when output was not captured).
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
}

/// Runs an argument vector as a child process and waits for it.
pub trait CommandRunner {
    /// Run `argv` (`argv[0]` is the executable).
    ///
    /// With `capture_output` the child's stdout is collected, otherwise it is
    /// discarded. Stderr is always collected for error reporting.
    fn run(&self, argv: &[String], capture_output: bool) -> MuxResult<RunOutput>;
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], capture_output: bool) -> MuxResult<RunOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| MuxError::invalid("empty command"))?;

        let mut command = Command::new(program);
        command.args(args);

        if capture_output {
            let output = command.stdout(Stdio::piped()).stderr(Stdio::piped()).output()?;
            Ok(RunOutput {
                exit_code: output.status.code(),
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        } else {
            let output = command.stdout(Stdio::null()).stderr(Stdio::piped()).output()?;
            Ok(RunOutput {
                exit_code: output.status.code(),
                success: output.status.success(),
                stdout: String::new(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }
}
