//! The real MKVToolNix-backed toolchain.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use super::probe::{parse_identification, Probe, ProbeResult};
use super::runner::{CommandRunner, RunOutput, SystemRunner};
use super::verify::{verify_tool, Verify};
use crate::error::{MuxError, MuxResult};
use crate::paths::expand_user;

/// Default executable name, resolved on `PATH`.
pub const DEFAULT_MKVMERGE: &str = "mkvmerge";

/// Everything a [`ContainerFile`](crate::container::ContainerFile) needs
/// from the outside world: identification, verification and process execution.
pub trait Toolchain: Verify + CommandRunner + fmt::Debug + Send + Sync {
    /// The executable placed at the head of assembled commands.
    fn executable(&self) -> &Path;
}

/// mkvmerge at a configurable location.
#[derive(Debug, Clone)]
pub struct Mkvmerge {
    path: PathBuf,
    runner: SystemRunner,
}

impl Mkvmerge {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_user(path),
            runner: SystemRunner,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the configured path to an executable file.
    pub fn resolve(&self) -> MuxResult<PathBuf> {
        which::which(&self.path).map_err(|e| {
            tracing::debug!("Cannot resolve {}: {}", self.path.display(), e);
            MuxError::ToolUnavailable(self.path.clone())
        })
    }
}

impl Default for Mkvmerge {
    fn default() -> Self {
        Self::new(DEFAULT_MKVMERGE)
    }
}

impl Probe for Mkvmerge {
    fn identify(&self, path: &Path) -> MuxResult<ProbeResult> {
        if !path.exists() {
            return Err(MuxError::FileNotFound(path.to_path_buf()));
        }
        let executable = self.resolve()?;

        tracing::debug!("Probing file: {}", path.display());

        let output = Command::new(&executable)
            .arg("-J")
            .arg(path)
            .output()
            .map_err(|e| MuxError::ProbeFailed {
                path: path.to_path_buf(),
                message: format!("failed to run {}: {}", executable.display(), e),
            })?;

        // mkvmerge exits with 2 for unrecognized files but still prints a
        // container record with `recognized: false`.
        let json: Value = match serde_json::from_slice(&output.stdout) {
            Ok(json) => json,
            Err(e) if output.status.success() => return Err(e.into()),
            Err(_) => {
                return Err(MuxError::ProbeFailed {
                    path: path.to_path_buf(),
                    message: format!(
                        "exit code {}: {}",
                        output.status.code().unwrap_or(-1),
                        String::from_utf8_lossy(&output.stderr).trim()
                    ),
                })
            }
        };

        if !output.status.success() {
            tracing::debug!(
                "mkvmerge -J exited with {:?} for {}",
                output.status.code(),
                path.display()
            );
        }

        parse_identification(&json, path)
    }
}

impl Verify for Mkvmerge {
    fn is_tool_available(&self) -> bool {
        match self.resolve() {
            Ok(executable) => verify_tool(&executable, "mkvmerge"),
            Err(_) => false,
        }
    }
}

impl CommandRunner for Mkvmerge {
    fn run(&self, argv: &[String], capture_output: bool) -> MuxResult<RunOutput> {
        self.runner.run(argv, capture_output)
    }
}

impl Toolchain for Mkvmerge {
    fn executable(&self) -> &Path {
        &self.path
    }
}
