//! Tool and file verification.

use std::path::Path;
use std::process::Command;

use super::probe::Probe;
use crate::error::MuxResult;

/// Checks run before operations that depend on the tool or an existing file.
pub trait Verify: Probe {
    /// Whether the muxing executable can be run.
    fn is_tool_available(&self) -> bool;

    /// Whether the tool recognizes `path` as a container format.
    fn is_recognized(&self, path: &Path) -> MuxResult<bool> {
        Ok(self.identify(path)?.recognized)
    }

    /// Whether the tool can read tracks from `path`.
    fn is_supported(&self, path: &Path) -> MuxResult<bool> {
        Ok(self.identify(path)?.supported)
    }

    /// Whether `path` is a Matroska file.
    fn is_matroska(&self, path: &Path) -> MuxResult<bool> {
        Ok(self.identify(path)?.is_matroska())
    }
}

/// Run `<executable> -V` and check that the version banner starts with `banner`.
///
/// Works for every MKVToolNix program (`mkvmerge`, `mkvextract`, ...).
pub fn verify_tool(executable: &Path, banner: &str) -> bool {
    let output = match Command::new(executable).arg("-V").output() {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("Failed to run {} -V: {}", executable.display(), e);
            return false;
        }
    };

    if !output.status.success() {
        return false;
    }

    String::from_utf8_lossy(&output.stdout).starts_with(banner)
}
