//! Error types shared by every part of the crate.

use std::path::PathBuf;

/// Errors produced while building or running an mkvmerge invocation.
///
/// Validation variants are raised eagerly by setters and constructors, so a
/// fully built [`ContainerFile`](crate::container::ContainerFile) always
/// assembles a command without failing. Collaborator variants (`ProbeFailed`,
/// `Json`, `Io`, `ToolUnavailable`, `MuxFailed`) come from running the
/// external tool.
#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    /// Malformed or out-of-policy input.
    #[error("Invalid value: {0}")]
    Validation(String),

    /// Index outside the current bounds of a list or probed track set.
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Language tag not recognized by the lookup.
    #[error("Not a recognized language code: '{0}'")]
    InvalidLanguage(String),

    /// Referenced file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The tool can open the file but cannot mux it.
    #[error("File is not supported by mkvmerge: {0}")]
    UnsupportedFile(PathBuf),

    /// The tool does not recognize the file as a container.
    #[error("File is not a recognized container: {0}")]
    NotRecognized(PathBuf),

    /// Linking target is not a Matroska file.
    #[error("File is not a Matroska file: {0}")]
    NotMatroska(PathBuf),

    /// The mkvmerge executable cannot be located or executed.
    #[error("mkvmerge is not available at '{0}', install it or change the mkvmerge path")]
    ToolUnavailable(PathBuf),

    /// Identifying a file failed at the process level.
    #[error("Failed to probe '{path}': {message}")]
    ProbeFailed { path: PathBuf, message: String },

    /// mkvmerge exited unsuccessfully while muxing.
    #[error("mkvmerge failed with exit code {}: {stderr}", exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    MuxFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Probe output was not valid JSON.
    #[error("Failed to parse mkvmerge output: {0}")]
    Json(#[from] serde_json::Error),

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mux operations.
pub type MuxResult<T> = Result<T, MuxError>;

impl MuxError {
    /// Create a validation error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an index error.
    pub fn index(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Whether this error was raised by input validation rather than by
    /// the external tool.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MuxError::Validation(_)
                | MuxError::IndexOutOfRange { .. }
                | MuxError::InvalidLanguage(_)
                | MuxError::FileNotFound(_)
        )
    }
}
