//! Path helpers for user-supplied file references.

use std::path::{Path, PathBuf};

use crate::error::{MuxError, MuxResult};

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without a leading tilde, and `~user` forms, are returned unchanged.
pub fn expand_user(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Expand `path` and require that it names an existing regular file.
pub fn existing_file(path: impl AsRef<Path>) -> MuxResult<PathBuf> {
    let path = expand_user(path);
    if !path.is_file() {
        return Err(MuxError::FileNotFound(path));
    }
    Ok(path)
}

/// Render a path as a command token.
pub fn token(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
