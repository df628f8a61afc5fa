//! Non-stream files (fonts, cover art) attached to the output.

use std::path::{Path, PathBuf};

use crate::error::MuxResult;
use crate::paths::existing_file;

/// MIME types by lower-case file extension.
const MIME_TYPES: &[(&str, &str)] = &[
    // Fonts
    ("ttf", "font/ttf"),
    ("ttc", "font/collection"),
    ("otf", "font/otf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    // Images
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    // Text
    ("txt", "text/plain"),
    ("nfo", "text/plain"),
    ("xml", "application/xml"),
    ("json", "application/json"),
    ("html", "text/html"),
    ("pdf", "application/pdf"),
    // Archives
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("7z", "application/x-7z-compressed"),
];

/// Guess the MIME type of a file from its extension.
pub fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// A file attached to the output container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    file_path: PathBuf,
    mime_type: Option<String>,

    /// Name stored in the container; mkvmerge uses the file name when unset.
    pub name: Option<String>,
    pub description: Option<String>,
    /// Attach to the first split part only instead of every part.
    pub attach_once: bool,
}

impl Attachment {
    /// Create an attachment for an existing file.
    pub fn new(path: impl AsRef<Path>) -> MuxResult<Self> {
        let mut attachment = Self {
            file_path: PathBuf::new(),
            mime_type: None,
            name: None,
            description: None,
            attach_once: false,
        };
        attachment.set_file_path(path)?;
        Ok(attachment)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_attach_once(mut self, attach_once: bool) -> Self {
        self.attach_once = attach_once;
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Point the attachment at another file.
    ///
    /// Re-checks existence, re-derives the MIME type and clears the name,
    /// which belonged to the previous file.
    pub fn set_file_path(&mut self, path: impl AsRef<Path>) -> MuxResult<()> {
        let path = existing_file(path)?;
        self.mime_type = guess_mime_type(&path).map(|m| m.to_string());
        self.name = None;
        self.file_path = path;
        Ok(())
    }
}
