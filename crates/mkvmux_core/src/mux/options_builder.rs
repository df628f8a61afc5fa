//! mkvmerge command options builder.
//!
//! mkvmerge binds track options to the next file argument on the command
//! line, so every track is written as its own option block followed by its
//! source path, even when several tracks come from the same file.

use std::path::Path;

use crate::container::ContainerFile;
use crate::models::{Attachment, Track, TrackType};
use crate::paths::token;

/// Builder for mkvmerge command-line tokens.
pub struct MkvmergeOptionsBuilder<'a> {
    file: &'a ContainerFile,
    output_path: &'a Path,
}

impl<'a> MkvmergeOptionsBuilder<'a> {
    pub fn new(file: &'a ContainerFile, output_path: &'a Path) -> Self {
        Self { file, output_path }
    }

    /// Build the complete command, executable first.
    pub fn build(&self) -> Vec<String> {
        let mut tokens = vec![
            token(self.file.tools().executable()),
            "-o".to_string(),
            token(self.output_path),
        ];

        if let Some(title) = &self.file.title {
            tokens.push("--title".to_string());
            tokens.push(title.clone());
        }

        for track in self.file.tracks() {
            add_track_options(&mut tokens, track);
        }

        for attachment in self.file.attachments() {
            add_attachment_options(&mut tokens, attachment);
        }

        self.add_file_options(&mut tokens);
        tokens.extend(self.file.split_directive().tokens());

        tokens
    }

    fn add_file_options(&self, tokens: &mut Vec<String>) {
        if let Some(language) = self.file.chapter_language() {
            tokens.push("--chapter-language".to_string());
            tokens.push(language.to_string());
        }
        if let Some(chapters) = self.file.chapters_file() {
            tokens.push("--chapters".to_string());
            tokens.push(token(chapters));
        }
        if let Some(tags) = self.file.global_tags_file() {
            tokens.push("--global-tags".to_string());
            tokens.push(token(tags));
        }

        // The `=` form links to a file by name rather than by segment UID.
        if let Some(previous) = self.file.linked_previous() {
            tokens.push("--link-to-previous".to_string());
            tokens.push(format!("={}", token(previous)));
        }
        if let Some(next) = self.file.linked_next() {
            tokens.push("--link-to-next".to_string());
            tokens.push(format!("={}", token(next)));
        }
    }
}

/// Options for one track, terminated by its source path.
fn add_track_options(tokens: &mut Vec<String>, track: &Track) {
    let id = track.track_id();

    if let Some(name) = &track.name {
        tokens.push("--track-name".to_string());
        tokens.push(format!("{}:{}", id, name));
    }
    if let Some(language) = track.effective_language() {
        tokens.push("--language".to_string());
        tokens.push(format!("{}:{}", id, language));
    }
    if let Some(tags) = track.tags() {
        tokens.push("--tags".to_string());
        tokens.push(format!("{}:{}", id, token(tags)));
    }

    // Always explicit: mkvmerge's own defaults differ per track type.
    tokens.push("--default-track".to_string());
    tokens.push(format!("{}:{}", id, u8::from(track.default_track)));
    tokens.push("--forced-track".to_string());
    tokens.push(format!("{}:{}", id, u8::from(track.forced_track)));

    // Select this track and drop every track of the other types.
    for kind in TrackType::SELECTABLE {
        if kind == track.track_type() {
            if let Some(flag) = kind.select_flag() {
                tokens.push(flag.to_string());
                tokens.push(id.to_string());
            }
        } else if let Some(flag) = kind.exclude_flag() {
            tokens.push(flag.to_string());
        }
    }

    let exclusions = [
        (track.no_chapters, "--no-chapters"),
        (track.no_global_tags, "--no-global-tags"),
        (track.no_track_tags, "--no-track-tags"),
        (track.no_attachments, "--no-attachments"),
    ];
    for (_, flag) in exclusions.iter().filter(|(set, _)| *set) {
        tokens.push(flag.to_string());
    }

    tokens.push(token(track.file_path()));
}

fn add_attachment_options(tokens: &mut Vec<String>, attachment: &Attachment) {
    if let Some(name) = &attachment.name {
        tokens.push("--attachment-name".to_string());
        tokens.push(name.clone());
    }
    if let Some(description) = &attachment.description {
        tokens.push("--attachment-description".to_string());
        tokens.push(description.clone());
    }
    if let Some(mime_type) = attachment.mime_type() {
        tokens.push("--attachment-mime-type".to_string());
        tokens.push(mime_type.to_string());
    }

    let flag = if attachment.attach_once {
        "--attach-file-once"
    } else {
        "--attach-file"
    };
    tokens.push(flag.to_string());
    tokens.push(token(attachment.file_path()));
}

/// Format tokens for pretty display (one option per line).
pub fn format_tokens_pretty(tokens: &[String]) -> String {
    let mut result = String::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if token.starts_with('-') && i + 1 < tokens.len() && !tokens[i + 1].starts_with('-') {
            result.push_str(&format!("{} {} \\\n", token, tokens[i + 1]));
            i += 2;
        } else {
            result.push_str(&format!("{} \\\n", token));
            i += 1;
        }
    }

    if result.ends_with(" \\\n") {
        result.truncate(result.len() - 3);
        result.push('\n');
    }
    result
}
