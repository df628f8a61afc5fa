//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Type of media track, as reported by `mkvmerge -J`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Subtitles,
    Buttons,
}

impl TrackType {
    /// Every track type that has a per-file selection flag pair.
    pub const SELECTABLE: [TrackType; 3] = [TrackType::Video, TrackType::Audio, TrackType::Subtitles];

    /// Parse the `type` field of an mkvmerge track record.
    pub fn from_mkvmerge(value: &str) -> Option<Self> {
        match value {
            "video" => Some(TrackType::Video),
            "audio" => Some(TrackType::Audio),
            "subtitles" => Some(TrackType::Subtitles),
            "buttons" => Some(TrackType::Buttons),
            _ => None,
        }
    }

    /// Flag selecting specific tracks of this type (`-d`, `-a`, `-s`).
    pub fn select_flag(&self) -> Option<&'static str> {
        match self {
            TrackType::Video => Some("-d"),
            TrackType::Audio => Some("-a"),
            TrackType::Subtitles => Some("-s"),
            TrackType::Buttons => None,
        }
    }

    /// Flag dropping every track of this type (`-D`, `-A`, `-S`).
    pub fn exclude_flag(&self) -> Option<&'static str> {
        match self {
            TrackType::Video => Some("-D"),
            TrackType::Audio => Some("-A"),
            TrackType::Subtitles => Some("-S"),
            TrackType::Buttons => None,
        }
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackType::Video => write!(f, "video"),
            TrackType::Audio => write!(f, "audio"),
            TrackType::Subtitles => write!(f, "subtitles"),
            TrackType::Buttons => write!(f, "buttons"),
        }
    }
}
