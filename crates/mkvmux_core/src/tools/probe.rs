//! File identification using `mkvmerge -J`.
//!
//! Provides the [`Probe`] seam and the parser for mkvmerge's JSON
//! identification output.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MuxError, MuxResult};
use crate::models::TrackType;

/// Something that can identify a media file.
pub trait Probe {
    /// Identify the container and streams of `path`.
    fn identify(&self, path: &Path) -> MuxResult<ProbeResult>;
}

/// Container-level identification of a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Path that was probed.
    pub file_path: PathBuf,
    /// Container type name (e.g. "Matroska", "MP4/QuickTime").
    pub container_type: String,
    /// mkvmerge recognized the file format.
    pub recognized: bool,
    /// mkvmerge can read from this file.
    pub supported: bool,
    /// Segment title, if the container stores one.
    pub title: Option<String>,
    /// Container duration in nanoseconds.
    pub duration_ns: Option<u64>,
    /// Streams in the order mkvmerge reports them.
    pub tracks: Vec<ProbeTrack>,
    /// Embedded attachments.
    pub attachments: Vec<ProbeAttachment>,
    /// Number of chapter editions.
    pub chapter_count: usize,
}

impl ProbeResult {
    /// Whether the container is Matroska (or WebM, which mkvmerge reports the same way).
    pub fn is_matroska(&self) -> bool {
        self.container_type == "Matroska"
    }

    /// Look up a track by its mkvmerge ID.
    pub fn track(&self, id: usize) -> MuxResult<&ProbeTrack> {
        self.tracks
            .iter()
            .find(|t| t.id == id)
            .ok_or(MuxError::index(id, self.tracks.len()))
    }

    /// Duration in seconds, if known.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_ns.map(|ns| ns as f64 / 1_000_000_000.0)
    }
}

/// One stream reported by mkvmerge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeTrack {
    /// Track ID used in mkvmerge options.
    pub id: usize,
    #[serde(rename = "type")]
    pub track_type: TrackType,
    /// Codec name (e.g. "AVC/H.264/MPEG-4p10").
    pub codec: String,
    /// Matroska codec ID (e.g. "V_MPEG4/ISO/AVC").
    pub codec_id: Option<String>,
    pub language: Option<String>,
    pub language_ietf: Option<String>,
    pub name: Option<String>,
    pub is_default: Option<bool>,
    pub is_forced: Option<bool>,
    pub is_enabled: Option<bool>,
    /// Matroska track number.
    pub number: Option<u64>,
    pub uid: Option<u64>,
}

/// An attachment reported by mkvmerge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeAttachment {
    pub id: usize,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub size: u64,
}

/// Parse the JSON output of `mkvmerge -J`.
pub fn parse_identification(json: &Value, path: &Path) -> MuxResult<ProbeResult> {
    let container = json.get("container").ok_or_else(|| MuxError::ProbeFailed {
        path: path.to_path_buf(),
        message: "identification output has no container record".to_string(),
    })?;

    let mut result = ProbeResult {
        file_path: path.to_path_buf(),
        container_type: container
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("unknown")
            .to_string(),
        recognized: container
            .get("recognized")
            .and_then(|r| r.as_bool())
            .unwrap_or(false),
        supported: container
            .get("supported")
            .and_then(|s| s.as_bool())
            .unwrap_or(false),
        ..Default::default()
    };

    if let Some(props) = container.get("properties") {
        result.title = str_prop(Some(props), "title");
        result.duration_ns = props.get("duration").and_then(|d| d.as_u64());
    }

    if let Some(tracks) = json.get("tracks").and_then(|t| t.as_array()) {
        for track in tracks {
            match parse_track(track) {
                Some(info) => result.tracks.push(info),
                None => tracing::warn!("Skipping unreadable track record in {}", path.display()),
            }
        }
    }

    if let Some(attachments) = json.get("attachments").and_then(|a| a.as_array()) {
        result
            .attachments
            .extend(attachments.iter().filter_map(parse_attachment));
    }

    if let Some(chapters) = json.get("chapters").and_then(|c| c.as_array()) {
        result.chapter_count = chapters.len();
    }

    Ok(result)
}

fn str_prop(properties: Option<&Value>, key: &str) -> Option<String> {
    properties
        .and_then(|p| p.get(key))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn bool_prop(properties: Option<&Value>, key: &str) -> Option<bool> {
    properties.and_then(|p| p.get(key)).and_then(|v| v.as_bool())
}

fn parse_track(track: &Value) -> Option<ProbeTrack> {
    let track_type = TrackType::from_mkvmerge(track.get("type")?.as_str()?)?;
    let id = track.get("id")?.as_u64()? as usize;
    let properties = track.get("properties");

    let codec_id = str_prop(properties, "codec_id");
    let codec = track
        .get("codec")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .or_else(|| codec_id.clone())
        .unwrap_or_default();

    Some(ProbeTrack {
        id,
        track_type,
        codec,
        codec_id,
        language: str_prop(properties, "language"),
        language_ietf: str_prop(properties, "language_ietf"),
        name: str_prop(properties, "track_name"),
        is_default: bool_prop(properties, "default_track"),
        is_forced: bool_prop(properties, "forced_track"),
        is_enabled: bool_prop(properties, "enabled_track"),
        number: properties
            .and_then(|p| p.get("number"))
            .and_then(|n| n.as_u64()),
        uid: properties.and_then(|p| p.get("uid")).and_then(|u| u.as_u64()),
    })
}

fn parse_attachment(attachment: &Value) -> Option<ProbeAttachment> {
    Some(ProbeAttachment {
        id: attachment.get("id")?.as_u64()? as usize,
        file_name: attachment.get("file_name")?.as_str()?.to_string(),
        mime_type: attachment
            .get("content_type")
            .and_then(|c| c.as_str())
            .map(|s| s.to_string()),
        description: attachment
            .get("description")
            .and_then(|d| d.as_str())
            .map(|s| s.to_string()),
        size: attachment.get("size").and_then(|s| s.as_u64()).unwrap_or(0),
    })
}
