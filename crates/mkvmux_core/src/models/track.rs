//! A single elementary stream selected for muxing.

use std::path::{Path, PathBuf};

use crate::error::{MuxError, MuxResult};
use crate::paths::{existing_file, expand_user};
use crate::tools::{Probe, ProbeResult, ProbeTrack};

use super::enums::TrackType;
use super::language::{LanguageLookup, StaticLanguages};

/// Conventional extension per track type and codec fragment.
///
/// Matched case-insensitively against the codec ID first, then the codec
/// name; the first hit wins, so longer fragments precede their substrings.
const EXTENSION_MAP: &[(TrackType, &str, &str)] = &[
    // Video
    (TrackType::Video, "V_MPEG1", "mpg"),
    (TrackType::Video, "V_MPEG2", "mpg"),
    (TrackType::Video, "V_MPEG4/ISO/AVC", "h264"),
    (TrackType::Video, "MPEG-4P10", "h264"),
    (TrackType::Video, "V_MPEGH/ISO/HEVC", "h265"),
    (TrackType::Video, "HEVC", "h265"),
    (TrackType::Video, "V_MS/VFW/FOURCC", "avi"),
    (TrackType::Video, "V_REAL", "rm"),
    (TrackType::Video, "V_THEORA", "ogg"),
    (TrackType::Video, "VP8", "ivf"),
    (TrackType::Video, "VP9", "ivf"),
    (TrackType::Video, "AV1", "ivf"),
    // Audio
    (TrackType::Audio, "EAC3", "eac3"),
    (TrackType::Audio, "E-AC-3", "eac3"),
    (TrackType::Audio, "AC-3", "ac3"),
    (TrackType::Audio, "AC3", "ac3"),
    (TrackType::Audio, "ALAC", "caf"),
    (TrackType::Audio, "AAC", "aac"),
    (TrackType::Audio, "DTS", "dts"),
    (TrackType::Audio, "FLAC", "flac"),
    (TrackType::Audio, "MPEG/L2", "mp2"),
    (TrackType::Audio, "MPEG/L3", "mp3"),
    (TrackType::Audio, "MP3", "mp3"),
    (TrackType::Audio, "OPUS", "ogg"),
    (TrackType::Audio, "VORBIS", "ogg"),
    (TrackType::Audio, "PCM", "wav"),
    (TrackType::Audio, "TRUEHD", "thd"),
    (TrackType::Audio, "MLP", "mlp"),
    (TrackType::Audio, "TTA", "tta"),
    (TrackType::Audio, "WAVPACK", "wv"),
    (TrackType::Audio, "REAL", "ra"),
    // Subtitles
    (TrackType::Subtitles, "PGS", "sup"),
    (TrackType::Subtitles, "HDMV", "sup"),
    (TrackType::Subtitles, "S_TEXT/ASS", "ass"),
    (TrackType::Subtitles, "S_TEXT/SSA", "ssa"),
    (TrackType::Subtitles, "UTF8", "srt"),
    (TrackType::Subtitles, "SUBRIP", "srt"),
    (TrackType::Subtitles, "ASCII", "srt"),
    (TrackType::Subtitles, "VOBSUB", "sub"),
    (TrackType::Subtitles, "USF", "usf"),
    (TrackType::Subtitles, "WEBVTT", "vtt"),
];

/// One track taken from a source file.
///
/// The type and codec come from identifying the source and cannot be
/// changed afterwards; create a new track to point at a different stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    file_path: PathBuf,
    track_id: usize,
    track_type: TrackType,
    codec: String,
    codec_id: Option<String>,
    language: Option<String>,
    language_ietf: Option<String>,
    tags: Option<PathBuf>,

    /// Name given to the track in the output.
    pub name: Option<String>,
    /// Default track of its type in the output.
    pub default_track: bool,
    /// Forced display flag in the output.
    pub forced_track: bool,

    /// Drop the chapters of the source file.
    pub no_chapters: bool,
    /// Drop the global tags of the source file.
    pub no_global_tags: bool,
    /// Drop the track tags of the source file.
    pub no_track_tags: bool,
    /// Drop the attachments of the source file.
    pub no_attachments: bool,
}

impl Track {
    /// Identify `path` and take the track with mkvmerge ID `track_id`.
    ///
    /// Standalone elementary streams have a single track with ID 0.
    pub fn new<P: Probe + ?Sized>(
        path: impl AsRef<Path>,
        track_id: usize,
        probe: &P,
    ) -> MuxResult<Self> {
        let path = expand_user(path);
        let info = probe.identify(&path)?;
        Self::from_probe(path, track_id, &info)
    }

    /// Build a track from an identification that was already performed.
    pub fn from_probe(
        path: impl Into<PathBuf>,
        track_id: usize,
        info: &ProbeResult,
    ) -> MuxResult<Self> {
        let file_path = path.into();
        if !info.recognized || !info.supported {
            return Err(MuxError::UnsupportedFile(file_path));
        }
        let probed = info.track(track_id)?;

        Ok(Self {
            file_path,
            track_id,
            track_type: probed.track_type,
            codec: probed.codec.clone(),
            codec_id: probed.codec_id.clone(),
            language: None,
            language_ietf: None,
            tags: None,
            name: None,
            default_track: false,
            forced_track: false,
            no_chapters: false,
            no_global_tags: false,
            no_track_tags: false,
            no_attachments: false,
        })
    }

    /// Copy the stored name, language and flags of an existing track.
    ///
    /// Languages the lookup does not recognize are left unset with a warning
    /// rather than failing the import.
    pub fn apply_probe_properties(&mut self, probed: &ProbeTrack) {
        if let Some(name) = &probed.name {
            self.name = Some(name.clone());
        }
        if let Some(language) = probed.language.as_deref() {
            if let Err(e) = self.set_language(Some(language)) {
                tracing::warn!("Ignoring language of track {}: {}", self.track_id, e);
            }
        }
        if let Some(tag) = probed.language_ietf.as_deref() {
            if let Err(e) = self.set_language_ietf(Some(tag)) {
                tracing::warn!("Ignoring IETF language of track {}: {}", self.track_id, e);
            }
        }
        if let Some(default_track) = probed.is_default {
            self.default_track = default_track;
        }
        if let Some(forced_track) = probed.is_forced {
            self.forced_track = forced_track;
        }
    }

    /// Set the track name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the ISO 639-2 language.
    pub fn with_language(mut self, language: &str) -> MuxResult<Self> {
        self.set_language(Some(language))?;
        Ok(self)
    }

    pub fn with_default(mut self, default_track: bool) -> Self {
        self.default_track = default_track;
        self
    }

    pub fn with_forced(mut self, forced_track: bool) -> Self {
        self.forced_track = forced_track;
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn track_id(&self) -> usize {
        self.track_id
    }

    pub fn track_type(&self) -> TrackType {
        self.track_type
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    pub fn codec_id(&self) -> Option<&str> {
        self.codec_id.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn language_ietf(&self) -> Option<&str> {
        self.language_ietf.as_deref()
    }

    pub fn tags(&self) -> Option<&Path> {
        self.tags.as_deref()
    }

    /// Set or clear the ISO 639-2 language.
    ///
    /// `None` leaves the language to mkvmerge's own default.
    pub fn set_language(&mut self, language: Option<&str>) -> MuxResult<()> {
        self.set_language_with(language, &StaticLanguages)
    }

    /// Set or clear the ISO 639-2 language, validating against `lookup`.
    pub fn set_language_with<L: LanguageLookup + ?Sized>(
        &mut self,
        language: Option<&str>,
        lookup: &L,
    ) -> MuxResult<()> {
        match language {
            Some(code) if !lookup.is_iso639_2(code) => {
                Err(MuxError::InvalidLanguage(code.to_string()))
            }
            _ => {
                self.language = language.map(|s| s.to_string());
                Ok(())
            }
        }
    }

    /// Set or clear the BCP-47 language, which takes precedence over the
    /// ISO 639-2 code when set.
    pub fn set_language_ietf(&mut self, tag: Option<&str>) -> MuxResult<()> {
        match tag {
            Some(tag) if !StaticLanguages.is_bcp47(tag) => {
                Err(MuxError::InvalidLanguage(tag.to_string()))
            }
            _ => {
                self.language_ietf = tag.map(|s| s.to_string());
                Ok(())
            }
        }
    }

    /// The language passed to `--language`.
    pub fn effective_language(&self) -> Option<&str> {
        self.language_ietf.as_deref().or(self.language.as_deref())
    }

    /// Attach a tags file to this track.
    pub fn set_tags(&mut self, path: impl AsRef<Path>) -> MuxResult<()> {
        self.tags = Some(existing_file(path)?);
        Ok(())
    }

    pub fn clear_tags(&mut self) {
        self.tags = None;
    }

    /// File extension conventionally used when this track is extracted.
    pub fn extension(&self) -> Option<&'static str> {
        let candidates = [self.codec_id.as_deref(), Some(self.codec.as_str())];
        candidates
            .into_iter()
            .flatten()
            .map(|c| c.to_ascii_uppercase())
            .find_map(|candidate| {
                EXTENSION_MAP
                    .iter()
                    .find(|(ty, key, _)| *ty == self.track_type && candidate.contains(key))
                    .map(|(_, _, ext)| *ext)
            })
    }
}
