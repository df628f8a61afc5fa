//! The output container being assembled.
//!
//! A [`ContainerFile`] collects tracks, attachments, chapters, tags, linking
//! and splitting options and turns them into one mkvmerge invocation.
//!
//! # Ownership
//!
//! A `ContainerFile` exclusively owns its tracks and attachments and does no
//! internal locking. [`ContainerFile::command`] only reads its state, but it
//! reads it field by field; callers sharing a container between threads must
//! synchronize mutation and assembly themselves.
//!
//! # Example
//!
//! ```no_run
//! use mkvmux_core::container::ContainerFile;
//! use mkvmux_core::models::Timestamp;
//!
//! let mut file = ContainerFile::open("movie.mkv")?;
//! file.title = Some("Movie".to_string());
//! file.add_track("commentary.aac")?;
//! file.split_duration(Timestamp::parse("45:00")?, false)?;
//! file.mux("out.mkv", false)?;
//! # Ok::<(), mkvmux_core::MuxError>(())
//! ```

mod nested;
mod split;

pub use nested::Nested;
pub use split::{Split, SplitDirective};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MuxError, MuxResult};
use crate::logging::MessagePrefix;
use crate::models::{Attachment, LanguageLookup, StaticLanguages, Timestamp, Track};
use crate::mux::MkvmergeOptionsBuilder;
use crate::paths::{existing_file, expand_user};
use crate::tools::{CommandRunner, Mkvmerge, Probe, RunOutput, Toolchain, Verify};

/// A track to add: a file to probe, or a track that already exists.
#[derive(Debug, Clone)]
pub enum TrackSource {
    /// Probe `path` and take the track with mkvmerge ID `track_id`.
    Path { path: PathBuf, track_id: usize },
    Track(Track),
}

impl TrackSource {
    pub fn path(path: impl Into<PathBuf>, track_id: usize) -> Self {
        TrackSource::Path {
            path: path.into(),
            track_id,
        }
    }
}

impl From<Track> for TrackSource {
    fn from(track: Track) -> Self {
        TrackSource::Track(track)
    }
}

impl From<PathBuf> for TrackSource {
    fn from(path: PathBuf) -> Self {
        TrackSource::path(path, 0)
    }
}

impl From<&Path> for TrackSource {
    fn from(path: &Path) -> Self {
        TrackSource::path(path, 0)
    }
}

impl From<&str> for TrackSource {
    fn from(path: &str) -> Self {
        TrackSource::path(path, 0)
    }
}

/// An attachment to add: a file path, or an attachment that already exists.
#[derive(Debug, Clone)]
pub enum AttachmentSource {
    Path(PathBuf),
    Attachment(Attachment),
}

impl From<Attachment> for AttachmentSource {
    fn from(attachment: Attachment) -> Self {
        AttachmentSource::Attachment(attachment)
    }
}

impl From<PathBuf> for AttachmentSource {
    fn from(path: PathBuf) -> Self {
        AttachmentSource::Path(path)
    }
}

impl From<&Path> for AttachmentSource {
    fn from(path: &Path) -> Self {
        AttachmentSource::Path(path.to_path_buf())
    }
}

impl From<&str> for AttachmentSource {
    fn from(path: &str) -> Self {
        AttachmentSource::Path(PathBuf::from(path))
    }
}

/// A container whose tracks are merged into another one.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Open and probe an existing container file.
    Path(PathBuf),
    Container(ContainerFile),
}

impl From<ContainerFile> for FileSource {
    fn from(file: ContainerFile) -> Self {
        FileSource::Container(file)
    }
}

impl From<PathBuf> for FileSource {
    fn from(path: PathBuf) -> Self {
        FileSource::Path(path)
    }
}

impl From<&Path> for FileSource {
    fn from(path: &Path) -> Self {
        FileSource::Path(path.to_path_buf())
    }
}

impl From<&str> for FileSource {
    fn from(path: &str) -> Self {
        FileSource::Path(PathBuf::from(path))
    }
}

/// An output file described as an ordered list of tracks plus file-level options.
#[derive(Debug, Clone)]
pub struct ContainerFile {
    /// Title of the output segment.
    pub title: Option<String>,

    source: Option<PathBuf>,
    tracks: Vec<Track>,
    attachments: Vec<Attachment>,
    chapters: Option<PathBuf>,
    chapter_language: Option<String>,
    global_tags: Option<PathBuf>,
    link_to_previous: Option<PathBuf>,
    link_to_next: Option<PathBuf>,
    split: SplitDirective,
    tools: Arc<dyn Toolchain>,
}

impl Default for ContainerFile {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerFile {
    /// An empty container using `mkvmerge` from `PATH`.
    pub fn new() -> Self {
        Self::with_tools(Arc::new(Mkvmerge::default()))
    }

    /// An empty container using the given toolchain.
    pub fn with_tools(tools: Arc<dyn Toolchain>) -> Self {
        Self {
            title: None,
            source: None,
            tracks: Vec::new(),
            attachments: Vec::new(),
            chapters: None,
            chapter_language: None,
            global_tags: None,
            link_to_previous: None,
            link_to_next: None,
            split: SplitDirective::default(),
            tools,
        }
    }

    /// Import every track of an existing container using `mkvmerge` from `PATH`.
    pub fn open(path: impl AsRef<Path>) -> MuxResult<Self> {
        Self::open_with(path, Arc::new(Mkvmerge::default()))
    }

    /// Import every track of an existing container.
    ///
    /// The title and each track's name, languages and flags are copied from
    /// the file. Any container mkvmerge can read is accepted.
    pub fn open_with(path: impl AsRef<Path>, tools: Arc<dyn Toolchain>) -> MuxResult<Self> {
        if !tools.is_tool_available() {
            return Err(MuxError::ToolUnavailable(tools.executable().to_path_buf()));
        }
        let path = existing_file(path)?;
        let info = tools.identify(&path)?;
        if !info.recognized {
            return Err(MuxError::NotRecognized(path));
        }
        if !info.supported {
            return Err(MuxError::UnsupportedFile(path));
        }

        let mut file = Self::with_tools(tools);
        file.title = info.title.clone();
        for probed in &info.tracks {
            let mut track = Track::from_probe(path.clone(), probed.id, &info)?;
            track.apply_probe_properties(probed);
            file.tracks.push(track);
        }
        tracing::debug!(
            "Imported {} tracks from {} ({})",
            file.tracks.len(),
            path.display(),
            info.container_type
        );
        file.source = Some(path);
        Ok(file)
    }

    /// The file this container was imported from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn tools(&self) -> &dyn Toolchain {
        self.tools.as_ref()
    }

    /// Use another toolchain for probing and muxing.
    pub fn set_tools(&mut self, tools: Arc<dyn Toolchain>) {
        self.tools = tools;
    }

    /// Use the mkvmerge executable at `path`.
    pub fn set_mkvmerge_path(&mut self, path: impl AsRef<Path>) {
        self.tools = Arc::new(Mkvmerge::new(path));
    }

    // ----- Tracks -----

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> MuxResult<&Track> {
        let len = self.tracks.len();
        self.tracks.get(index).ok_or(MuxError::index(index, len))
    }

    pub fn track_mut(&mut self, index: usize) -> MuxResult<&mut Track> {
        let len = self.tracks.len();
        self.tracks.get_mut(index).ok_or(MuxError::index(index, len))
    }

    fn resolve_track(&self, source: TrackSource) -> MuxResult<Track> {
        match source {
            TrackSource::Track(track) => Ok(track),
            TrackSource::Path { path, track_id } => Track::new(path, track_id, self.tools.as_ref()),
        }
    }

    fn check_index(&self, index: usize) -> MuxResult<()> {
        if index >= self.tracks.len() {
            return Err(MuxError::index(index, self.tracks.len()));
        }
        Ok(())
    }

    /// Append a track.
    pub fn add_track(&mut self, source: impl Into<TrackSource>) -> MuxResult<()> {
        let track = self.resolve_track(source.into())?;
        self.tracks.push(track);
        Ok(())
    }

    /// Append every track of another container, in its order.
    pub fn add_file(&mut self, source: impl Into<FileSource>) -> MuxResult<()> {
        let file = match source.into() {
            FileSource::Container(file) => file,
            FileSource::Path(path) => Self::open_with(path, Arc::clone(&self.tools))?,
        };
        self.tracks.extend(file.tracks);
        Ok(())
    }

    pub fn remove_track(&mut self, index: usize) -> MuxResult<Track> {
        self.check_index(index)?;
        Ok(self.tracks.remove(index))
    }

    /// Replace the track at `index`, returning the old one.
    pub fn replace_track(
        &mut self,
        index: usize,
        source: impl Into<TrackSource>,
    ) -> MuxResult<Track> {
        self.check_index(index)?;
        let track = self.resolve_track(source.into())?;
        Ok(std::mem::replace(&mut self.tracks[index], track))
    }

    pub fn move_track_to_front(&mut self, index: usize) -> MuxResult<()> {
        self.check_index(index)?;
        let track = self.tracks.remove(index);
        self.tracks.insert(0, track);
        Ok(())
    }

    pub fn move_track_to_end(&mut self, index: usize) -> MuxResult<()> {
        self.check_index(index)?;
        let track = self.tracks.remove(index);
        self.tracks.push(track);
        Ok(())
    }

    /// Swap the track at `index` with the one after it.
    ///
    /// Fails for the last track instead of leaving it in place.
    pub fn move_track_forward(&mut self, index: usize) -> MuxResult<()> {
        self.check_index(index)?;
        self.check_index(index + 1)?;
        self.tracks.swap(index, index + 1);
        Ok(())
    }

    /// Swap the track at `index` with the one before it.
    ///
    /// Fails for the first track instead of leaving it in place.
    pub fn move_track_backward(&mut self, index: usize) -> MuxResult<()> {
        self.check_index(index)?;
        if index == 0 {
            return Err(MuxError::index(index, self.tracks.len()));
        }
        self.tracks.swap(index - 1, index);
        Ok(())
    }

    pub fn swap_tracks(&mut self, first: usize, second: usize) -> MuxResult<()> {
        self.check_index(first)?;
        self.check_index(second)?;
        self.tracks.swap(first, second);
        Ok(())
    }

    // ----- Attachments -----

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn add_attachment(&mut self, source: impl Into<AttachmentSource>) -> MuxResult<()> {
        let attachment = match source.into() {
            AttachmentSource::Attachment(attachment) => attachment,
            AttachmentSource::Path(path) => Attachment::new(path)?,
        };
        self.attachments.push(attachment);
        Ok(())
    }

    pub fn remove_attachment(&mut self, index: usize) -> MuxResult<Attachment> {
        if index >= self.attachments.len() {
            return Err(MuxError::index(index, self.attachments.len()));
        }
        Ok(self.attachments.remove(index))
    }

    // ----- Chapters and tags -----

    pub fn chapters_file(&self) -> Option<&Path> {
        self.chapters.as_deref()
    }

    pub fn chapter_language(&self) -> Option<&str> {
        self.chapter_language.as_deref()
    }

    /// Use a chapters file and set the language of its entries.
    ///
    /// `None` clears any chapter language set earlier.
    pub fn chapters(&mut self, path: impl AsRef<Path>, language: Option<&str>) -> MuxResult<()> {
        let path = existing_file(path)?;
        if let Some(language) = language {
            validate_chapter_language(language)?;
        }
        self.chapters = Some(path);
        self.chapter_language = language.map(|s| s.to_string());
        Ok(())
    }

    /// Set or clear the language applied to chapters without one.
    pub fn set_chapter_language(&mut self, language: Option<&str>) -> MuxResult<()> {
        if let Some(language) = language {
            validate_chapter_language(language)?;
        }
        self.chapter_language = language.map(|s| s.to_string());
        Ok(())
    }

    pub fn clear_chapters(&mut self) {
        self.chapters = None;
    }

    pub fn global_tags_file(&self) -> Option<&Path> {
        self.global_tags.as_deref()
    }

    /// Use a global tags file.
    pub fn global_tags(&mut self, path: impl AsRef<Path>) -> MuxResult<()> {
        self.global_tags = Some(existing_file(path)?);
        Ok(())
    }

    /// Drop the track tags of tracks selected by `ids`.
    ///
    /// With `exclusive` the listed tracks lose their tags. Otherwise the
    /// listed tracks are the ones that keep them and every other track loses
    /// them.
    pub fn track_tags(&mut self, ids: impl Into<Nested<usize>>, exclusive: bool) -> MuxResult<()> {
        let ids = ids.into().flatten();
        if ids.is_empty() {
            return Err(MuxError::invalid("no track IDs given"));
        }
        if let Some(&bad) = ids.iter().find(|&&id| id >= self.tracks.len()) {
            return Err(MuxError::index(bad, self.tracks.len()));
        }

        let listed: HashSet<usize> = ids.into_iter().collect();
        for (index, track) in self.tracks.iter_mut().enumerate() {
            if listed.contains(&index) == exclusive {
                track.no_track_tags = true;
            }
        }
        Ok(())
    }

    pub fn no_chapters(&mut self) {
        self.tracks.iter_mut().for_each(|t| t.no_chapters = true);
    }

    pub fn no_global_tags(&mut self) {
        self.tracks.iter_mut().for_each(|t| t.no_global_tags = true);
    }

    pub fn no_track_tags(&mut self) {
        self.tracks.iter_mut().for_each(|t| t.no_track_tags = true);
    }

    pub fn no_attachments(&mut self) {
        self.tracks.iter_mut().for_each(|t| t.no_attachments = true);
    }

    // ----- Linking -----

    pub fn linked_previous(&self) -> Option<&Path> {
        self.link_to_previous.as_deref()
    }

    pub fn linked_next(&self) -> Option<&Path> {
        self.link_to_next.as_deref()
    }

    fn matroska_file(&self, path: impl AsRef<Path>) -> MuxResult<PathBuf> {
        let path = existing_file(path)?;
        if !self.tools.is_matroska(&path)? {
            return Err(MuxError::NotMatroska(path));
        }
        Ok(path)
    }

    /// Link the output to the end of an existing Matroska file.
    pub fn link_to_previous(&mut self, path: impl AsRef<Path>) -> MuxResult<()> {
        self.link_to_previous = Some(self.matroska_file(path)?);
        Ok(())
    }

    /// Link the output to the start of an existing Matroska file.
    pub fn link_to_next(&mut self, path: impl AsRef<Path>) -> MuxResult<()> {
        self.link_to_next = Some(self.matroska_file(path)?);
        Ok(())
    }

    pub fn link_to_none(&mut self) {
        self.link_to_previous = None;
        self.link_to_next = None;
    }

    // ----- Splitting -----

    pub fn split_directive(&self) -> &SplitDirective {
        &self.split
    }

    /// Replace the active split; a rejected split keeps the previous one.
    pub fn set_split(&mut self, split: Split, link: bool) -> MuxResult<()> {
        self.split = SplitDirective::new(split, link)?;
        Ok(())
    }

    pub fn split_none(&mut self) {
        self.split = SplitDirective::default();
    }

    pub fn split_size(&mut self, bytes: u64, link: bool) -> MuxResult<()> {
        self.set_split(Split::by_size(bytes)?, link)
    }

    pub fn split_duration(&mut self, duration: Timestamp, link: bool) -> MuxResult<()> {
        self.set_split(Split::by_duration(duration)?, link)
    }

    pub fn split_timestamps(
        &mut self,
        timestamps: impl Into<Nested<Timestamp>>,
        link: bool,
    ) -> MuxResult<()> {
        self.set_split(Split::by_timestamps(timestamps)?, link)
    }

    pub fn split_frames(&mut self, frames: impl Into<Nested<u64>>, link: bool) -> MuxResult<()> {
        self.set_split(Split::by_frames(frames)?, link)
    }

    /// Split before the given chapters, or before every chapter when empty.
    pub fn split_chapters(&mut self, chapters: impl Into<Nested<u32>>, link: bool) -> MuxResult<()> {
        self.set_split(Split::by_chapters(chapters)?, link)
    }

    pub fn split_timestamp_parts(
        &mut self,
        parts: Vec<Vec<Option<Timestamp>>>,
        link: bool,
    ) -> MuxResult<()> {
        self.set_split(Split::by_timestamp_parts(parts)?, link)
    }

    pub fn split_frame_parts(&mut self, parts: Vec<Vec<Option<u64>>>, link: bool) -> MuxResult<()> {
        self.set_split(Split::by_frame_parts(parts)?, link)
    }

    // ----- Output -----

    /// The full mkvmerge argument vector writing to `output`.
    pub fn command(&self, output: impl AsRef<Path>) -> Vec<String> {
        let output = expand_user(output);
        MkvmergeOptionsBuilder::new(self, &output).build()
    }

    /// [`command`](Self::command) as a single shell-quoted line, for display.
    pub fn command_line(&self, output: impl AsRef<Path>) -> String {
        let tokens = self.command(output);
        shlex::try_join(tokens.iter().map(|t| t.as_str())).unwrap_or_else(|_| tokens.join(" "))
    }

    /// Run mkvmerge and wait for it.
    ///
    /// Unless `silent`, the command is logged before it runs and mkvmerge's
    /// output is logged afterwards. A non-zero exit is returned as
    /// [`MuxError::MuxFailed`]; a partial output file is left as is.
    pub fn mux(&self, output: impl AsRef<Path>, silent: bool) -> MuxResult<RunOutput> {
        if !self.tools.is_tool_available() {
            return Err(MuxError::ToolUnavailable(self.tools.executable().to_path_buf()));
        }

        let output = expand_user(output);
        let argv = self.command(&output);
        if !silent {
            tracing::info!("{}", MessagePrefix::Command.format(&self.command_line(&output)));
        }

        let result = self.tools.run(&argv, !silent)?;
        if !silent {
            for line in result.stdout.lines().filter(|l| !l.trim().is_empty()) {
                tracing::info!("{}", line);
            }
        }

        if !result.success {
            tracing::error!(
                "{}",
                MessagePrefix::Error.format(&format!("mkvmerge exited with {:?}", result.exit_code))
            );
            return Err(MuxError::MuxFailed {
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }
        Ok(result)
    }
}

fn validate_chapter_language(language: &str) -> MuxResult<()> {
    let lookup = StaticLanguages;
    if lookup.is_iso639_2(language) || lookup.is_bcp47(language) {
        Ok(())
    } else {
        Err(MuxError::InvalidLanguage(language.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{probed, TableProbe, TrackType};
    use crate::tools::ProbeResult;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// In-memory toolchain: answers probes from a table and records runs.
    #[derive(Debug)]
    pub(crate) struct FakeTools {
        pub probe: TableProbe,
        pub available: bool,
        pub exit_code: i32,
        pub runs: Mutex<Vec<(Vec<String>, bool)>>,
    }

    impl FakeTools {
        pub fn new() -> Self {
            Self {
                probe: TableProbe::default(),
                available: true,
                exit_code: 0,
                runs: Mutex::new(Vec::new()),
            }
        }

        pub fn with_file(mut self, path: impl Into<PathBuf>, info: ProbeResult) -> Self {
            self.probe.0.insert(path.into(), info);
            self
        }
    }

    impl Probe for FakeTools {
        fn identify(&self, path: &Path) -> MuxResult<ProbeResult> {
            self.probe.identify(path)
        }
    }

    impl Verify for FakeTools {
        fn is_tool_available(&self) -> bool {
            self.available
        }
    }

    impl CommandRunner for FakeTools {
        fn run(&self, argv: &[String], capture_output: bool) -> MuxResult<RunOutput> {
            if let Ok(mut runs) = self.runs.lock() {
                runs.push((argv.to_vec(), capture_output));
            }
            Ok(RunOutput {
                exit_code: Some(self.exit_code),
                success: self.exit_code == 0,
                stdout: String::new(),
                stderr: if self.exit_code == 0 { String::new() } else { "Error: boom".to_string() },
            })
        }
    }

    impl Toolchain for FakeTools {
        fn executable(&self) -> &Path {
            Path::new("mkvmerge")
        }
    }

    const AV: &[(TrackType, &str)] = &[
        (TrackType::Video, "AVC/H.264/MPEG-4p10"),
        (TrackType::Audio, "AAC"),
        (TrackType::Subtitles, "SubStationAlpha"),
    ];

    fn tools() -> FakeTools {
        FakeTools::new()
            .with_file("/media/movie.mkv", probed(AV))
            .with_file("/media/extra.mka", probed(&[(TrackType::Audio, "FLAC")]))
    }

    fn container() -> ContainerFile {
        let mut file = ContainerFile::with_tools(Arc::new(tools()));
        for id in 0..3 {
            file.add_track(TrackSource::path("/media/movie.mkv", id)).unwrap();
        }
        file
    }

    fn order(file: &ContainerFile) -> Vec<usize> {
        file.tracks().iter().map(|t| t.track_id()).collect()
    }

    #[test]
    fn add_and_get_tracks() {
        let mut file = container();
        assert_eq!(order(&file), vec![0, 1, 2]);
        assert_eq!(file.track(1).unwrap().track_type(), TrackType::Audio);
        assert!(matches!(
            file.track(3),
            Err(MuxError::IndexOutOfRange { index: 3, len: 3 })
        ));

        file.add_track("/media/extra.mka").unwrap();
        assert_eq!(file.track(3).unwrap().codec(), "FLAC");

        let removed = file.remove_track(1).unwrap();
        assert_eq!(removed.track_id(), 1);
        assert_eq!(file.track(1).unwrap().track_id(), 2);
    }

    #[test]
    fn adding_unknown_file_fails() {
        let mut file = container();
        assert!(file.add_track("/media/missing.mkv").is_err());
        assert_eq!(file.tracks().len(), 3);
    }

    #[test]
    fn reordering() {
        let mut file = container();
        file.move_track_to_end(0).unwrap();
        assert_eq!(order(&file), vec![1, 2, 0]);
        file.move_track_to_front(2).unwrap();
        assert_eq!(order(&file), vec![0, 1, 2]);
        file.move_track_forward(0).unwrap();
        assert_eq!(order(&file), vec![1, 0, 2]);
        file.move_track_backward(2).unwrap();
        assert_eq!(order(&file), vec![1, 2, 0]);
        file.swap_tracks(0, 2).unwrap();
        assert_eq!(order(&file), vec![0, 2, 1]);
    }

    #[test]
    fn reordering_at_boundaries_fails() {
        let mut file = container();
        assert!(matches!(
            file.move_track_forward(2),
            Err(MuxError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            file.move_track_backward(0),
            Err(MuxError::IndexOutOfRange { .. })
        ));
        assert!(file.swap_tracks(0, 3).is_err());
        assert!(file.move_track_to_front(5).is_err());
        file.swap_tracks(0, 0).unwrap();
        assert_eq!(order(&file), vec![0, 1, 2]);
    }

    #[test]
    fn replace_track_is_atomic() {
        let mut file = container();
        assert!(file.replace_track(0, "/media/missing.mkv").is_err());
        assert_eq!(file.track(0).unwrap().track_type(), TrackType::Video);

        let old = file.replace_track(0, TrackSource::path("/media/extra.mka", 0)).unwrap();
        assert_eq!(old.track_type(), TrackType::Video);
        assert_eq!(file.track(0).unwrap().codec(), "FLAC");
    }

    #[test]
    fn open_imports_title_and_properties() {
        let media = NamedTempFile::new().unwrap();
        let mut info = probed(AV);
        info.title = Some("Feature".to_string());
        info.tracks[1].language = Some("jpn".to_string());
        info.tracks[1].name = Some("Main".to_string());
        info.tracks[1].is_default = Some(true);
        let tools = Arc::new(FakeTools::new().with_file(media.path(), info));

        let file = ContainerFile::open_with(media.path(), tools).unwrap();
        assert_eq!(file.title.as_deref(), Some("Feature"));
        assert_eq!(file.source(), Some(media.path()));
        assert_eq!(file.tracks().len(), 3);
        let audio = file.track(1).unwrap();
        assert_eq!(audio.language(), Some("jpn"));
        assert_eq!(audio.name.as_deref(), Some("Main"));
        assert!(audio.default_track);
    }

    #[test]
    fn open_checks_tool_and_format() {
        let media = NamedTempFile::new().unwrap();

        let mut offline = FakeTools::new().with_file(media.path(), probed(AV));
        offline.available = false;
        assert!(matches!(
            ContainerFile::open_with(media.path(), Arc::new(offline)),
            Err(MuxError::ToolUnavailable(_))
        ));

        let unknown = FakeTools::new().with_file(media.path(), ProbeResult::default());
        assert!(matches!(
            ContainerFile::open_with(media.path(), Arc::new(unknown)),
            Err(MuxError::NotRecognized(_))
        ));

        let mut read_only = probed(AV);
        read_only.supported = false;
        let unsupported = FakeTools::new().with_file(media.path(), read_only);
        assert!(matches!(
            ContainerFile::open_with(media.path(), Arc::new(unsupported)),
            Err(MuxError::UnsupportedFile(_))
        ));

        assert!(matches!(
            ContainerFile::open_with("/nonexistent/movie.mkv", Arc::new(tools())),
            Err(MuxError::FileNotFound(_))
        ));
    }

    #[test]
    fn add_file_appends_tracks() {
        let mut file = container();
        let mut other = ContainerFile::with_tools(Arc::new(tools()));
        other.add_track("/media/extra.mka").unwrap();
        other.add_track(TrackSource::path("/media/movie.mkv", 2)).unwrap();

        file.add_file(other).unwrap();
        assert_eq!(order(&file), vec![0, 1, 2, 0, 2]);
        assert_eq!(file.track(3).unwrap().codec(), "FLAC");
    }

    #[test]
    fn track_tags_selection() {
        let mut file = container();
        file.track_tags(vec![1], false).unwrap();
        let flags: Vec<bool> = file.tracks().iter().map(|t| t.no_track_tags).collect();
        assert_eq!(flags, vec![true, false, true]);

        let mut file = container();
        file.track_tags([0, 2], true).unwrap();
        let flags: Vec<bool> = file.tracks().iter().map(|t| t.no_track_tags).collect();
        assert_eq!(flags, vec![true, false, true]);

        assert!(file.track_tags(Vec::<usize>::new(), false).unwrap_err().is_validation());
        assert!(matches!(
            file.track_tags(vec![0, 7], false),
            Err(MuxError::IndexOutOfRange { index: 7, len: 3 })
        ));
    }

    #[test]
    fn bulk_exclusions() {
        let mut file = container();
        file.no_chapters();
        file.no_attachments();
        assert!(file.tracks().iter().all(|t| t.no_chapters && t.no_attachments));
        assert!(file.tracks().iter().all(|t| !t.no_global_tags && !t.no_track_tags));
        file.no_global_tags();
        file.no_track_tags();
        assert!(file.tracks().iter().all(|t| t.no_global_tags && t.no_track_tags));
    }

    #[test]
    fn chapters_and_language() {
        let mut file = container();
        let chapters = NamedTempFile::new().unwrap();
        assert!(matches!(
            file.chapters(chapters.path(), Some("klingon")),
            Err(MuxError::InvalidLanguage(_))
        ));
        assert_eq!(file.chapters_file(), None);

        file.chapters(chapters.path(), Some("eng")).unwrap();
        assert_eq!(file.chapters_file(), Some(chapters.path()));
        assert_eq!(file.chapter_language(), Some("eng"));
        file.set_chapter_language(None).unwrap();
        assert_eq!(file.chapter_language(), None);

        file.set_chapter_language(Some("jpn")).unwrap();
        file.chapters(chapters.path(), None).unwrap();
        assert_eq!(file.chapter_language(), None);

        assert!(matches!(
            file.global_tags("/nonexistent/tags.xml"),
            Err(MuxError::FileNotFound(_))
        ));
    }

    #[test]
    fn linking_requires_matroska() {
        let previous = NamedTempFile::new().unwrap();
        let other = NamedTempFile::new().unwrap();
        let mut not_mkv = probed(AV);
        not_mkv.container_type = "MP4/QuickTime".to_string();
        let tools = FakeTools::new()
            .with_file(previous.path(), probed(AV))
            .with_file(other.path(), not_mkv);

        let mut file = ContainerFile::with_tools(Arc::new(tools));
        file.link_to_previous(previous.path()).unwrap();
        assert_eq!(file.linked_previous(), Some(previous.path()));
        assert!(matches!(
            file.link_to_next(other.path()),
            Err(MuxError::NotMatroska(_))
        ));

        file.link_to_none();
        assert_eq!(file.linked_previous(), None);
        assert_eq!(file.linked_next(), None);
    }

    #[test]
    fn rejected_split_keeps_previous() {
        let mut file = container();
        file.split_size(1_000_000, true).unwrap();
        assert!(file.split_chapters(vec![3, 2], false).is_err());
        assert_eq!(file.split_directive().split(), &Split::Size(1_000_000));
        assert!(file.split_directive().link());

        file.split_none();
        assert_eq!(file.split_directive(), &SplitDirective::default());
    }

    #[test]
    fn mux_runs_command() {
        crate::logging::init_test_tracing();
        let tools = Arc::new(tools());
        let mut file = ContainerFile::with_tools(tools.clone());
        file.add_track("/media/extra.mka").unwrap();

        file.mux("/out/a.mkv", true).unwrap();
        let runs = tools.runs.lock().unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].0, file.command("/out/a.mkv"));
        assert!(!runs[0].1);
    }

    #[test]
    fn mux_failures() {
        let mut failing = tools();
        failing.exit_code = 2;
        let file = ContainerFile::with_tools(Arc::new(failing));
        match file.mux("/out/a.mkv", false) {
            Err(MuxError::MuxFailed { exit_code, stderr }) => {
                assert_eq!(exit_code, Some(2));
                assert_eq!(stderr, "Error: boom");
            }
            other => panic!("expected MuxFailed, got {:?}", other),
        }

        let mut offline = tools();
        offline.available = false;
        let file = ContainerFile::with_tools(Arc::new(offline));
        assert!(matches!(
            file.mux("/out/a.mkv", true),
            Err(MuxError::ToolUnavailable(_))
        ));
    }

    #[test]
    fn command_line_is_quoted() {
        let mut file = container();
        file.title = Some("My Movie".to_string());
        let line = file.command_line("/out/a b.mkv");
        assert!(line.starts_with("mkvmerge -o "));
        assert_eq!(shlex::split(&line), Some(file.command("/out/a b.mkv")));
    }
}
