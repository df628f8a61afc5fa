//! End-to-end command assembly against an in-memory toolchain.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mkvmux_core::container::{ContainerFile, Split, TrackSource};
use mkvmux_core::models::{Timestamp, TrackType};
use mkvmux_core::tools::{
    CommandRunner, Probe, ProbeResult, ProbeTrack, RunOutput, Toolchain, Verify,
};
use mkvmux_core::{MuxError, MuxResult};

#[derive(Debug, Default)]
struct FakeTools {
    files: HashMap<PathBuf, ProbeResult>,
}

impl FakeTools {
    fn with(mut self, path: &str, kinds: &[TrackType]) -> Self {
        let tracks = kinds
            .iter()
            .enumerate()
            .map(|(id, kind)| ProbeTrack {
                id,
                track_type: *kind,
                codec: kind.to_string(),
                codec_id: None,
                language: None,
                language_ietf: None,
                name: None,
                is_default: None,
                is_forced: None,
                is_enabled: None,
                number: None,
                uid: None,
            })
            .collect();
        let info = ProbeResult {
            file_path: PathBuf::from(path),
            container_type: "Matroska".to_string(),
            recognized: true,
            supported: true,
            tracks,
            ..Default::default()
        };
        self.files.insert(PathBuf::from(path), info);
        self
    }
}

impl Probe for FakeTools {
    fn identify(&self, path: &Path) -> MuxResult<ProbeResult> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| MuxError::FileNotFound(path.to_path_buf()))
    }
}

impl Verify for FakeTools {
    fn is_tool_available(&self) -> bool {
        true
    }
}

impl CommandRunner for FakeTools {
    fn run(&self, _argv: &[String], _capture_output: bool) -> MuxResult<RunOutput> {
        Ok(RunOutput {
            exit_code: Some(0),
            success: true,
            ..Default::default()
        })
    }
}

impl Toolchain for FakeTools {
    fn executable(&self) -> &Path {
        Path::new("mkvmerge")
    }
}

fn container() -> ContainerFile {
    let tools = FakeTools::default()
        .with("v.h264", &[TrackType::Video])
        .with("dual.mka", &[TrackType::Audio, TrackType::Audio])
        .with(
            "movie.mkv",
            &[TrackType::Video, TrackType::Audio, TrackType::Subtitles],
        );
    ContainerFile::with_tools(Arc::new(tools))
}

fn strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn split_tokens(command: &[String]) -> Vec<String> {
    match command.iter().position(|t| t == "--split") {
        Some(at) => command[at..].to_vec(),
        None => Vec::new(),
    }
}

#[test]
fn single_video_track() {
    let mut file = container();
    file.title = Some("Movie".to_string());
    file.add_track("v.h264").unwrap();

    assert_eq!(
        file.command("out.mkv"),
        strings(&[
            "mkvmerge",
            "-o",
            "out.mkv",
            "--title",
            "Movie",
            "--default-track",
            "0:0",
            "--forced-track",
            "0:0",
            "-d",
            "0",
            "-A",
            "-S",
            "v.h264",
        ])
    );
}

#[test]
fn tracks_from_one_file_get_separate_blocks() {
    let mut file = container();
    file.add_track(TrackSource::path("dual.mka", 0)).unwrap();
    file.add_track(TrackSource::path("dual.mka", 1)).unwrap();

    let command = file.command("out.mkv");
    let paths: Vec<usize> = command
        .iter()
        .enumerate()
        .filter(|(_, t)| *t == "dual.mka")
        .map(|(i, _)| i)
        .collect();
    assert_eq!(paths.len(), 2);

    let first = &command[3..=paths[0]];
    let second = &command[paths[0] + 1..=paths[1]];
    assert_eq!(
        first,
        &strings(&[
            "--default-track",
            "0:0",
            "--forced-track",
            "0:0",
            "-D",
            "-a",
            "0",
            "-S",
            "dual.mka",
        ])[..]
    );
    assert_eq!(
        second,
        &strings(&[
            "--default-track",
            "1:0",
            "--forced-track",
            "1:0",
            "-D",
            "-a",
            "1",
            "-S",
            "dual.mka",
        ])[..]
    );
}

#[test]
fn every_block_selects_exactly_one_type() {
    let mut file = container();
    for id in 0..3 {
        file.add_track(TrackSource::path("movie.mkv", id)).unwrap();
    }
    file.track_mut(1).unwrap().name = Some("Stereo".to_string());

    let command = file.command("out.mkv");
    let mut start = 3;
    for (index, track) in file.tracks().iter().enumerate() {
        let end = start
            + command[start..]
                .iter()
                .position(|t| t == "movie.mkv")
                .unwrap();
        let block = &command[start..end];

        let positive = ["-d", "-a", "-s"]
            .iter()
            .filter(|flag| block.iter().any(|t| t == *flag))
            .count();
        let negative = ["-D", "-A", "-S"]
            .iter()
            .filter(|flag| block.iter().any(|t| t == *flag))
            .count();
        assert_eq!((positive, negative), (1, 2), "track {}", index);
        assert!(block.contains(&format!("{}:0", track.track_id())));
        start = end + 1;
    }
    assert_eq!(start, command.len());
}

#[test]
fn track_index_operations() {
    let mut file = container();
    for id in 0..3 {
        file.add_track(TrackSource::path("movie.mkv", id)).unwrap();
    }
    for n in 0..3 {
        assert_eq!(file.track(n).unwrap().track_id(), n);
    }

    file.remove_track(0).unwrap();
    assert_eq!(file.track(0).unwrap().track_type(), TrackType::Audio);

    assert!(matches!(
        file.move_track_forward(1),
        Err(MuxError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        file.move_track_backward(0),
        Err(MuxError::IndexOutOfRange { .. })
    ));
    let before = file.command("out.mkv");
    file.swap_tracks(0, 0).unwrap();
    assert_eq!(file.command("out.mkv"), before);
}

#[test]
fn last_split_wins() {
    let mut file = container();
    file.add_track("v.h264").unwrap();

    file.split_size(1_000_000, false).unwrap();
    file.split_timestamps(vec![Timestamp::parse("10:00").unwrap()], true)
        .unwrap();
    assert_eq!(
        split_tokens(&file.command("out.mkv")),
        strings(&["--split", "timestamps:10:00", "--link"])
    );

    file.split_none();
    assert!(split_tokens(&file.command("out.mkv")).is_empty());
    assert!(!file.command("out.mkv").contains(&"--link".to_string()));
}

#[test]
fn split_validation_boundary() {
    let ts = |s: &str| Some(Timestamp::parse(s).unwrap());

    assert_eq!(
        Split::by_chapters(Vec::<u32>::new()).unwrap().argument().as_deref(),
        Some("chapters:all")
    );
    assert!(matches!(
        Split::by_chapters(vec![2, 1]),
        Err(MuxError::Validation(_))
    ));
    assert!(Split::by_timestamp_parts(vec![vec![None, ts("10:00")], vec![ts("20:00"), None]]).is_ok());
    assert!(matches!(
        Split::by_timestamp_parts(vec![vec![ts("10:00"), None, None, ts("20:00")]]),
        Err(MuxError::Validation(_))
    ));
}

#[test]
fn whole_seconds_round_trip() {
    let form = "HH:MM:SS".parse().unwrap();
    for seconds in [0, 59, 60, 3599, 3600, 86_399, 359_999] {
        let ts = Timestamp::from_seconds(seconds).with_form(form);
        let parsed = Timestamp::parse(&ts.to_string()).unwrap();
        assert_eq!(parsed, ts);
        assert_eq!(parsed.total_seconds(), seconds);
    }
}

#[test]
fn mux_uses_assembled_command() {
    let mut file = container();
    file.add_track("v.h264").unwrap();
    let output = file.mux("out.mkv", true).unwrap();
    assert!(output.success);
}
