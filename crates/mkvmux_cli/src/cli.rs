//! Command line definition.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Args, Parser, Subcommand};
use mkvmux_core::models::Timestamp;

#[derive(Parser, Debug)]
#[command(name = "mkvmux")]
#[command(version)]
#[command(about = "Build and run mkvmerge invocations")]
pub struct Cli {
    /// Config file (default: the platform config directory)
    #[arg(long, global = true, env = "MKVMUX_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what mkvmerge finds in a file
    Identify {
        file: PathBuf,
    },

    /// Print the mkvmerge command for a mux without running it
    Command(MuxArgs),

    /// Assemble and run the mkvmerge command
    Mux {
        #[command(flatten)]
        args: MuxArgs,

        /// Discard mkvmerge's output
        #[arg(long)]
        silent: bool,
    },

    /// Check that the MKVToolNix programs can be run
    Tools,
}

#[derive(Args, Debug, Clone)]
pub struct MuxArgs {
    /// Output file
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Inputs as `path` (every track) or `path:id` (one track)
    #[arg(required = true)]
    pub inputs: Vec<InputSpec>,

    /// Title of the output
    #[arg(long)]
    pub title: Option<String>,

    /// File to attach (repeatable)
    #[arg(long = "attach", value_name = "FILE")]
    pub attachments: Vec<PathBuf>,

    /// Chapters file
    #[arg(long, value_name = "FILE")]
    pub chapters: Option<PathBuf>,

    /// Language for chapters without one
    #[arg(long, value_name = "LANG")]
    pub chapter_language: Option<String>,

    /// Global tags file
    #[arg(long, value_name = "FILE")]
    pub global_tags: Option<PathBuf>,

    /// Split after this many bytes
    #[arg(long, value_name = "BYTES", group = "split")]
    pub split_size: Option<u64>,

    /// Split after this duration (`[HH:]MM:SS[.nnn]`)
    #[arg(long, value_name = "TIME", group = "split")]
    pub split_duration: Option<Timestamp>,

    /// Split before these chapters (`1,3,5`) or `all`
    #[arg(long, value_name = "LIST", group = "split")]
    pub split_chapters: Option<ChapterList>,

    /// Link the split parts to each other
    #[arg(long)]
    pub link: bool,
}

/// An input on the command line: a whole file or one of its tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub path: PathBuf,
    pub track_id: Option<usize>,
}

impl FromStr for InputSpec {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err("empty input".to_string());
        }
        if let Some((path, id)) = value.rsplit_once(':') {
            if !path.is_empty() && !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
                let track_id = id.parse().map_err(|e| format!("bad track ID '{}': {}", id, e))?;
                return Ok(Self {
                    path: PathBuf::from(path),
                    track_id: Some(track_id),
                });
            }
        }
        Ok(Self {
            path: PathBuf::from(value),
            track_id: None,
        })
    }
}

impl fmt::Display for InputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.track_id {
            Some(id) => write!(f, "{}:{}", self.path.display(), id),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// Chapter numbers for `--split-chapters`; empty means all chapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterList(pub Vec<u32>);

impl FromStr for ChapterList {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("all") {
            return Ok(ChapterList(Vec::new()));
        }
        value
            .split(',')
            .map(|c| {
                c.trim()
                    .parse()
                    .map_err(|_| format!("'{}' is not a chapter number", c))
            })
            .collect::<Result<Vec<u32>, _>>()
            .map(ChapterList)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn input_specs() {
        let whole: InputSpec = "movie.mkv".parse().unwrap();
        assert_eq!(whole.track_id, None);

        let one: InputSpec = "movie.mkv:2".parse().unwrap();
        assert_eq!(one.path, PathBuf::from("movie.mkv"));
        assert_eq!(one.track_id, Some(2));
        assert_eq!(one.to_string(), "movie.mkv:2");

        let odd: InputSpec = "C:\\media\\a.mkv".parse().unwrap();
        assert_eq!(odd.track_id, None);
        assert!("".parse::<InputSpec>().is_err());
    }

    #[test]
    fn chapter_lists() {
        assert_eq!("all".parse::<ChapterList>().unwrap(), ChapterList(vec![]));
        assert_eq!("1, 3".parse::<ChapterList>().unwrap(), ChapterList(vec![1, 3]));
        assert!("1,x".parse::<ChapterList>().is_err());
    }

    #[test]
    fn split_options_conflict() {
        let result = Cli::try_parse_from([
            "mkvmux",
            "command",
            "-o",
            "out.mkv",
            "--split-size",
            "100",
            "--split-chapters",
            "all",
            "in.mkv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_mux_command() {
        let cli = Cli::try_parse_from([
            "mkvmux",
            "-v",
            "mux",
            "-o",
            "out.mkv",
            "--split-duration",
            "45:00",
            "--link",
            "--silent",
            "a.mkv",
            "b.aac:0",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Mux { args, silent } => {
                assert!(silent && args.link);
                assert_eq!(args.inputs.len(), 2);
                assert_eq!(args.split_duration, Some(Timestamp::parse("45:00").unwrap()));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
