//! External collaborators: identifying files, verifying the tool and
//! running processes.
//!
//! The domain model only talks to the outside world through the traits
//! defined here. [`Mkvmerge`] is the MKVToolNix-backed implementation; tests
//! substitute in-memory fakes.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use mkvmux_core::tools::{Mkvmerge, Probe, Verify};
//!
//! let mkvmerge = Mkvmerge::default();
//! if mkvmerge.is_tool_available() {
//!     let info = mkvmerge.identify(Path::new("/path/to/movie.mkv")).unwrap();
//!     println!("{} tracks", info.tracks.len());
//! }
//! ```

mod mkvmerge;
mod probe;
mod runner;
mod verify;

pub use mkvmerge::{Mkvmerge, Toolchain, DEFAULT_MKVMERGE};
pub use probe::{parse_identification, Probe, ProbeAttachment, ProbeResult, ProbeTrack};
pub use runner::{CommandRunner, RunOutput, SystemRunner};
pub use verify::{verify_tool, Verify};
