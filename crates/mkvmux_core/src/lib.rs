//! mkvmux core - models a Matroska mux and lowers it to an mkvmerge invocation.
//!
//! This crate holds all domain logic with no CLI dependencies: tracks,
//! attachments and timestamps ([`models`]), the output container and its
//! split options ([`container`]), command assembly ([`mux`]), and the
//! MKVToolNix collaborators ([`tools`]).

pub mod config;
pub mod container;
pub mod error;
pub mod logging;
pub mod models;
pub mod mux;
pub mod paths;
pub mod tools;

pub use container::{ContainerFile, Split, TrackSource};
pub use error::{MuxError, MuxResult};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
