//! Data models for a mux.
//!
//! - Enums for track types
//! - Timestamps used by splitting options
//! - Tracks and attachments with validated setters
//! - Language code lookup

mod attachment;
mod enums;
pub mod language;
mod timestamp;
mod track;

// Re-export all public types
pub use attachment::{guess_mime_type, Attachment};
pub use enums::TrackType;
pub use language::{LanguageLookup, StaticLanguages};
pub use timestamp::{RangePolicy, Timestamp, TimestampForm};
pub use track::Track;

#[cfg(test)]
pub(crate) use track::tests::{probed, TableProbe};
