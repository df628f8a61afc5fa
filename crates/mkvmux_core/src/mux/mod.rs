//! Command assembly for mkvmerge.
//!
//! - **options_builder**: Converts a [`ContainerFile`](crate::container::ContainerFile)
//!   into mkvmerge command tokens

mod options_builder;

pub use options_builder::{format_tokens_pretty, MkvmergeOptionsBuilder};
