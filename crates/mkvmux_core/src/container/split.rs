//! Output splitting directives.
//!
//! Only one directive is active per container. Every constructor validates its
//! input so that rendering the directive into `--split` tokens cannot fail.

use std::fmt::Display;

use crate::error::{MuxError, MuxResult};
use crate::models::Timestamp;

use super::nested::Nested;

/// How mkvmerge should cut the output into several files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Split {
    /// Write a single output file.
    #[default]
    None,
    /// Start a new file after this many bytes.
    Size(u64),
    /// Start a new file after this much content.
    Duration(Timestamp),
    /// Start a new file at each timestamp.
    Timestamps(Vec<Timestamp>),
    /// Start a new file at each frame number.
    Frames(Vec<u64>),
    /// Start a new file at each listed chapter; empty means every chapter.
    Chapters(Vec<u32>),
    /// Keep only the given timestamp ranges.
    TimestampParts(Vec<Vec<Option<Timestamp>>>),
    /// Keep only the given frame ranges.
    FrameParts(Vec<Vec<Option<u64>>>),
}

impl Split {
    pub fn by_size(bytes: u64) -> MuxResult<Self> {
        let split = Split::Size(bytes);
        split.validate()?;
        Ok(split)
    }

    pub fn by_duration(duration: Timestamp) -> MuxResult<Self> {
        let split = Split::Duration(duration);
        split.validate()?;
        Ok(split)
    }

    pub fn by_timestamps(timestamps: impl Into<Nested<Timestamp>>) -> MuxResult<Self> {
        let split = Split::Timestamps(timestamps.into().flatten());
        split.validate()?;
        Ok(split)
    }

    pub fn by_frames(frames: impl Into<Nested<u64>>) -> MuxResult<Self> {
        let split = Split::Frames(frames.into().flatten());
        split.validate()?;
        Ok(split)
    }

    /// Split before the listed chapter numbers, or before every chapter when
    /// the list is empty.
    pub fn by_chapters(chapters: impl Into<Nested<u32>>) -> MuxResult<Self> {
        let split = Split::Chapters(chapters.into().flatten());
        split.validate()?;
        Ok(split)
    }

    /// Keep the listed ranges.
    ///
    /// Each set holds start/end pairs; a set with more than one pair is
    /// written to a single output part. The very first start and the very
    /// last end may be `None` to mean "from the beginning" and "to the end".
    pub fn by_timestamp_parts(parts: Vec<Vec<Option<Timestamp>>>) -> MuxResult<Self> {
        let split = Split::TimestampParts(parts);
        split.validate()?;
        Ok(split)
    }

    /// Frame-number counterpart of [`Split::by_timestamp_parts`].
    pub fn by_frame_parts(parts: Vec<Vec<Option<u64>>>) -> MuxResult<Self> {
        let split = Split::FrameParts(parts);
        split.validate()?;
        Ok(split)
    }

    /// Check the directive against mkvmerge's rules for it.
    pub fn validate(&self) -> MuxResult<()> {
        match self {
            Split::None => Ok(()),
            Split::Size(0) => Err(MuxError::invalid("split size must be positive")),
            Split::Size(_) => Ok(()),
            Split::Duration(ts) if ts.is_zero() => {
                Err(MuxError::invalid("split duration must be positive"))
            }
            Split::Duration(_) => Ok(()),
            Split::Timestamps(timestamps) => {
                require_non_empty(timestamps, "timestamps")?;
                require_increasing(timestamps.iter(), "timestamps")
            }
            Split::Frames(frames) => {
                require_non_empty(frames, "frames")?;
                require_positive(frames.iter().map(|f| *f > 0), "frames")?;
                require_increasing(frames.iter(), "frames")
            }
            Split::Chapters(chapters) => {
                require_positive(chapters.iter().map(|c| *c > 0), "chapters")?;
                require_increasing(chapters.iter(), "chapters")
            }
            Split::TimestampParts(parts) => validate_parts(parts, "timestamp parts"),
            Split::FrameParts(parts) => {
                let numbers = parts.iter().flatten().flatten();
                require_positive(numbers.map(|f| *f > 0), "frame parts")?;
                validate_parts(parts, "frame parts")
            }
        }
    }

    /// The value following `--split`, or `None` when not splitting.
    pub fn argument(&self) -> Option<String> {
        let argument = match self {
            Split::None => return None,
            Split::Size(bytes) => format!("size:{}", bytes),
            Split::Duration(ts) => format!("duration:{}", ts),
            Split::Timestamps(timestamps) => format!("timestamps:{}", join(timestamps)),
            Split::Frames(frames) => format!("frames:{}", join(frames)),
            Split::Chapters(chapters) if chapters.is_empty() => "chapters:all".to_string(),
            Split::Chapters(chapters) => format!("chapters:{}", join(chapters)),
            Split::TimestampParts(parts) => format!("parts:{}", render_parts(parts)),
            Split::FrameParts(parts) => format!("parts-frames:{}", render_parts(parts)),
        };
        Some(argument)
    }
}

/// The active split together with the `--link` modifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitDirective {
    split: Split,
    link: bool,
}

impl SplitDirective {
    /// Validate `split` and pair it with the link flag.
    pub fn new(split: Split, link: bool) -> MuxResult<Self> {
        split.validate()?;
        Ok(Self { split, link })
    }

    pub fn split(&self) -> &Split {
        &self.split
    }

    /// Whether the split parts are linked to each other.
    pub fn link(&self) -> bool {
        self.link
    }

    /// Tokens appended at the end of the command line.
    pub fn tokens(&self) -> Vec<String> {
        let Some(argument) = self.split.argument() else {
            return Vec::new();
        };
        let mut tokens = vec!["--split".to_string(), argument];
        if self.link {
            tokens.push("--link".to_string());
        }
        tokens
    }
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn require_non_empty<T>(values: &[T], what: &str) -> MuxResult<()> {
    if values.is_empty() {
        return Err(MuxError::invalid(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn require_positive(mut checks: impl Iterator<Item = bool>, what: &str) -> MuxResult<()> {
    if !checks.all(|ok| ok) {
        return Err(MuxError::invalid(format!("{} must be positive", what)));
    }
    Ok(())
}

fn require_increasing<'a, T: PartialOrd + Display + 'a>(
    values: impl Iterator<Item = &'a T> + Clone,
    what: &str,
) -> MuxResult<()> {
    for (prev, next) in values.clone().zip(values.skip(1)) {
        if prev >= next {
            return Err(MuxError::invalid(format!(
                "{} must be strictly increasing ({} is not before {})",
                what, prev, next
            )));
        }
    }
    Ok(())
}

fn validate_parts<T: PartialOrd + Display>(sets: &[Vec<Option<T>>], what: &str) -> MuxResult<()> {
    require_non_empty(sets, what)?;
    for set in sets {
        if set.len() < 2 || set.len() % 2 != 0 {
            return Err(MuxError::invalid(format!(
                "every set of {} needs an even number of boundaries, got {}",
                what,
                set.len()
            )));
        }
    }

    let flat: Vec<&Option<T>> = sets.iter().flatten().collect();
    let last = flat.len() - 1;
    if let Some(pos) = (1..last).find(|&i| flat[i].is_none()) {
        return Err(MuxError::invalid(format!(
            "{} may only be open at the very start and end (boundary {} is open)",
            what, pos
        )));
    }
    if last == 1 && flat[0].is_none() && flat[1].is_none() {
        return Err(MuxError::invalid(format!("{} need at least one boundary", what)));
    }

    let bounded = flat.iter().filter_map(|b| b.as_ref());
    require_increasing(bounded, what)
}

/// `a-b,+c-d,e-` style rendering; `+` joins a range to the previous part.
fn render_parts<T: Display>(sets: &[Vec<Option<T>>]) -> String {
    let mut out = String::new();
    for set in sets {
        for (i, boundary) in set.iter().enumerate() {
            if i % 2 == 0 && i > 0 {
                out.push('+');
            }
            if let Some(boundary) = boundary {
                out.push_str(&boundary.to_string());
            }
            out.push(if i % 2 == 0 { '-' } else { ',' });
        }
    }
    out.pop();
    out
}
