//! Time positions used by splitting options.
//!
//! mkvmerge accepts `HH:MM:SS.nnnnnnnnn` where only `MM:SS` is mandatory.
//! A [`Timestamp`] keeps the four components separately plus a display
//! [`TimestampForm`] that decides which optional segments are rendered.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MuxError, MuxResult};

static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([0-9]{1,2}):)?([0-9]{1,2}):([0-9]{1,2})(?:\.([0-9]{1,9}))?$").unwrap()
});

static FORM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([Hh]{1,2}):)?([Mm]{1,2}):([Ss]{1,2})(?:\.([Nn]{1,9}))?$").unwrap()
});

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// What to do with a minutes, seconds or nanoseconds value past its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Fail with a validation error.
    #[default]
    Reject,
    /// Replace the value with 0.
    Zero,
}

impl RangePolicy {
    fn apply(self, value: u32, limit: u32, component: &str) -> MuxResult<u32> {
        if value < limit {
            return Ok(value);
        }
        match self {
            RangePolicy::Reject => Err(MuxError::invalid(format!(
                "{} value {} must be below {}",
                component, value, limit
            ))),
            RangePolicy::Zero => Ok(0),
        }
    }
}

/// Which optional segments a timestamp always renders.
///
/// Parsed from templates such as `MM:SS` or `HH:MM:SS.NNNNNNNNN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestampForm {
    /// Always render the hours segment.
    pub hours: bool,
    /// Always render the fractional segment.
    pub nanos: bool,
}

impl TimestampForm {
    /// `HH:MM:SS`
    pub const HOURS: TimestampForm = TimestampForm {
        hours: true,
        nanos: false,
    };

    /// `HH:MM:SS.NNNNNNNNN`
    pub const FULL: TimestampForm = TimestampForm {
        hours: true,
        nanos: true,
    };
}

impl FromStr for TimestampForm {
    type Err = MuxError;

    fn from_str(template: &str) -> MuxResult<Self> {
        let caps = FORM_REGEX
            .captures(template)
            .ok_or_else(|| MuxError::invalid(format!("'{}' is not a timestamp form", template)))?;

        Ok(Self {
            hours: caps.get(1).is_some(),
            nanos: caps.get(4).is_some(),
        })
    }
}

impl fmt::Display for TimestampForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours {
            f.write_str("HH:")?;
        }
        f.write_str("MM:SS")?;
        if self.nanos {
            f.write_str(".NNNNNNNNN")?;
        }
        Ok(())
    }
}

/// A time position in a file.
///
/// Equality and ordering only look at the time components, never at the form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timestamp {
    hh: u64,
    mm: u32,
    ss: u32,
    nn: u32,
    form: TimestampForm,
}

impl Timestamp {
    /// Build a timestamp from explicit components.
    pub fn new(hh: u64, mm: u32, ss: u32, nn: u32, policy: RangePolicy) -> MuxResult<Self> {
        let mut ts = Self {
            hh,
            ..Self::default()
        };
        ts.set_minutes(mm, policy)?;
        ts.set_seconds(ss, policy)?;
        ts.set_nanos(nn, policy)?;
        Ok(ts)
    }

    /// Build a timestamp from a whole number of seconds.
    ///
    /// Any count is accepted, but [`parse`](Self::parse) reads at most two
    /// hour digits: values of 100 hours (360 000 s) or more render to a
    /// string that does not parse back.
    pub fn from_seconds(seconds: u64) -> Self {
        Self {
            hh: seconds / 3600,
            mm: (seconds % 3600 / 60) as u32,
            ss: (seconds % 60) as u32,
            nn: 0,
            form: TimestampForm::default(),
        }
    }

    /// Parse `[HH:]MM:SS[.nnnnnnnnn]`, rejecting out-of-range components.
    pub fn parse(value: &str) -> MuxResult<Self> {
        Self::parse_with(value, TimestampForm::default(), RangePolicy::Reject)
    }

    /// Parse with an explicit display form and range policy.
    pub fn parse_with(value: &str, form: TimestampForm, policy: RangePolicy) -> MuxResult<Self> {
        let caps = TIMESTAMP_REGEX
            .captures(value)
            .ok_or_else(|| MuxError::invalid(format!("'{}' is not a valid timestamp", value)))?;

        // The grammar bounds every group to at most 9 digits, so these parse.
        let number = |i: usize| -> u32 {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };
        let nanos = caps
            .get(4)
            .map(|m| format!("{:0<9}", m.as_str()))
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0);

        let mut ts = Self::new(number(1) as u64, number(2), number(3), nanos, policy)?;
        ts.form = form;
        Ok(ts)
    }

    /// Set the display form.
    pub fn with_form(mut self, form: TimestampForm) -> Self {
        self.form = form;
        self
    }

    pub fn hours(&self) -> u64 {
        self.hh
    }

    pub fn minutes(&self) -> u32 {
        self.mm
    }

    pub fn seconds(&self) -> u32 {
        self.ss
    }

    pub fn nanos(&self) -> u32 {
        self.nn
    }

    pub fn form(&self) -> TimestampForm {
        self.form
    }

    pub fn set_form(&mut self, form: TimestampForm) {
        self.form = form;
    }

    pub fn set_hours(&mut self, hh: u64) {
        self.hh = hh;
    }

    pub fn set_minutes(&mut self, mm: u32, policy: RangePolicy) -> MuxResult<()> {
        self.mm = policy.apply(mm, 60, "minutes")?;
        Ok(())
    }

    pub fn set_seconds(&mut self, ss: u32, policy: RangePolicy) -> MuxResult<()> {
        self.ss = policy.apply(ss, 60, "seconds")?;
        Ok(())
    }

    pub fn set_nanos(&mut self, nn: u32, policy: RangePolicy) -> MuxResult<()> {
        self.nn = policy.apply(nn, NANOS_PER_SECOND, "nanoseconds")?;
        Ok(())
    }

    /// Whole seconds, discarding the fraction. Saturates at `u64::MAX`.
    pub fn total_seconds(&self) -> u64 {
        self.hh
            .saturating_mul(3600)
            .saturating_add(self.mm as u64 * 60 + self.ss as u64)
    }

    /// Exact for every representable timestamp.
    pub fn total_nanos(&self) -> u128 {
        let seconds = self.hh as u128 * 3600 + self.mm as u128 * 60 + self.ss as u128;
        seconds * NANOS_PER_SECOND as u128 + self.nn as u128
    }

    pub fn is_zero(&self) -> bool {
        self.key() == (0, 0, 0, 0)
    }

    /// Render according to the form.
    ///
    /// Hours appear when the form asks for them or they are non-zero. The
    /// fraction appears when the form asks for it or it is non-zero, with
    /// trailing zeros stripped (`.0` for an all-zero fraction).
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.form.hours || self.hh != 0 {
            out.push_str(&format!("{:02}:", self.hh));
        }
        out.push_str(&format!("{:02}:{:02}", self.mm, self.ss));
        if self.form.nanos || self.nn != 0 {
            if self.nn == 0 {
                out.push_str(".0");
            } else {
                let digits = format!("{:09}", self.nn);
                out.push('.');
                out.push_str(digits.trim_end_matches('0'));
            }
        }
        out
    }

    fn key(&self) -> (u64, u32, u32, u32) {
        (self.hh, self.mm, self.ss, self.nn)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Timestamp {
    type Err = MuxError;

    fn from_str(value: &str) -> MuxResult<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Timestamp {
    type Error = MuxError;

    fn try_from(value: &str) -> MuxResult<Self> {
        Self::parse(value)
    }
}

impl From<u64> for Timestamp {
    fn from(seconds: u64) -> Self {
        Self::from_seconds(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_form() {
        let ts = Timestamp::parse("1:2").unwrap();
        assert_eq!((ts.hours(), ts.minutes(), ts.seconds(), ts.nanos()), (0, 1, 2, 0));
        assert_eq!(ts.render(), "01:02");
    }

    #[test]
    fn parses_full_form() {
        let ts = Timestamp::parse("01:02:03.5").unwrap();
        assert_eq!(ts.nanos(), 500_000_000);
        assert_eq!(ts.to_string(), "01:02:03.5");

        let ts = Timestamp::parse("00:00:00.000000001").unwrap();
        assert_eq!(ts.nanos(), 1);
        assert_eq!(ts.to_string(), "00:00.000000001");
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", "12", "1:2:3:4", "a:b", "01:02.", "01:02.1234567890", "100:00"] {
            let result = Timestamp::parse(bad);
            assert!(matches!(result, Err(MuxError::Validation(_))), "{bad}");
        }
    }

    #[test]
    fn out_of_range_components_follow_policy() {
        assert!(matches!(
            Timestamp::parse("10:75"),
            Err(MuxError::Validation(_))
        ));

        let ts = Timestamp::parse_with("10:75", TimestampForm::default(), RangePolicy::Zero).unwrap();
        assert_eq!((ts.minutes(), ts.seconds()), (10, 0));

        let mut ts = Timestamp::from_seconds(0);
        assert!(ts.set_minutes(60, RangePolicy::Reject).is_err());
        ts.set_minutes(61, RangePolicy::Zero).unwrap();
        assert_eq!(ts.minutes(), 0);
    }

    #[test]
    fn from_seconds_decomposes() {
        let ts = Timestamp::from_seconds(3725);
        assert_eq!((ts.hours(), ts.minutes(), ts.seconds()), (1, 2, 5));
        assert_eq!(ts.render(), "01:02:05");
        assert_eq!(Timestamp::from(59).render(), "00:59");
    }

    #[test]
    fn form_controls_optional_segments() {
        let ts = Timestamp::from_seconds(5).with_form(TimestampForm::FULL);
        assert_eq!(ts.render(), "00:00:05.0");

        let form: TimestampForm = "HH:MM:SS".parse().unwrap();
        assert_eq!(form, TimestampForm::HOURS);
        assert_eq!(TimestampForm::FULL.to_string(), "HH:MM:SS.NNNNNNNNN");
        assert!("SS:MM".parse::<TimestampForm>().is_err());
    }

    #[test]
    fn seconds_round_trip_through_hours_form() {
        for seconds in [0, 1, 59, 60, 61, 3599, 3600, 86_399, 359_999] {
            let ts = Timestamp::from_seconds(seconds).with_form(TimestampForm::HOURS);
            let reparsed = Timestamp::parse(&ts.render()).unwrap();
            assert_eq!(reparsed, ts);
            assert_eq!(reparsed.total_seconds(), seconds);
        }
    }

    #[test]
    fn ordering_is_component_wise() {
        let a = Timestamp::parse("00:59.9").unwrap();
        let b = Timestamp::parse("01:00").unwrap();
        let c = Timestamp::parse("1:00:00").unwrap();
        assert!(a < b && b < c);
        assert!(a.total_nanos() < b.total_nanos());

        // Form does not take part in equality.
        assert_eq!(b, b.with_form(TimestampForm::FULL));
    }

    #[test]
    fn huge_hours_do_not_overflow_totals() {
        let ts = Timestamp::new(u64::MAX / 1000, 0, 0, 1, RangePolicy::Reject).unwrap();
        assert!(!ts.is_zero());
        assert_eq!(ts.total_seconds(), u64::MAX);
        assert_eq!(
            ts.total_nanos(),
            (u64::MAX / 1000) as u128 * 3600 * 1_000_000_000 + 1
        );

        let mut ts = Timestamp::default();
        assert!(ts.is_zero());
        ts.set_hours(1 << 60);
        assert!(!ts.is_zero());
        assert!(ts.total_nanos() > 0);
    }

    #[test]
    fn hundred_hours_render_but_do_not_parse() {
        let ts = Timestamp::from_seconds(360_000).with_form(TimestampForm::HOURS);
        assert_eq!(ts.render(), "100:00:00");
        assert_eq!(ts.total_seconds(), 360_000);
        assert!(matches!(
            Timestamp::parse(&ts.render()),
            Err(MuxError::Validation(_))
        ));
    }
}
