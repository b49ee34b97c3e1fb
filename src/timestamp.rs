/*!
 * Timestamp conversion between seconds and the SRT / TTML textual forms.
 *
 * Both textual forms share one numeric model (whole milliseconds, truncated
 * from floating point seconds) and differ only in the fractional separator:
 * `HH:MM:SS,mmm` for SRT and `HH:MM:SS.mmm` for TTML.
 */

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;

// @const: Strict SRT timestamp, hours unbounded
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2}),(\d{3})$").unwrap()
});

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 3_600_000;

/// A point in time measured in whole milliseconds since 00:00:00
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    total_ms: u64,
}

impl Timestamp {
    /// Create a timestamp from a millisecond count
    pub fn from_millis(total_ms: u64) -> Self {
        Self { total_ms }
    }

    /// Create a timestamp from floating point seconds.
    ///
    /// The sub-millisecond remainder is truncated, never rounded. Negative
    /// and NaN inputs saturate to zero.
    pub fn from_seconds(seconds: f64) -> Self {
        // `as` saturates: negatives and NaN become 0, overflow becomes u64::MAX
        let total_ms = (seconds * 1000.0).floor() as u64;
        Self { total_ms }
    }

    pub fn as_millis(&self) -> u64 {
        self.total_ms
    }

    pub fn as_seconds(&self) -> f64 {
        self.total_ms as f64 / 1000.0
    }

    pub fn hours(&self) -> u64 {
        self.total_ms / MS_PER_HOUR
    }

    pub fn minutes(&self) -> u64 {
        (self.total_ms % MS_PER_HOUR) / MS_PER_MINUTE
    }

    pub fn seconds(&self) -> u64 {
        (self.total_ms % MS_PER_MINUTE) / MS_PER_SECOND
    }

    pub fn millis(&self) -> u64 {
        self.total_ms % MS_PER_SECOND
    }

    /// Format as `HH:MM:SS,mmm`
    pub fn to_srt_string(&self) -> String {
        self.format_with_separator(',')
    }

    /// Format as `HH:MM:SS.mmm`
    pub fn to_ttml_string(&self) -> String {
        self.format_with_separator('.')
    }

    fn format_with_separator(&self, separator: char) -> String {
        format!(
            "{:02}:{:02}:{:02}{}{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            separator,
            self.millis()
        )
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`)
    pub fn parse_srt(text: &str) -> Result<Self, SubtitleError> {
        let caps = SRT_TIMESTAMP_REGEX
            .captures(text)
            .ok_or_else(|| SubtitleError::MalformedTimestamp(text.to_string()))?;

        let field = |idx: usize| -> Result<u64, SubtitleError> {
            caps[idx]
                .parse::<u64>()
                .map_err(|_| SubtitleError::MalformedTimestamp(text.to_string()))
        };

        let hours = field(1)?;
        let minutes = field(2)?;
        let seconds = field(3)?;
        let millis = field(4)?;

        if minutes >= 60 || seconds >= 60 {
            return Err(SubtitleError::MalformedTimestamp(text.to_string()));
        }

        let total_ms = hours
            .checked_mul(MS_PER_HOUR)
            .and_then(|ms| ms.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
            .ok_or_else(|| SubtitleError::MalformedTimestamp(text.to_string()))?;

        Ok(Self { total_ms })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_srt_string())
    }
}

impl FromStr for Timestamp {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_srt(s)
    }
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn to_srt_string(seconds: f64) -> String {
    Timestamp::from_seconds(seconds).to_srt_string()
}

/// Format seconds as a TTML timestamp (`HH:MM:SS.mmm`)
pub fn to_ttml_string(seconds: f64) -> String {
    Timestamp::from_seconds(seconds).to_ttml_string()
}

/// Parse an SRT timestamp into seconds
pub fn parse_srt_timestamp(text: &str) -> Result<f64, SubtitleError> {
    Timestamp::parse_srt(text).map(|ts| ts.as_seconds())
}

/// Rewrite an already formatted SRT timestamp into TTML form.
///
/// Pure separator substitution: the digits are kept exactly as given.
pub fn srt_to_ttml(srt_timestamp: &str) -> String {
    srt_timestamp.replace(',', ".")
}
