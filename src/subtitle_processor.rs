use std::fmt;
use std::fs;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use log::{debug, trace, warn};

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::timestamp::Timestamp;

// @module: SRT encoding and parsing

// @const: SRT timing line, each side is checked strictly afterwards;
// trailing position coordinates (X1:.. Y2:..) are ignored
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\d:,]+)\s+-->\s+([\d:,]+)(?:\s+.*)?$").unwrap()
});

// @const: SRT index line
static INDEX_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap()
});

// @struct: Timestamped transcription unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    // @field: Start in seconds
    pub start: f64,

    // @field: End in seconds
    pub end: f64,

    // @field: Transcribed text, may span lines
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Segment {
            start,
            end,
            text: text.into(),
        }
    }
}

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: 1-based position in its document
    pub index: usize,

    // @field: Start time
    pub start: Timestamp,

    // @field: End time
    pub end: Timestamp,

    // @field: Caption text, may span lines
    pub text: String,

    // @field: Start/end exactly as written in the source SRT, if parsed
    pub source_timing: Option<(String, String)>,
}

impl Cue {
    pub fn new(index: usize, start: Timestamp, end: Timestamp, text: impl Into<String>) -> Self {
        Cue {
            index,
            start,
            end,
            text: text.into(),
            source_timing: None,
        }
    }

    /// Build a cue from a transcription segment, trimming its text
    pub fn from_segment(index: usize, segment: &Segment) -> Self {
        Cue {
            index,
            start: Timestamp::from_seconds(segment.start),
            end: Timestamp::from_seconds(segment.end),
            text: segment.text.trim().to_string(),
            source_timing: None,
        }
    }

    /// Start time as an SRT timestamp
    pub fn format_start_time(&self) -> String {
        self.start.to_srt_string()
    }

    /// End time as an SRT timestamp
    pub fn format_end_time(&self) -> String {
        self.end.to_srt_string()
    }

    /// Start time in SRT form, as captured from the source when available
    pub fn srt_start_text(&self) -> String {
        match &self.source_timing {
            Some((start, _)) => start.clone(),
            None => self.format_start_time(),
        }
    }

    /// End time in SRT form, as captured from the source when available
    pub fn srt_end_text(&self) -> String {
        match &self.source_timing {
            Some((_, end)) => end.clone(),
            None => self.format_end_time(),
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Serializes segments or cues into an SRT document
pub struct SrtEncoder;

impl SrtEncoder {
    /// Encode transcription segments as an SRT document.
    ///
    /// Indices are assigned from input position, text is trimmed, and every
    /// block (the last one included) ends with a blank line. `start <= end`
    /// is not checked here.
    pub fn encode(segments: &[Segment]) -> String {
        let cues: Vec<Cue> = segments
            .iter()
            .enumerate()
            .map(|(i, segment)| Cue::from_segment(i + 1, segment))
            .collect();
        Self::encode_cues(&cues)
    }

    /// Encode cues as an SRT document, regenerating indices from position.
    ///
    /// Blocks that a reader would drop (empty text, or text holding a blank
    /// line) are still written, with a warning.
    pub fn encode_cues(cues: &[Cue]) -> String {
        let mut output = String::new();
        for (i, cue) in cues.iter().enumerate() {
            let block = Cue {
                index: i + 1,
                start: cue.start,
                end: cue.end,
                text: cue.text.trim().to_string(),
                source_timing: None,
            };
            if let Some(problem) = Self::unreadable_text(&block.text) {
                warn!("Cue {} has {} and will not parse back as written", block.index, problem);
            }
            output.push_str(&block.to_string());
        }
        output
    }

    // @checks: Text that would end the block early or leave it without text
    fn unreadable_text(text: &str) -> Option<&'static str> {
        if text.is_empty() {
            Some("no text")
        } else if text.lines().any(|line| line.trim().is_empty()) {
            Some("a blank line in its text")
        } else {
            None
        }
    }

    /// Encode segments and write them to `path` atomically
    pub fn write_to_file<P: AsRef<Path>>(segments: &[Segment], path: P) -> Result<(), SubtitleError> {
        let content = Self::encode(segments);
        FileManager::write_atomically(path.as_ref(), &content)
    }
}

/// Where the parser is within the current block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    ExpectIndex,
    ExpectTiming,
    ExpectText,
    ExpectBlankOrText,
    SkipBlock,
}

/// Fields gathered for the block under construction
#[derive(Debug, Default)]
struct PendingCue {
    source_index: usize,
    start: Timestamp,
    end: Timestamp,
    timing: (String, String),
    lines: Vec<String>,
}

/// Extracts cues from SRT text
pub struct SrtParser;

impl SrtParser {
    /// Parse an SRT document into cues.
    ///
    /// Blocks that do not have an index line, a timing line and at least one
    /// text line are skipped without error. A timing line whose sides are not
    /// valid SRT timestamps fails with `MalformedTimestamp`. Emitted cues are
    /// numbered by output position.
    pub fn parse(document: &str) -> Result<Vec<Cue>, SubtitleError> {
        let document = document.strip_prefix('\u{feff}').unwrap_or(document);

        let mut cues = Vec::new();
        let mut state = ParseState::ExpectIndex;
        let mut pending = PendingCue::default();

        for (line_no, line) in document.lines().enumerate() {
            let line_no = line_no + 1;
            let trimmed = line.trim();
            let blank = trimmed.is_empty();

            state = match state {
                ParseState::ExpectIndex => {
                    if blank {
                        ParseState::ExpectIndex
                    } else if INDEX_LINE_REGEX.is_match(trimmed) {
                        // Captured index is trusted; output is renumbered anyway
                        pending = PendingCue {
                            source_index: trimmed.parse().unwrap_or(0),
                            ..PendingCue::default()
                        };
                        ParseState::ExpectTiming
                    } else {
                        debug!("Skipping block at line {}: expected index, found {:?}", line_no, trimmed);
                        ParseState::SkipBlock
                    }
                }
                ParseState::ExpectTiming => {
                    if let Some(caps) = TIMING_LINE_REGEX.captures(trimmed) {
                        pending.start = Timestamp::parse_srt(&caps[1])?;
                        pending.end = Timestamp::parse_srt(&caps[2])?;
                        pending.timing = (caps[1].to_string(), caps[2].to_string());
                        ParseState::ExpectText
                    } else if blank {
                        debug!("Skipping block {} at line {}: missing timing line", pending.source_index, line_no);
                        ParseState::ExpectIndex
                    } else {
                        debug!("Skipping block {} at line {}: missing timing line", pending.source_index, line_no);
                        ParseState::SkipBlock
                    }
                }
                ParseState::ExpectText => {
                    if blank {
                        debug!("Skipping block {} at line {}: no text", pending.source_index, line_no);
                        ParseState::ExpectIndex
                    } else {
                        pending.lines.push(line.to_string());
                        ParseState::ExpectBlankOrText
                    }
                }
                ParseState::ExpectBlankOrText => {
                    if blank {
                        Self::emit(&mut cues, std::mem::take(&mut pending));
                        ParseState::ExpectIndex
                    } else {
                        pending.lines.push(line.to_string());
                        ParseState::ExpectBlankOrText
                    }
                }
                ParseState::SkipBlock => {
                    if blank {
                        ParseState::ExpectIndex
                    } else {
                        ParseState::SkipBlock
                    }
                }
            };
        }

        match state {
            ParseState::ExpectBlankOrText => Self::emit(&mut cues, pending),
            ParseState::ExpectTiming | ParseState::ExpectText => {
                debug!("Dropping incomplete block {} at end of document", pending.source_index);
            }
            ParseState::ExpectIndex | ParseState::SkipBlock => {}
        }

        trace!("Parsed {} cue(s)", cues.len());
        Ok(cues)
    }

    /// Read and parse an SRT file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Cue>, SubtitleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SubtitleError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    fn emit(cues: &mut Vec<Cue>, pending: PendingCue) {
        let index = cues.len() + 1;
        if pending.source_index != index {
            debug!("Cue index {} renumbered to {}", pending.source_index, index);
        }
        cues.push(Cue {
            index,
            start: pending.start,
            end: pending.end,
            text: pending.lines.join("\n"),
            source_timing: Some(pending.timing),
        });
    }
}
