/*!
 * # subtitler - subtitle timing and format conversion
 *
 * A Rust library for turning transcription segments into SubRip subtitles
 * and converting SubRip files into TTML/ITT caption documents.
 *
 * ## Features
 *
 * - Encode timestamped transcription segments as SRT
 * - Tolerant SRT parsing that skips malformed blocks
 * - TTML/ITT generation with the standard namespaces
 * - Batch conversion with per-file outcomes and atomic writes
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timestamp`: Seconds to SRT/TTML timestamp conversion
 * - `subtitle_processor`: Segment and cue types, SRT encoder and parser
 * - `itt`: TTML/ITT document encoder
 * - `batch`: Batch SRT to ITT conversion
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod batch;
pub mod errors;
pub mod file_utils;
pub mod itt;
pub mod subtitle_processor;
pub mod timestamp;

// Re-export main types for easier usage
pub use app_config::Config;
pub use batch::{BatchConverter, ConversionStatus, FileOutcome};
pub use errors::{AppError, SubtitleError};
pub use itt::IttEncoder;
pub use subtitle_processor::{Cue, Segment, SrtEncoder, SrtParser};
pub use timestamp::{Timestamp, parse_srt_timestamp, srt_to_ttml, to_srt_string, to_ttml_string};
