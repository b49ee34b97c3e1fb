/*!
 * Batch SRT → ITT conversion.
 *
 * Each input file is converted independently: a failure on one file is
 * recorded in its outcome and never stops the others. Units run on the
 * blocking thread pool with a bounded number in flight.
 */

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;
use crate::itt::IttEncoder;
use crate::subtitle_processor::SrtParser;

/// Extension of files the converter accepts
pub const SRT_EXTENSION: &str = "srt";

/// Extension of files the converter produces
pub const ITT_EXTENSION: &str = "itt";

/// Result of converting a single file
#[derive(Debug)]
pub enum ConversionStatus {
    /// Output written to the contained path
    Success(PathBuf),
    /// Conversion failed for the contained reason
    Failure(SubtitleError),
}

/// Per-file report from a batch run
#[derive(Debug)]
pub struct FileOutcome {
    /// Input path
    pub path: PathBuf,
    /// Success or failure
    pub status: ConversionStatus,
    /// Number of cues written
    pub cue_count: usize,
    /// Non-fatal issue noticed during conversion
    pub warning: Option<SubtitleError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ConversionStatus::Success(_))
    }

    pub fn output_path(&self) -> Option<&Path> {
        match &self.status {
            ConversionStatus::Success(path) => Some(path),
            ConversionStatus::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SubtitleError> {
        match &self.status {
            ConversionStatus::Success(_) => None,
            ConversionStatus::Failure(e) => Some(e),
        }
    }
}

/// Successful single-file conversion
#[derive(Debug)]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub cue_count: usize,
    pub warning: Option<SubtitleError>,
}

/// Drives SrtParser → IttEncoder over many files
#[derive(Debug, Clone, Copy)]
pub struct BatchConverter {
    encoder: IttEncoder,
    max_concurrent_files: usize,
}

impl Default for BatchConverter {
    fn default() -> Self {
        Self::new(IttEncoder::default(), 4)
    }
}

impl BatchConverter {
    /// Create a converter; a concurrency of zero is treated as one
    pub fn new(encoder: IttEncoder, max_concurrent_files: usize) -> Self {
        Self {
            encoder,
            max_concurrent_files: max_concurrent_files.max(1),
        }
    }

    pub fn max_concurrent_files(&self) -> usize {
        self.max_concurrent_files
    }

    /// Output path for an SRT input: same base name, `.itt` extension
    pub fn output_path_for<P: AsRef<Path>>(input: P) -> PathBuf {
        FileManager::replace_extension(input, ITT_EXTENSION)
    }

    /// Whether the converter accepts this path
    pub fn accepts<P: AsRef<Path>>(path: P) -> bool {
        FileManager::has_extension(path, SRT_EXTENSION)
    }

    /// Convert one SRT file to ITT next to it
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConversionReport, SubtitleError> {
        let path = path.as_ref();
        let output_path = Self::output_path_for(path);

        let content = FileManager::read_to_string(path)?;
        let cues = SrtParser::parse(&content)?;

        let warning = if cues.is_empty() && !content.trim().is_empty() {
            warn!("No subtitle cues found in {:?}", path);
            Some(SubtitleError::EmptyResult { path: path.to_path_buf() })
        } else {
            None
        };

        let xml = self.encoder.encode(&cues)?;
        FileManager::write_atomically(&output_path, &xml)?;

        debug!("Converted {:?} -> {:?} ({} cues)", path, output_path, cues.len());

        Ok(ConversionReport {
            output_path,
            cue_count: cues.len(),
            warning,
        })
    }

    /// Convert every `.srt` path; other paths are left out of the result
    pub async fn convert_all(&self, paths: &[PathBuf]) -> Vec<FileOutcome> {
        self.convert_all_with_progress(paths, |_, _| {}).await
    }

    /// Like `convert_all`, calling `progress_callback(done, total)` after each file
    pub async fn convert_all_with_progress(
        &self,
        paths: &[PathBuf],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Vec<FileOutcome> {
        let inputs: Vec<PathBuf> = paths
            .iter()
            .filter(|path| {
                let accepted = Self::accepts(path);
                if !accepted {
                    debug!("Skipping non-SRT path: {:?}", path);
                }
                accepted
            })
            .cloned()
            .collect();

        let total = inputs.len();
        let processed = Arc::new(AtomicUsize::new(0));
        let converter = *self;

        stream::iter(inputs)
            .map(|path| {
                let processed = processed.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    let task_path = path.clone();
                    let joined = tokio::task::spawn_blocking(move || converter.convert_file(&task_path)).await;

                    let outcome = match joined {
                        Ok(Ok(report)) => FileOutcome {
                            path,
                            status: ConversionStatus::Success(report.output_path),
                            cue_count: report.cue_count,
                            warning: report.warning,
                        },
                        Ok(Err(e)) => FileOutcome {
                            path,
                            status: ConversionStatus::Failure(e),
                            cue_count: 0,
                            warning: None,
                        },
                        Err(e) => FileOutcome {
                            path,
                            status: ConversionStatus::Failure(SubtitleError::Task(e.to_string())),
                            cue_count: 0,
                            warning: None,
                        },
                    };

                    let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total);

                    outcome
                }
            })
            .buffered(self.max_concurrent_files)
            .collect::<Vec<_>>()
            .await
    }
}
