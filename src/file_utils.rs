use anyhow::{Result, Context};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use walkdir::WalkDir;

use crate::errors::SubtitleError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @checks: Case-insensitive extension match, with or without leading dot
    pub fn has_extension<P: AsRef<Path>>(path: P, extension: &str) -> bool {
        let wanted = extension.trim_start_matches('.');
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
    }

    // @generates: Same path with the extension replaced (or added)
    pub fn replace_extension<P: AsRef<Path>>(path: P, extension: &str) -> PathBuf {
        path.as_ref().with_extension(extension.trim_start_matches('.'))
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let mut walker = WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::has_extension(path, extension) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Expand input paths: directories become the matching files inside them,
    /// anything else is passed through unchanged
    pub fn expand_inputs(inputs: &[PathBuf], extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
        let mut expanded = Vec::new();
        for input in inputs {
            if Self::dir_exists(input) {
                let found = Self::find_files(input, extension, recursive)
                    .with_context(|| format!("Failed to scan directory: {:?}", input))?;
                expanded.extend(found);
            } else {
                expanded.push(input.clone());
            }
        }
        Ok(expanded)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, SubtitleError> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|source| SubtitleError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write a string to a file through a temporary sibling, then rename it
    /// into place so readers never observe a partial file
    pub fn write_atomically<P: AsRef<Path>>(path: P, content: &str) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        let unwritable = |source: std::io::Error| SubtitleError::UnwritableFile {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = Self::create_temp_in(parent).map_err(unwritable)?;
        // A replaced file keeps its mode
        if let Ok(existing) = fs::metadata(path) {
            temp.as_file().set_permissions(existing.permissions()).map_err(unwritable)?;
        }
        temp.write_all(content.as_bytes()).map_err(unwritable)?;
        temp.flush().map_err(unwritable)?;
        temp.persist(path).map_err(|e| unwritable(e.error))?;

        Ok(())
    }

    // @creates: Temp file with the mode a plain create would give (0666 minus umask)
    #[cfg(unix)]
    fn create_temp_in(dir: &Path) -> std::io::Result<NamedTempFile> {
        use std::os::unix::fs::PermissionsExt;
        Builder::new()
            .permissions(fs::Permissions::from_mode(0o666))
            .tempfile_in(dir)
    }

    #[cfg(not(unix))]
    fn create_temp_in(dir: &Path) -> std::io::Result<NamedTempFile> {
        Builder::new().tempfile_in(dir)
    }
}
