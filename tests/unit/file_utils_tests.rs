/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use subtitler::file_utils::FileManager;
use subtitler::SubtitleError;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that dir_exists distinguishes directories from missing paths
#[test]
fn test_dir_exists_withVariousPaths_shouldDetectDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(temp_dir.path().join("non_existent_directory_12345")));
    Ok(())
}

/// Test that ensure_dir creates nested directories
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;

    assert!(nested.is_dir());
    Ok(())
}

/// Extension matching ignores case and a leading dot
#[test]
fn test_has_extension_withDifferentCase_shouldMatch() {
    assert!(FileManager::has_extension("movie.SRT", "srt"));
    assert!(FileManager::has_extension("movie.srt", ".srt"));
    assert!(!FileManager::has_extension("movie.srt.bak", "srt"));
    assert!(!FileManager::has_extension("movie", "srt"));
}

/// Only the last extension is replaced
#[test]
fn test_replace_extension_withDottedName_shouldReplaceLastExtension() {
    assert_eq!(FileManager::replace_extension("/media/show.s01e01.mp4", "srt"), PathBuf::from("/media/show.s01e01.srt"));
    assert_eq!(FileManager::replace_extension("noext", ".itt"), PathBuf::from("noext.itt"));
}

/// find_files honours the recursive flag
#[test]
fn test_find_files_withNestedDirs_shouldRespectRecursion() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let sub = temp_dir.path().join("season1");
    fs::create_dir(&sub)?;
    common::create_test_file(temp_dir.path(), "top.srt", "")?;
    common::create_test_file(temp_dir.path(), "top.txt", "")?;
    common::create_test_file(&sub, "ep1.SRT", "")?;

    let recursive = FileManager::find_files(temp_dir.path(), "srt", true)?;
    let shallow = FileManager::find_files(temp_dir.path(), "srt", false)?;

    assert_eq!(recursive.len(), 2);
    assert_eq!(shallow, vec![temp_dir.path().join("top.srt")]);

    Ok(())
}

/// expand_inputs replaces directories by their matches and keeps plain paths
#[test]
fn test_expand_inputs_withFilesAndDirs_shouldExpandDirsOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().join("subs");
    fs::create_dir(&dir)?;
    common::create_test_file(&dir, "one.srt", "")?;
    let missing = PathBuf::from("does/not/exist.srt");

    let expanded = FileManager::expand_inputs(&[missing.clone(), dir.clone()], "srt", true)?;

    assert_eq!(expanded, vec![missing, dir.join("one.srt")]);
    Ok(())
}

/// Reading a missing file reports UnreadableFile with the path
#[test]
fn test_read_to_string_withMissingFile_shouldReportPath() {
    let result = FileManager::read_to_string("definitely_missing_file.srt");
    match result {
        Err(SubtitleError::UnreadableFile { path, .. }) => assert_eq!(path, Path::new("definitely_missing_file.srt")),
        other => panic!("unexpected result: {:?}", other),
    }
}

/// Atomic writes leave only the final file behind
#[test]
fn test_write_atomically_withValidPath_shouldLeaveNoTempFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out.itt");

    FileManager::write_atomically(&target, "first")?;
    FileManager::write_atomically(&target, "second")?;

    assert_eq!(fs::read_to_string(&target)?, "second");
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);

    Ok(())
}

/// Writing into a missing directory reports UnwritableFile
#[test]
fn test_write_atomically_withMissingDirectory_shouldFailUnwritable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("missing").join("out.itt");

    let result = FileManager::write_atomically(&target, "content");

    assert!(matches!(result, Err(SubtitleError::UnwritableFile { .. })));
    assert!(!target.exists());

    Ok(())
}

/// New outputs get the same mode as a plainly created file
#[cfg(unix)]
#[test]
fn test_write_atomically_withNewFile_shouldUseUmaskMode() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = common::create_temp_dir()?;
    let reference = temp_dir.path().join("reference.srt");
    fs::write(&reference, "plain")?;
    let target = temp_dir.path().join("out.itt");

    FileManager::write_atomically(&target, "content")?;

    let expected = fs::metadata(&reference)?.permissions().mode() & 0o777;
    assert_eq!(fs::metadata(&target)?.permissions().mode() & 0o777, expected);

    Ok(())
}

/// Replacing a file keeps its mode
#[cfg(unix)]
#[test]
fn test_write_atomically_withExistingFile_shouldKeepMode() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out.itt");
    fs::write(&target, "old")?;
    fs::set_permissions(&target, fs::Permissions::from_mode(0o640))?;

    FileManager::write_atomically(&target, "new")?;

    assert_eq!(fs::read_to_string(&target)?, "new");
    assert_eq!(fs::metadata(&target)?.permissions().mode() & 0o777, 0o640);

    Ok(())
}
